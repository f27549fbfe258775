//! PackStream binary encoding format.
//!
//! PackStream is a self-describing binary format: every value starts with a
//! marker byte naming its type and, for strings and containers, its size
//! class. It uses big-endian byte ordering exclusively.

pub mod decode;
pub mod encode;
pub mod marker;
pub mod scan;

pub use decode::{decode_value, size_for};
pub use encode::encode_value;
pub use marker::{TypeTag, classify, try_classify};
pub use scan::DecodeOptions;
