//! A pure-Rust PackStream binary serialization codec.
//!
//! PackStream is a self-describing, type-tagged binary format: null,
//! booleans, integers, floats, UTF-8 strings, lists, string-keyed maps and
//! signature-tagged structures, each prefixed by a marker byte that names
//! the type and, for variable-length types, the size class.
//!
//! # Architecture
//!
//! - **`codec`** — Marker registry, per-type encoders and decoders, and the
//!   shared scan that measures or decodes nested values
//! - **`types`** — `PackValue` and its map and structure types
//! - **`pack`** — The `Pack` trait for per-type packing
//! - **`packer`** — Facade for flat streams of values, with decode options
//!
//! The codec works on in-memory buffers only; framing and transport belong
//! to the caller.

pub mod codec;
pub mod error;
pub mod pack;
pub mod packer;
pub mod types;

pub use codec::{DecodeOptions, TypeTag, classify};
pub use error::{PackError, PackResult};
pub use pack::Pack;
pub use packer::{Packer, pack, unpack, unpack_all};
pub use types::{PackMap, PackStructure, PackValue};
