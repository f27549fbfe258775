//! PackStream value types.

mod value;

pub(crate) use value::check_signature;
pub use value::{MAX_SIGNATURE, PackMap, PackStructure, PackValue};
