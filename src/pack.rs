//! The `Pack` trait: per-type packing and unpacking.

use bytes::{Bytes, BytesMut};

use crate::codec::{decode, encode};
use crate::error::{PackError, PackResult};
use crate::types::{PackMap, PackStructure, PackValue};

/// A type with a PackStream representation.
///
/// `unpack` takes a slice holding exactly one encoded value.
pub trait Pack: Sized {
    fn pack(&self) -> PackResult<Bytes>;
    fn unpack(bytes: &[u8]) -> PackResult<Self>;
}

fn packed(f: impl FnOnce(&mut BytesMut) -> PackResult<()>) -> PackResult<Bytes> {
    let mut buf = BytesMut::new();
    f(&mut buf)?;
    Ok(buf.freeze())
}

fn narrow<T: TryFrom<i64>>(value: i64) -> PackResult<T> {
    T::try_from(value).map_err(|_| {
        PackError::IncorrectValue(format!(
            "integer {value} out of range for {}",
            std::any::type_name::<T>()
        ))
    })
}

impl Pack for () {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| {
            encode::encode_null(buf);
            Ok(())
        })
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_null(bytes)
    }
}

impl Pack for bool {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| {
            encode::encode_bool(buf, *self);
            Ok(())
        })
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_bool(bytes)
    }
}

impl Pack for i64 {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| {
            encode::encode_int(buf, *self);
            Ok(())
        })
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_int(bytes)
    }
}

impl Pack for i32 {
    fn pack(&self) -> PackResult<Bytes> {
        i64::from(*self).pack()
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        narrow(decode::decode_int(bytes)?)
    }
}

impl Pack for i16 {
    fn pack(&self) -> PackResult<Bytes> {
        i64::from(*self).pack()
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        narrow(decode::decode_int(bytes)?)
    }
}

impl Pack for i8 {
    fn pack(&self) -> PackResult<Bytes> {
        i64::from(*self).pack()
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        narrow(decode::decode_int(bytes)?)
    }
}

impl Pack for f64 {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| {
            encode::encode_float(buf, *self);
            Ok(())
        })
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_float(bytes)
    }
}

impl Pack for String {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| encode::encode_string(buf, self))
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_string(bytes)
    }
}

impl Pack for Vec<PackValue> {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| encode::encode_list(buf, self))
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_list(bytes)
    }
}

impl Pack for PackMap {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| encode::encode_map(buf, self))
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_map(bytes)
    }
}

impl Pack for PackStructure {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| encode::encode_structure(buf, self))
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_structure(bytes)
    }
}

impl Pack for PackValue {
    fn pack(&self) -> PackResult<Bytes> {
        packed(|buf| encode::encode_value(buf, self))
    }

    fn unpack(bytes: &[u8]) -> PackResult<Self> {
        decode::decode_value(bytes)
    }
}
