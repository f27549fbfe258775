//! PackStream encoding: `PackValue` → bytes.
//!
//! Every encoder picks the narrowest representation: tiny integers and
//! tiny size classes live in the marker byte itself, wider values escalate
//! through the 8/16/32-bit classes.

use bytes::{BufMut, BytesMut};

use super::marker::{self, Family, LIST_FAMILY, MAP_FAMILY, STRING_FAMILY, STRUCT_FAMILY};
use crate::error::{PackError, PackResult};
use crate::types::{PackMap, PackStructure, PackValue, check_signature};

/// Encodes a `PackValue` into the buffer using PackStream format.
///
/// On error the buffer is left exactly as it was before the call.
pub fn encode_value(buf: &mut BytesMut, value: &PackValue) -> PackResult<()> {
    all_or_nothing(buf, |buf| write_value(buf, value))
}

pub fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(marker::NULL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
}

/// Encodes an integer using the smallest possible PackStream representation.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    if (marker::TINY_INT_MIN..=marker::TINY_INT_MAX).contains(&value) {
        // TINY_INT: single byte
        buf.put_u8(value as u8);
    } else if i64::from(i8::MIN) <= value && value <= i64::from(i8::MAX) {
        buf.put_u8(marker::INT_8);
        buf.put_i8(value as i8);
    } else if i64::from(i16::MIN) <= value && value <= i64::from(i16::MAX) {
        buf.put_u8(marker::INT_16);
        buf.put_i16(value as i16);
    } else if i64::from(i32::MIN) <= value && value <= i64::from(i32::MAX) {
        buf.put_u8(marker::INT_32);
        buf.put_i32(value as i32);
    } else {
        buf.put_u8(marker::INT_64);
        buf.put_i64(value);
    }
}

pub fn encode_float(buf: &mut BytesMut, value: f64) {
    buf.put_u8(marker::FLOAT_64);
    buf.put_f64(value);
}

/// Encodes a string (size = UTF-8 byte length, not char count).
pub fn encode_string(buf: &mut BytesMut, value: &str) -> PackResult<()> {
    all_or_nothing(buf, |buf| write_string(buf, value))
}

pub fn encode_list(buf: &mut BytesMut, items: &[PackValue]) -> PackResult<()> {
    all_or_nothing(buf, |buf| write_list(buf, items))
}

/// Encodes a map as its entry count followed by key/value pairs in the
/// map's iteration order.
pub fn encode_map(buf: &mut BytesMut, map: &PackMap) -> PackResult<()> {
    all_or_nothing(buf, |buf| write_map(buf, map))
}

/// Encodes a structure: header (marker + field count), signature byte,
/// then the fields in order.
pub fn encode_structure(buf: &mut BytesMut, structure: &PackStructure) -> PackResult<()> {
    all_or_nothing(buf, |buf| write_structure(buf, structure))
}

fn all_or_nothing(
    buf: &mut BytesMut,
    f: impl FnOnce(&mut BytesMut) -> PackResult<()>,
) -> PackResult<()> {
    let start = buf.len();
    f(buf).inspect_err(|_| buf.truncate(start))
}

fn write_value(buf: &mut BytesMut, value: &PackValue) -> PackResult<()> {
    match value {
        PackValue::Null => encode_null(buf),
        PackValue::Bool(b) => encode_bool(buf, *b),
        PackValue::Int(i) => encode_int(buf, *i),
        PackValue::Float(f) => encode_float(buf, *f),
        PackValue::Str(s) => write_string(buf, s)?,
        PackValue::List(items) => write_list(buf, items)?,
        PackValue::Map(map) => write_map(buf, map)?,
        PackValue::Structure(s) => write_structure(buf, s)?,
    }
    Ok(())
}

fn write_string(buf: &mut BytesMut, value: &str) -> PackResult<()> {
    write_header(buf, &STRING_FAMILY, value.len())?;
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn write_list(buf: &mut BytesMut, items: &[PackValue]) -> PackResult<()> {
    write_header(buf, &LIST_FAMILY, items.len())?;
    for item in items {
        write_value(buf, item)?;
    }
    Ok(())
}

fn write_map(buf: &mut BytesMut, map: &PackMap) -> PackResult<()> {
    write_header(buf, &MAP_FAMILY, map.len())?;
    for (key, value) in map {
        write_string(buf, key)?;
        write_value(buf, value)?;
    }
    Ok(())
}

fn write_structure(buf: &mut BytesMut, structure: &PackStructure) -> PackResult<()> {
    check_signature(structure.signature)?;
    write_header(buf, &STRUCT_FAMILY, structure.fields.len())?;
    buf.put_u8(structure.signature);
    for field in &structure.fields {
        write_value(buf, field)?;
    }
    Ok(())
}

/// Writes the marker and size field for `len`, using the narrowest class.
fn write_header(buf: &mut BytesMut, family: &Family, len: usize) -> PackResult<()> {
    if len <= marker::TINY_MAX {
        buf.put_u8(family.tiny | len as u8);
    } else if len <= usize::from(u8::MAX) {
        buf.put_u8(family.size_8);
        buf.put_u8(len as u8);
    } else if len <= usize::from(u16::MAX) {
        buf.put_u8(family.size_16);
        buf.put_u16(len as u16);
    } else {
        match (family.size_32, u32::try_from(len)) {
            (Some(m), Ok(len)) => {
                buf.put_u8(m);
                buf.put_u32(len);
            }
            _ => {
                return Err(PackError::NotPackable(format!(
                    "{:?} size {len} exceeds maximum of {}",
                    family.tag,
                    family.max_len()
                )));
            }
        }
    }
    Ok(())
}
