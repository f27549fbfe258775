//! PackStream decoding: bytes → `PackValue`.
//!
//! Every `decode_*` function takes a slice holding exactly one encoded
//! value, starting at its marker byte. A slice that is shorter or longer
//! than the marker and header imply is `IncorrectNumberOfBytes`.

use bytes::Buf;

use super::marker::{self, Family, STRING_FAMILY, TypeTag};
use super::scan::{DecodeOptions, Materialize, Measure, Scanner};
use crate::error::{PackError, PackResult};
use crate::types::{PackMap, PackStructure, PackValue};

/// Decodes exactly one value of any type.
pub fn decode_value(bytes: &[u8]) -> PackResult<PackValue> {
    decode_value_with(bytes, &DecodeOptions::default())
}

/// Decodes exactly one value of any type using the given options.
pub fn decode_value_with(bytes: &[u8], options: &DecodeOptions) -> PackResult<PackValue> {
    exact(Scanner::new(Materialize, *options).value(bytes, 0)?, bytes)
}

pub fn decode_null(bytes: &[u8]) -> PackResult<()> {
    expect_len(bytes, 1)?;
    if bytes[0] == marker::NULL {
        Ok(())
    } else {
        Err(PackError::IncorrectValue(format!(
            "0x{:02X} is not null",
            bytes[0]
        )))
    }
}

pub fn decode_bool(bytes: &[u8]) -> PackResult<bool> {
    expect_len(bytes, 1)?;
    match bytes[0] {
        marker::TRUE => Ok(true),
        marker::FALSE => Ok(false),
        other => Err(PackError::IncorrectValue(format!(
            "0x{other:02X} is not a boolean"
        ))),
    }
}

/// Decodes an integer from any of its five encodings.
pub fn decode_int(bytes: &[u8]) -> PackResult<i64> {
    let m = first(bytes)?;
    let value = match marker::try_classify(m) {
        Some(TypeTag::TinyInt) => {
            expect_len(bytes, 1)?;
            i64::from(m as i8)
        }
        Some(TypeTag::Int8) => i64::from(payload(bytes, 2)?.get_i8()),
        Some(TypeTag::Int16) => i64::from(payload(bytes, 3)?.get_i16()),
        Some(TypeTag::Int32) => i64::from(payload(bytes, 5)?.get_i32()),
        Some(TypeTag::Int64) => payload(bytes, 9)?.get_i64(),
        _ => return Err(PackError::UnexpectedByteMarker(m)),
    };
    Ok(value)
}

pub fn decode_float(bytes: &[u8]) -> PackResult<f64> {
    let m = first(bytes)?;
    if m != marker::FLOAT_64 {
        return Err(PackError::UnexpectedByteMarker(m));
    }
    Ok(payload(bytes, 9)?.get_f64())
}

pub fn decode_string(bytes: &[u8]) -> PackResult<String> {
    let header = read_header(bytes, &STRING_FAMILY)?;
    expect_len(bytes, header.size.saturating_add(header.len))?;
    std::str::from_utf8(&bytes[header.size..])
        .map(str::to_owned)
        .map_err(|e| PackError::IncorrectValue(format!("invalid UTF-8 string: {e}")))
}

pub fn decode_list(bytes: &[u8]) -> PackResult<Vec<PackValue>> {
    exact(
        Scanner::new(Materialize, DecodeOptions::default()).list(bytes, 0)?,
        bytes,
    )
}

/// Decodes a map. Keys must be strings; when a key repeats, the last
/// occurrence wins.
pub fn decode_map(bytes: &[u8]) -> PackResult<PackMap> {
    let entries = exact(
        Scanner::new(Materialize, DecodeOptions::default()).map(bytes, 0)?,
        bytes,
    )?;
    Ok(entries.into_iter().collect())
}

pub fn decode_structure(bytes: &[u8]) -> PackResult<PackStructure> {
    let (size, (signature, fields)) =
        Scanner::new(Materialize, DecodeOptions::default()).structure(bytes, 0)?;
    let fields = exact((size, fields), bytes)?;
    Ok(PackStructure { signature, fields })
}

// -- Size introspection --

/// Bytes taken by a string's marker and length field: 1, 2, 3 or 5.
pub fn string_marker_size_for(bytes: &[u8]) -> PackResult<usize> {
    let m = first(bytes)?;
    STRING_FAMILY
        .header_size(m)
        .ok_or(PackError::UnexpectedByteMarker(m))
}

/// Payload length in bytes of the string starting at `bytes[0]`.
///
/// Only the marker and length field need to be present.
pub fn string_size_for(bytes: &[u8]) -> PackResult<usize> {
    Ok(read_header(bytes, &STRING_FAMILY)?.len)
}

/// Total encoded length of the list starting at `bytes[0]`.
///
/// `bytes` may extend past the list; trailing bytes are ignored.
pub fn list_size_for(bytes: &[u8]) -> PackResult<usize> {
    Ok(Scanner::new(Measure, DecodeOptions::default()).list(bytes, 0)?.0)
}

/// Total encoded length of the map starting at `bytes[0]`.
pub fn map_size_for(bytes: &[u8]) -> PackResult<usize> {
    Ok(Scanner::new(Measure, DecodeOptions::default()).map(bytes, 0)?.0)
}

/// Total encoded length of the structure starting at `bytes[0]`.
pub fn structure_size_for(bytes: &[u8]) -> PackResult<usize> {
    Ok(Scanner::new(Measure, DecodeOptions::default()).structure(bytes, 0)?.0)
}

/// Total encoded length of any value starting at `bytes[0]`.
pub fn size_for(bytes: &[u8]) -> PackResult<usize> {
    size_for_with(bytes, &DecodeOptions::default())
}

pub fn size_for_with(bytes: &[u8], options: &DecodeOptions) -> PackResult<usize> {
    Ok(Scanner::new(Measure, *options).value(bytes, 0)?.0)
}

// -- Header and slice helpers --

/// The marker and size field of a string or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte length (strings) or element count (containers).
    pub len: usize,
    /// Bytes taken by the marker and size field.
    pub size: usize,
}

/// Reads a header of the given family. Only the header bytes need to be
/// present.
pub fn read_header(bytes: &[u8], family: &Family) -> PackResult<Header> {
    let m = first(bytes)?;
    let size = family
        .header_size(m)
        .ok_or(PackError::UnexpectedByteMarker(m))?;
    let mut field = &take(bytes, size)?[1..];
    let len = match size {
        1 => usize::from(m & 0x0F),
        2 => usize::from(field.get_u8()),
        3 => usize::from(field.get_u16()),
        _ => field.get_u32() as usize,
    };
    Ok(Header { len, size })
}

/// Total length of the string starting at `bytes[0]`.
pub(crate) fn string_len(bytes: &[u8]) -> PackResult<usize> {
    let header = read_header(bytes, &STRING_FAMILY)?;
    Ok(header.size.saturating_add(header.len))
}

pub(crate) fn first(bytes: &[u8]) -> PackResult<u8> {
    bytes.first().copied().ok_or(PackError::length(1, 0))
}

/// The first `n` bytes, or `IncorrectNumberOfBytes` if fewer are present.
pub(crate) fn take(bytes: &[u8], n: usize) -> PackResult<&[u8]> {
    bytes.get(..n).ok_or(PackError::length(n, bytes.len()))
}

fn expect_len(bytes: &[u8], n: usize) -> PackResult<()> {
    if bytes.len() == n {
        Ok(())
    } else {
        Err(PackError::length(n, bytes.len()))
    }
}

/// The bytes after the marker of a fixed-width value of total width `n`.
fn payload(bytes: &[u8], n: usize) -> PackResult<&[u8]> {
    expect_len(bytes, n)?;
    Ok(&bytes[1..])
}

fn exact<T>((consumed, value): (usize, T), bytes: &[u8]) -> PackResult<T> {
    if consumed == bytes.len() {
        Ok(value)
    } else {
        Err(PackError::length(consumed, bytes.len()))
    }
}
