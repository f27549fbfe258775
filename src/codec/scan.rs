//! The recursive walk shared by container decoding and `size_for`.
//!
//! A single [`Scanner`] walks encoded values child by child: it peeks each
//! child's marker, classifies it, works out how many bytes the child
//! occupies and advances past it. What happens to each child is up to the
//! [`Sink`]: [`Materialize`] builds `PackValue`s, [`Measure`] builds
//! nothing and only the consumed byte count matters. Both share the same
//! byte-width logic, so measuring and decoding cannot drift apart.

use super::decode::{self, first, read_header, take};
use super::marker::{self, Family, LIST_FAMILY, MAP_FAMILY, STRUCT_FAMILY, TypeTag};
use crate::error::{PackError, PackResult};
use crate::types::{MAX_SIGNATURE, PackValue};

/// Default limit on container nesting accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode unmapped marker bytes as a one-byte null instead of failing
    /// with `UnexpectedByteMarker`.
    pub lenient_markers: bool,
    /// Maximum container nesting. `0` rejects containers entirely.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            lenient_markers: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Receives the children found by a [`Scanner`].
///
/// Scalar and string callbacks get a slice holding exactly the child's
/// encoded bytes.
pub(crate) trait Sink {
    type Value;
    type Key;

    /// An unmapped marker accepted under `lenient_markers`.
    fn unmapped(&self, marker: u8) -> Self::Value;
    fn scalar(&self, tag: TypeTag, bytes: &[u8]) -> PackResult<Self::Value>;
    fn string(&self, bytes: &[u8]) -> PackResult<Self::Value>;
    fn key(&self, bytes: &[u8]) -> PackResult<Self::Key>;
    fn list(&self, items: Vec<Self::Value>) -> Self::Value;
    fn map(&self, entries: Vec<(Self::Key, Self::Value)>) -> Self::Value;
    fn structure(&self, signature: u8, fields: Vec<Self::Value>) -> Self::Value;
}

/// Builds decoded values.
pub(crate) struct Materialize;

impl Sink for Materialize {
    type Value = PackValue;
    type Key = String;

    fn unmapped(&self, marker: u8) -> PackValue {
        tracing::warn!(marker, "unmapped marker decoded as null");
        PackValue::Null
    }

    fn scalar(&self, tag: TypeTag, bytes: &[u8]) -> PackResult<PackValue> {
        match tag {
            TypeTag::Null => decode::decode_null(bytes).map(|()| PackValue::Null),
            TypeTag::Bool => decode::decode_bool(bytes).map(PackValue::Bool),
            TypeTag::Float64 => decode::decode_float(bytes).map(PackValue::Float),
            _ => decode::decode_int(bytes).map(PackValue::Int),
        }
    }

    fn string(&self, bytes: &[u8]) -> PackResult<PackValue> {
        decode::decode_string(bytes).map(PackValue::Str)
    }

    fn key(&self, bytes: &[u8]) -> PackResult<String> {
        decode::decode_string(bytes)
    }

    fn list(&self, items: Vec<PackValue>) -> PackValue {
        PackValue::List(items)
    }

    fn map(&self, entries: Vec<(String, PackValue)>) -> PackValue {
        PackValue::Map(entries.into_iter().collect())
    }

    fn structure(&self, signature: u8, fields: Vec<PackValue>) -> PackValue {
        PackValue::Structure(crate::types::PackStructure { signature, fields })
    }
}

/// Builds nothing; used to measure encoded lengths.
///
/// `Vec<()>` never allocates, so walking containers costs no allocation.
pub(crate) struct Measure;

impl Sink for Measure {
    type Value = ();
    type Key = ();

    fn unmapped(&self, _marker: u8) {}

    fn scalar(&self, _tag: TypeTag, _bytes: &[u8]) -> PackResult<()> {
        Ok(())
    }

    fn string(&self, _bytes: &[u8]) -> PackResult<()> {
        Ok(())
    }

    fn key(&self, _bytes: &[u8]) -> PackResult<()> {
        Ok(())
    }

    fn list(&self, _items: Vec<()>) {}

    fn map(&self, _entries: Vec<((), ())>) {}

    fn structure(&self, _signature: u8, _fields: Vec<()>) {}
}

/// Walks encoded values, handing each child to a [`Sink`].
///
/// Every method takes a slice starting at a marker byte that may extend
/// past the value, and returns the number of bytes the value occupies
/// together with what the sink built.
pub(crate) struct Scanner<S> {
    sink: S,
    options: DecodeOptions,
}

impl<S: Sink> Scanner<S> {
    pub(crate) fn new(sink: S, options: DecodeOptions) -> Self {
        Self { sink, options }
    }

    pub(crate) fn value(&self, bytes: &[u8], depth: usize) -> PackResult<(usize, S::Value)> {
        let m = first(bytes)?;
        let tag = match marker::try_classify(m) {
            Some(tag) => tag,
            None if self.options.lenient_markers => return Ok((1, self.sink.unmapped(m))),
            None => return Err(PackError::UnexpectedByteMarker(m)),
        };

        match tag {
            TypeTag::String => {
                let len = decode::string_len(bytes)?;
                Ok((len, self.sink.string(take(bytes, len)?)?))
            }
            TypeTag::List => {
                let (len, items) = self.list(bytes, depth)?;
                Ok((len, self.sink.list(items)))
            }
            TypeTag::Map => {
                let (len, entries) = self.map(bytes, depth)?;
                Ok((len, self.sink.map(entries)))
            }
            TypeTag::Structure => {
                let (len, (signature, fields)) = self.structure(bytes, depth)?;
                Ok((len, self.sink.structure(signature, fields)))
            }
            scalar => {
                let width = scalar.fixed_width().unwrap_or(1);
                Ok((width, self.sink.scalar(scalar, take(bytes, width)?)?))
            }
        }
    }

    pub(crate) fn list(
        &self,
        bytes: &[u8],
        depth: usize,
    ) -> PackResult<(usize, Vec<S::Value>)> {
        let (count, mut pos) = self.open(bytes, &LIST_FAMILY, depth)?;
        let items = self.elements(bytes, &mut pos, count, depth)?;
        Ok((pos, items))
    }

    pub(crate) fn map(
        &self,
        bytes: &[u8],
        depth: usize,
    ) -> PackResult<(usize, Vec<(S::Key, S::Value)>)> {
        let (count, mut pos) = self.open(bytes, &MAP_FAMILY, depth)?;
        let mut entries = Vec::with_capacity(count.min(bytes.len() - pos));
        for _ in 0..count {
            let rest = &bytes[pos..];
            let m = first(rest)?;
            if marker::try_classify(m) != Some(TypeTag::String) {
                return Err(PackError::NotImplementedYet(format!(
                    "map key with marker 0x{m:02X}, only string keys are supported"
                )));
            }
            let key_len = decode::string_len(rest)?;
            let key = self.sink.key(take(rest, key_len)?)?;
            pos += key_len;

            let (value_len, value) = self.value(&bytes[pos..], depth + 1)?;
            pos += value_len;
            entries.push((key, value));
        }
        Ok((pos, entries))
    }

    pub(crate) fn structure(
        &self,
        bytes: &[u8],
        depth: usize,
    ) -> PackResult<(usize, (u8, Vec<S::Value>))> {
        let (count, mut pos) = self.open(bytes, &STRUCT_FAMILY, depth)?;
        let signature = *bytes
            .get(pos)
            .ok_or(PackError::length(pos + 1, bytes.len()))?;
        if signature > MAX_SIGNATURE {
            return Err(PackError::IncorrectValue(format!(
                "structure signature 0x{signature:02X} exceeds 0x7F"
            )));
        }
        pos += 1;
        let fields = self.elements(bytes, &mut pos, count, depth)?;
        Ok((pos, (signature, fields)))
    }

    /// Reads a container header, enforcing the depth limit. Returns the
    /// element count and the offset of the first element.
    fn open(&self, bytes: &[u8], family: &Family, depth: usize) -> PackResult<(usize, usize)> {
        if depth >= self.options.max_depth {
            return Err(PackError::ResourceExhausted(format!(
                "nesting deeper than {} containers",
                self.options.max_depth
            )));
        }
        let header = read_header(bytes, family)?;
        Ok((header.len, header.size))
    }

    fn elements(
        &self,
        bytes: &[u8],
        pos: &mut usize,
        count: usize,
        depth: usize,
    ) -> PackResult<Vec<S::Value>> {
        // Every element takes at least one byte.
        let mut items = Vec::with_capacity(count.min(bytes.len() - *pos));
        for _ in 0..count {
            let (len, item) = self.value(&bytes[*pos..], depth + 1)?;
            *pos += len;
            items.push(item);
        }
        Ok(items)
    }
}
