//! Top-level pack/unpack facade.

use bytes::{Bytes, BytesMut};

use crate::codec::decode;
use crate::codec::encode::encode_value;
use crate::codec::scan::{DecodeOptions, Materialize, Measure, Scanner};
use crate::error::PackResult;
use crate::types::PackValue;

/// Packs and unpacks flat streams of independently encoded values.
///
/// ```
/// use packstream::{Packer, PackValue};
///
/// let packer = Packer::new().max_depth(64);
/// let bytes = packer.pack(&[PackValue::Int(1), PackValue::from("A")]).unwrap();
/// assert_eq!(&bytes[..], &[0x01, 0x81, 0x41]);
/// assert_eq!(packer.unpack_all(&bytes).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Packer {
    options: DecodeOptions,
}

impl Packer {
    /// Creates a packer with default decode options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a packer from explicit decode options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decodes unmapped marker bytes as null instead of failing.
    pub fn lenient_markers(mut self, lenient: bool) -> Self {
        self.options.lenient_markers = lenient;
        self
    }

    /// Sets the maximum container nesting accepted on decode.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Concatenates the independent encodings of `values`.
    ///
    /// No envelope is added: the result is not a list.
    pub fn pack(&self, values: &[PackValue]) -> PackResult<Bytes> {
        let mut buf = BytesMut::new();
        for value in values {
            encode_value(&mut buf, value)?;
        }
        Ok(buf.freeze())
    }

    /// Decodes a flat stream of values until the buffer is exhausted.
    ///
    /// An empty buffer yields no values. A trailing partial value is
    /// `IncorrectNumberOfBytes`.
    pub fn unpack_all(&self, bytes: &[u8]) -> PackResult<Vec<PackValue>> {
        let scanner = Scanner::new(Materialize, self.options);
        let mut values = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let (len, value) = scanner.value(&bytes[pos..], 0).inspect_err(|e| {
                tracing::debug!(offset = pos, error = %e, "stream decode failed");
            })?;
            tracing::trace!(offset = pos, len, "decoded stream value");
            pos += len;
            values.push(value);
        }
        Ok(values)
    }

    /// Decodes a buffer holding exactly one value.
    pub fn unpack(&self, bytes: &[u8]) -> PackResult<PackValue> {
        decode::decode_value_with(bytes, &self.options).inspect_err(|e| {
            tracing::debug!(len = bytes.len(), error = %e, "value decode failed");
        })
    }

    /// Encoded length of the value starting at `bytes[0]`.
    pub fn size_for(&self, bytes: &[u8]) -> PackResult<usize> {
        Ok(Scanner::new(Measure, self.options).value(bytes, 0)?.0)
    }
}

/// Concatenates the independent encodings of `values`.
pub fn pack(values: &[PackValue]) -> PackResult<Bytes> {
    Packer::new().pack(values)
}

/// Decodes a buffer holding exactly one value with default options.
pub fn unpack(bytes: &[u8]) -> PackResult<PackValue> {
    Packer::new().unpack(bytes)
}

/// Decodes a flat stream of values with default options.
pub fn unpack_all(bytes: &[u8]) -> PackResult<Vec<PackValue>> {
    Packer::new().unpack_all(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackError;
    use crate::types::{PackMap, PackStructure};

    #[test]
    fn pack_concatenates_without_envelope() {
        let bytes = pack(&[PackValue::Bool(true), PackValue::Bool(false), PackValue::Null]).unwrap();
        assert_eq!(&bytes[..], &[0xC3, 0xC2, 0xC0]);
    }

    #[test]
    fn pack_empty() {
        assert!(pack(&[]).unwrap().is_empty());
        assert_eq!(unpack_all(&[]), Ok(vec![]));
    }

    #[test]
    fn stream_round_trip() {
        let values = vec![
            PackValue::Int(5000),
            PackValue::from("A"),
            PackValue::List(vec![PackValue::Int(1), PackValue::Int(2), PackValue::Int(3)]),
            PackValue::Map(PackMap::from([("one".to_string(), PackValue::from("eins"))])),
            PackValue::Structure(PackStructure {
                signature: 0x4E,
                fields: vec![PackValue::Float(0.5), PackValue::Null],
            }),
            PackValue::Int(-16),
        ];
        let bytes = pack(&values).unwrap();
        assert_eq!(unpack_all(&bytes), Ok(values));
    }

    #[test]
    fn stream_trailing_partial_value() {
        assert_eq!(unpack_all(&[0x01, 0xC9, 0x00]), Err(PackError::length(3, 2)));
    }

    #[test]
    fn unpack_requires_single_value() {
        let list = unpack(&[0x93, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(list.as_list().map(|l| l.len()), Some(3));
        assert_eq!(unpack(&[0x01, 0x02]), Err(PackError::length(1, 2)));
        assert_eq!(unpack(&[0xC9, 0x00]), Err(PackError::length(3, 2)));
        assert_eq!(unpack(&[]), Err(PackError::length(1, 0)));
    }

    #[test]
    fn pack_failure_reports_not_packable() {
        let bad = PackValue::Structure(PackStructure {
            signature: 0xFF,
            fields: vec![],
        });
        assert!(matches!(
            pack(&[PackValue::Int(1), bad]),
            Err(PackError::NotPackable(_))
        ));
    }

    #[test]
    fn builder_options() {
        let packer = Packer::new().lenient_markers(true).max_depth(1);
        assert!(packer.options().lenient_markers);
        assert_eq!(packer.options().max_depth, 1);

        assert_eq!(packer.unpack_all(&[0xC4, 0x01]), Ok(vec![PackValue::Null, PackValue::Int(1)]));
        assert!(matches!(
            packer.unpack(&[0x91, 0x91, 0x01]),
            Err(PackError::ResourceExhausted(_))
        ));
        assert_eq!(Packer::new().unpack_all(&[0xC4]), Err(PackError::UnexpectedByteMarker(0xC4)));
    }

    #[test]
    fn size_for_each_stream_value() {
        let bytes = pack(&[PackValue::Str("x".repeat(20)), PackValue::Int(1)]).unwrap();
        let packer = Packer::with_options(DecodeOptions::default());
        assert_eq!(packer.size_for(&bytes), Ok(22));
        assert_eq!(packer.size_for(&bytes[22..]), Ok(1));
    }
}
