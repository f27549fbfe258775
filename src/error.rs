//! Error types for PackStream encoding and decoding.

/// Errors that can occur while packing or unpacking PackStream data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The value cannot be represented in the wire format.
    #[error("not packable: {0}")]
    NotPackable(String),

    /// The buffer length does not match what the marker or header implies.
    #[error("incorrect number of bytes: expected {expected}, got {actual}")]
    IncorrectNumberOfBytes { expected: usize, actual: usize },

    /// The first byte is not a marker of the type being decoded.
    #[error("unexpected marker byte: 0x{0:02X}")]
    UnexpectedByteMarker(u8),

    /// Marker and length are valid but the payload is not.
    #[error("incorrect value: {0}")]
    IncorrectValue(String),

    #[error("not implemented yet: {0}")]
    NotImplementedYet(String),

    /// A configured decode limit was hit.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
}

impl PackError {
    /// Builds an `IncorrectNumberOfBytes` error for a buffer that is too
    /// short or too long.
    pub(crate) fn length(expected: usize, actual: usize) -> Self {
        Self::IncorrectNumberOfBytes { expected, actual }
    }
}

/// Result type for pack and unpack operations.
pub type PackResult<T> = Result<T, PackError>;
