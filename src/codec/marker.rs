//! PackStream marker byte constants and the marker registry.

// Null
pub const NULL: u8 = 0xC0;

// Boolean
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Float (IEEE 754 double-precision, big-endian)
pub const FLOAT_64: u8 = 0xC1;

// Integer (beyond TINY_INT range)
pub const INT_8: u8 = 0xC8;
pub const INT_16: u8 = 0xC9;
pub const INT_32: u8 = 0xCA;
pub const INT_64: u8 = 0xCB;

// TINY_INT: single byte, range -16..=127
// Positive: 0x00..=0x7F (0..127)
// Negative: 0xF0..=0xFF (-16..-1)
pub const TINY_INT_MIN: i64 = -16;
pub const TINY_INT_MAX: i64 = 127;

// String
// TINY_STRING: 0x80..=0x8F (high nibble 0x8, low = byte length 0..15)
pub const STRING_8: u8 = 0xD0;
pub const STRING_16: u8 = 0xD1;
pub const STRING_32: u8 = 0xD2;

// List
// TINY_LIST: 0x90..=0x9F (high nibble 0x9, low = item count 0..15)
pub const LIST_8: u8 = 0xD4;
pub const LIST_16: u8 = 0xD5;
pub const LIST_32: u8 = 0xD6;

// Map
// TINY_MAP: 0xA0..=0xAF (high nibble 0xA, low = entry count 0..15)
pub const MAP_8: u8 = 0xD8;
pub const MAP_16: u8 = 0xD9;
pub const MAP_32: u8 = 0xDA;

// Structure (no 32-bit size class)
// TINY_STRUCT: 0xB0..=0xBF (high nibble 0xB, low = field count 0..15)
pub const STRUCT_8: u8 = 0xDC;
pub const STRUCT_16: u8 = 0xDD;

// High-nibble masks for tiny types.
pub const TINY_STRING_NIBBLE: u8 = 0x80;
pub const TINY_LIST_NIBBLE: u8 = 0x90;
pub const TINY_MAP_NIBBLE: u8 = 0xA0;
pub const TINY_STRUCT_NIBBLE: u8 = 0xB0;

/// Largest count that fits in a tiny marker's low nibble.
pub const TINY_MAX: usize = 15;

/// The type a marker byte announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    TinyInt,
    Int8,
    Int16,
    Int32,
    Int64,
    Float64,
    String,
    List,
    Map,
    Structure,
}

impl TypeTag {
    /// Total encoded width (marker included) of fixed-size types.
    ///
    /// Returns `None` for strings and containers, whose width depends on
    /// their size field and contents.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Null | Self::Bool | Self::TinyInt => Some(1),
            Self::Int8 => Some(2),
            Self::Int16 => Some(3),
            Self::Int32 => Some(5),
            Self::Int64 | Self::Float64 => Some(9),
            Self::String | Self::List | Self::Map | Self::Structure => None,
        }
    }
}

/// The marker bytes of one variable-length type, one per size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Family {
    pub tag: TypeTag,
    pub tiny: u8,
    pub size_8: u8,
    pub size_16: u8,
    pub size_32: Option<u8>,
}

pub const STRING_FAMILY: Family = Family {
    tag: TypeTag::String,
    tiny: TINY_STRING_NIBBLE,
    size_8: STRING_8,
    size_16: STRING_16,
    size_32: Some(STRING_32),
};

pub const LIST_FAMILY: Family = Family {
    tag: TypeTag::List,
    tiny: TINY_LIST_NIBBLE,
    size_8: LIST_8,
    size_16: LIST_16,
    size_32: Some(LIST_32),
};

pub const MAP_FAMILY: Family = Family {
    tag: TypeTag::Map,
    tiny: TINY_MAP_NIBBLE,
    size_8: MAP_8,
    size_16: MAP_16,
    size_32: Some(MAP_32),
};

pub const STRUCT_FAMILY: Family = Family {
    tag: TypeTag::Structure,
    tiny: TINY_STRUCT_NIBBLE,
    size_8: STRUCT_8,
    size_16: STRUCT_16,
    size_32: None,
};

impl Family {
    /// Largest size the widest class of this family can carry.
    pub const fn max_len(&self) -> u64 {
        match self.size_32 {
            Some(_) => u32::MAX as u64,
            None => u16::MAX as u64,
        }
    }

    /// Bytes taken by the marker plus the size field (1, 2, 3 or 5), or
    /// `None` if `m` does not belong to this family.
    pub fn header_size(&self, m: u8) -> Option<usize> {
        if m & 0xF0 == self.tiny {
            Some(1)
        } else if m == self.size_8 {
            Some(2)
        } else if m == self.size_16 {
            Some(3)
        } else if Some(m) == self.size_32 {
            Some(5)
        } else {
            None
        }
    }
}

/// Classifies a marker byte, or `None` if the byte is not a marker.
pub fn try_classify(m: u8) -> Option<TypeTag> {
    // TINY_INT: the byte read as i8 lies in -16..=127.
    if (TINY_INT_MIN..=TINY_INT_MAX).contains(&i64::from(m as i8)) {
        return Some(TypeTag::TinyInt);
    }

    let tag = match m {
        NULL => TypeTag::Null,
        FALSE | TRUE => TypeTag::Bool,
        INT_8 => TypeTag::Int8,
        INT_16 => TypeTag::Int16,
        INT_32 => TypeTag::Int32,
        INT_64 => TypeTag::Int64,
        FLOAT_64 => TypeTag::Float64,
        0x80..=0x8F | STRING_8 | STRING_16 | STRING_32 => TypeTag::String,
        0x90..=0x9F | LIST_8 | LIST_16 | LIST_32 => TypeTag::List,
        0xA0..=0xAF | MAP_8 | MAP_16 | MAP_32 => TypeTag::Map,
        0xB0..=0xBF | STRUCT_8 | STRUCT_16 => TypeTag::Structure,
        _ => return None,
    };
    Some(tag)
}

/// Classifies a marker byte. Total over all bytes: unmapped bytes
/// classify as `Null`.
pub fn classify(m: u8) -> TypeTag {
    try_classify(m).unwrap_or(TypeTag::Null)
}
