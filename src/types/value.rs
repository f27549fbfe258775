//! PackStream value types.

use std::collections::HashMap;
use std::fmt;

use crate::error::{PackError, PackResult};

/// Type alias for PackStream maps (string keys only).
pub type PackMap = HashMap<String, PackValue>;

/// Largest signature a structure may carry.
pub const MAX_SIGNATURE: u8 = 0x7F;

/// A value in the PackStream format.
#[derive(Debug, Clone, PartialEq)]
pub enum PackValue {
    Null,
    Bool(bool),
    /// Decodes to the plain value regardless of the encoded width.
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PackValue>),
    Map(PackMap),
    Structure(PackStructure),
}

/// A signature-tagged record: a signature byte plus ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PackStructure {
    pub signature: u8,
    pub fields: Vec<PackValue>,
}

impl PackStructure {
    /// Creates a structure, rejecting signatures above 127.
    pub fn new(signature: u8, fields: Vec<PackValue>) -> PackResult<Self> {
        check_signature(signature)?;
        Ok(Self { signature, fields })
    }
}

pub(crate) fn check_signature(signature: u8) -> PackResult<()> {
    if signature > MAX_SIGNATURE {
        Err(PackError::NotPackable(format!(
            "structure signature 0x{signature:02X} exceeds 0x7F"
        )))
    } else {
        Ok(())
    }
}

impl PackValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Int` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string reference, if it is a `Str` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PackValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PackMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&PackStructure> {
        match self {
            Self::Structure(s) => Some(s),
            _ => None,
        }
    }
}

// -- Convenience conversions --

impl From<()> for PackValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for PackValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i8> for PackValue {
    fn from(i: i8) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i16> for PackValue {
    fn from(i: i16) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i32> for PackValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for PackValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u8> for PackValue {
    fn from(i: u8) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u16> for PackValue {
    fn from(i: u16) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for PackValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl TryFrom<u64> for PackValue {
    type Error = PackError;

    fn try_from(i: u64) -> PackResult<Self> {
        i64::try_from(i)
            .map(Self::Int)
            .map_err(|_| PackError::NotPackable(format!("integer {i} exceeds 64-bit signed range")))
    }
}

impl TryFrom<usize> for PackValue {
    type Error = PackError;

    fn try_from(i: usize) -> PackResult<Self> {
        i64::try_from(i)
            .map(Self::Int)
            .map_err(|_| PackError::NotPackable(format!("integer {i} exceeds 64-bit signed range")))
    }
}

impl TryFrom<i128> for PackValue {
    type Error = PackError;

    fn try_from(i: i128) -> PackResult<Self> {
        i64::try_from(i)
            .map(Self::Int)
            .map_err(|_| PackError::NotPackable(format!("integer {i} exceeds 64-bit signed range")))
    }
}

impl From<f64> for PackValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for PackValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for PackValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<Vec<PackValue>> for PackValue {
    fn from(v: Vec<PackValue>) -> Self {
        Self::List(v)
    }
}

impl From<PackMap> for PackValue {
    fn from(m: PackMap) -> Self {
        Self::Map(m)
    }
}

impl From<PackStructure> for PackValue {
    fn from(s: PackStructure) -> Self {
        Self::Structure(s)
    }
}

impl fmt::Display for PackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Structure(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for PackStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct<0x{:02X}>(", self.signature)?;
        write_joined(f, &self.fields)?;
        write!(f, ")")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[PackValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_signature_limit() {
        assert!(PackStructure::new(0x7F, vec![]).is_ok());
        assert!(matches!(
            PackStructure::new(0x80, vec![]),
            Err(PackError::NotPackable(_))
        ));
    }

    #[test]
    fn checked_integer_conversions() {
        assert_eq!(PackValue::try_from(42u64), Ok(PackValue::Int(42)));
        assert_eq!(
            PackValue::try_from(i64::MAX as u64),
            Ok(PackValue::Int(i64::MAX))
        );
        assert!(matches!(
            PackValue::try_from(u64::MAX),
            Err(PackError::NotPackable(_))
        ));
        assert!(matches!(
            PackValue::try_from(i128::from(i64::MIN) - 1),
            Err(PackError::NotPackable(_))
        ));
        assert_eq!(PackValue::try_from(7usize), Ok(PackValue::Int(7)));
    }

    #[test]
    fn structural_equality() {
        let a = PackValue::List(vec![PackValue::Int(1), PackValue::from("x")]);
        let b = PackValue::List(vec![PackValue::Int(1), PackValue::from("x")]);
        let c = PackValue::List(vec![PackValue::Float(1.0), PackValue::from("x")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_nested() {
        let s = PackStructure::new(0x4E, vec![PackValue::Int(1), PackValue::Null]).unwrap();
        let v = PackValue::List(vec![PackValue::Bool(true), PackValue::Structure(s)]);
        assert_eq!(v.to_string(), "[true, struct<0x4E>(1, null)]");
    }

    #[test]
    fn accessors() {
        assert_eq!(PackValue::from("a").as_str(), Some("a"));
        assert_eq!(PackValue::Int(3).as_int(), Some(3));
        assert_eq!(PackValue::Int(3).as_str(), None);
        assert!(PackValue::from(()).is_null());
        assert_eq!(PackValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(PackValue::Bool(false).as_bool(), Some(false));
    }
}
