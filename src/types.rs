//! Declared tag types and the values they carry.
//!
//! Every operation is associated with exactly one [`TagType`] from a closed
//! set. The type drives decode on read and encode on write; an operator who
//! declares `REAL` for a tag gets a 32-bit float, never a silent coercion.
//!
//! [`TagValue`] is the matching tagged union. A value always knows which
//! declared type produced it, so a read result can be displayed or compared
//! without consulting the request again.
//!
//! # Example
//!
//! ```
//! use eip_tags::{TagType, TagValue};
//!
//! let declared: TagType = "REAL".parse().unwrap();
//! let value = TagValue::parse(declared, "3.14").unwrap();
//! assert_eq!(value, TagValue::Real(3.14));
//! assert_eq!(value.tag_type(), TagType::Real);
//!
//! // Unknown type names are a hard error, never coerced.
//! assert!("WORD".parse::<TagType>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TagError};

/// Logical data types a tag can be declared as.
///
/// This set is closed: any type name outside it fails with
/// [`TagError::UnsupportedType`] at dispatch time, before any protocol
/// exchange is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TagType {
    /// Single bit.
    Bool,
    /// Signed 16-bit integer.
    Int,
    /// Unsigned 16-bit integer.
    Uint,
    /// 32-bit IEEE float.
    Real,
    /// 64-bit IEEE float.
    Lreal,
    /// Variable-length text.
    String,
}

impl TagType {
    /// All supported types, in declaration order.
    ///
    /// Useful for populating an operator-facing type selector.
    pub const ALL: [TagType; 6] = [
        TagType::Bool,
        TagType::Int,
        TagType::Uint,
        TagType::Real,
        TagType::Lreal,
        TagType::String,
    ];
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagType::Bool => write!(f, "BOOL"),
            TagType::Int => write!(f, "INT"),
            TagType::Uint => write!(f, "UINT"),
            TagType::Real => write!(f, "REAL"),
            TagType::Lreal => write!(f, "LREAL"),
            TagType::String => write!(f, "STRING"),
        }
    }
}

impl FromStr for TagType {
    type Err = TagError;

    /// Parses an IEC-style type name, case-insensitively.
    ///
    /// Anything outside the closed set, including the empty string, is
    /// [`TagError::UnsupportedType`].
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOL" => Ok(TagType::Bool),
            "INT" => Ok(TagType::Int),
            "UINT" => Ok(TagType::Uint),
            "REAL" => Ok(TagType::Real),
            "LREAL" => Ok(TagType::Lreal),
            "STRING" => Ok(TagType::String),
            _ => Err(TagError::unsupported_type(s)),
        }
    }
}

/// Value of a tag, tagged by the declared type that produced it.
///
/// Produced by decoding raw tag bytes on read, or by
/// [`parse`](TagValue::parse) on write. Both sites match exhaustively over
/// [`TagType`], so adding a type to the closed set is a compile error until
/// every dispatch table handles it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    /// BOOL value.
    Bool(bool),
    /// INT value.
    Int(i16),
    /// UINT value.
    Uint(u16),
    /// REAL value.
    Real(f32),
    /// LREAL value.
    Lreal(f64),
    /// STRING value.
    String(String),
}

impl TagValue {
    /// Returns the declared type this value corresponds to.
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Bool(_) => TagType::Bool,
            TagValue::Int(_) => TagType::Int,
            TagValue::Uint(_) => TagType::Uint,
            TagValue::Real(_) => TagType::Real,
            TagValue::Lreal(_) => TagType::Lreal,
            TagValue::String(_) => TagType::String,
        }
    }

    /// Parses operator input into a value of the declared type.
    ///
    /// Numeric and boolean input is trimmed before parsing; STRING input is
    /// taken verbatim, and the empty string is a valid STRING value.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidValue`] if the input cannot be parsed as
    /// the declared type, including integer input outside the 16-bit range.
    ///
    /// # Example
    ///
    /// ```
    /// use eip_tags::{TagType, TagValue};
    ///
    /// assert_eq!(
    ///     TagValue::parse(TagType::Bool, "TRUE").unwrap(),
    ///     TagValue::Bool(true)
    /// );
    /// assert_eq!(
    ///     TagValue::parse(TagType::Uint, "65535").unwrap(),
    ///     TagValue::Uint(65535)
    /// );
    /// assert!(TagValue::parse(TagType::Int, "70000").is_err());
    /// ```
    pub fn parse(declared: TagType, input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match declared {
            TagType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Ok(TagValue::Bool(true)),
                "false" => Ok(TagValue::Bool(false)),
                _ => Err(TagError::invalid_value(input, declared)),
            },
            TagType::Int => trimmed
                .parse::<i16>()
                .map(TagValue::Int)
                .map_err(|_| TagError::invalid_value(input, declared)),
            TagType::Uint => trimmed
                .parse::<u16>()
                .map(TagValue::Uint)
                .map_err(|_| TagError::invalid_value(input, declared)),
            TagType::Real => trimmed
                .parse::<f32>()
                .map(TagValue::Real)
                .map_err(|_| TagError::invalid_value(input, declared)),
            TagType::Lreal => trimmed
                .parse::<f64>()
                .map(TagValue::Lreal)
                .map_err(|_| TagError::invalid_value(input, declared)),
            TagType::String => Ok(TagValue::String(input.to_string())),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(v) => write!(f, "{v}"),
            TagValue::Int(v) => write!(f, "{v}"),
            TagValue::Uint(v) => write!(f, "{v}"),
            TagValue::Real(v) => write!(f, "{v}"),
            TagValue::Lreal(v) => write!(f, "{v}"),
            TagValue::String(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_str() {
        assert_eq!("BOOL".parse::<TagType>().unwrap(), TagType::Bool);
        assert_eq!("int".parse::<TagType>().unwrap(), TagType::Int);
        assert_eq!(" Uint ".parse::<TagType>().unwrap(), TagType::Uint);
        assert_eq!("REAL".parse::<TagType>().unwrap(), TagType::Real);
        assert_eq!("lreal".parse::<TagType>().unwrap(), TagType::Lreal);
        assert_eq!("String".parse::<TagType>().unwrap(), TagType::String);
    }

    #[test]
    fn test_type_from_str_unknown() {
        let err = "DWORD".parse::<TagType>().unwrap_err();
        assert!(matches!(err, TagError::UnsupportedType { ref type_name } if type_name == "DWORD"));
    }

    #[test]
    fn test_type_from_str_empty() {
        assert!(matches!(
            "".parse::<TagType>().unwrap_err(),
            TagError::UnsupportedType { .. }
        ));
    }

    #[test]
    fn test_type_display() {
        for ty in TagType::ALL {
            assert_eq!(ty.to_string().parse::<TagType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(
            TagValue::parse(TagType::Bool, "true").unwrap(),
            TagValue::Bool(true)
        );
        assert_eq!(
            TagValue::parse(TagType::Bool, " FALSE ").unwrap(),
            TagValue::Bool(false)
        );
        assert!(TagValue::parse(TagType::Bool, "1").is_err());
    }

    #[test]
    fn test_parse_int_range() {
        assert_eq!(
            TagValue::parse(TagType::Int, "-32768").unwrap(),
            TagValue::Int(-32768)
        );
        assert_eq!(
            TagValue::parse(TagType::Int, "32767").unwrap(),
            TagValue::Int(32767)
        );
        assert!(TagValue::parse(TagType::Int, "32768").is_err());
        assert!(TagValue::parse(TagType::Int, "abc").is_err());
    }

    #[test]
    fn test_parse_uint_range() {
        assert_eq!(
            TagValue::parse(TagType::Uint, "0").unwrap(),
            TagValue::Uint(0)
        );
        assert_eq!(
            TagValue::parse(TagType::Uint, "65535").unwrap(),
            TagValue::Uint(65535)
        );
        assert!(TagValue::parse(TagType::Uint, "-1").is_err());
        assert!(TagValue::parse(TagType::Uint, "65536").is_err());
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(
            TagValue::parse(TagType::Real, "3.5").unwrap(),
            TagValue::Real(3.5)
        );
        assert_eq!(
            TagValue::parse(TagType::Lreal, "-2.25e3").unwrap(),
            TagValue::Lreal(-2250.0)
        );
        assert!(TagValue::parse(TagType::Real, "3,5").is_err());
    }

    #[test]
    fn test_parse_string_verbatim() {
        assert_eq!(
            TagValue::parse(TagType::String, "").unwrap(),
            TagValue::String(String::new())
        );
        assert_eq!(
            TagValue::parse(TagType::String, "  padded  ").unwrap(),
            TagValue::String("  padded  ".to_string())
        );
    }

    #[test]
    fn test_parse_error_names_declared_type() {
        let err = TagValue::parse(TagType::Int, "abc").unwrap_err();
        assert_eq!(err.to_string(), "cannot parse \"abc\" as INT");
    }

    #[test]
    fn test_value_tag_type() {
        assert_eq!(TagValue::Bool(true).tag_type(), TagType::Bool);
        assert_eq!(TagValue::Real(1.0).tag_type(), TagType::Real);
        assert_eq!(
            TagValue::String("x".to_string()).tag_type(),
            TagType::String
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(TagValue::Bool(true).to_string(), "true");
        assert_eq!(TagValue::Int(-42).to_string(), "-42");
        assert_eq!(TagValue::Real(2.5).to_string(), "2.5");
        assert_eq!(TagValue::String("run".to_string()).to_string(), "run");
    }
}
