//! Error types for tag access operations.

use std::io;
use thiserror::Error;

use crate::types::TagType;

/// Result type alias for tag operations.
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors that can occur while reading or writing a tag.
///
/// Each variant corresponds to one failure bucket, checked in order:
/// address validation and value parsing happen before any connection is
/// attempted, connection setup before any protocol exchange.
#[derive(Debug, Error)]
pub enum TagError {
    /// Tag address failed validation before any I/O was attempted.
    #[error("invalid tag address: {reason}")]
    InvalidAddress {
        /// Description of the validation failure.
        reason: String,
    },

    /// Declared type is not one of the supported tag types.
    #[error("unsupported tag type \"{type_name}\"")]
    UnsupportedType {
        /// The type name as supplied by the caller.
        type_name: String,
    },

    /// Write input could not be parsed as the declared type.
    #[error("cannot parse \"{input}\" as {expected}")]
    InvalidValue {
        /// The raw input string.
        input: String,
        /// The declared type the input was parsed against.
        expected: TagType,
    },

    /// Connection to the controller could not be established.
    #[error("connection failed: {reason}")]
    Connection {
        /// Description of the connection failure.
        reason: String,
    },

    /// The controller rejected the request or returned a malformed reply.
    #[error("protocol error: {reason}")]
    Protocol {
        /// Description of the protocol failure.
        reason: String,
    },

    /// Communication timeout.
    #[error("communication timeout")]
    Timeout,

    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TagError {
    /// Creates a new `InvalidAddress` error.
    ///
    /// # Example
    ///
    /// ```
    /// use eip_tags::TagError;
    ///
    /// let err = TagError::invalid_address("variable name is empty");
    /// ```
    pub fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            reason: reason.into(),
        }
    }

    /// Creates a new `UnsupportedType` error.
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Creates a new `InvalidValue` error.
    ///
    /// # Example
    ///
    /// ```
    /// use eip_tags::{TagError, TagType};
    ///
    /// let err = TagError::invalid_value("abc", TagType::Int);
    /// ```
    pub fn invalid_value(input: impl Into<String>, expected: TagType) -> Self {
        Self::InvalidValue {
            input: input.into(),
            expected,
        }
    }

    /// Creates a new `Connection` error.
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// Creates a new `Protocol` error.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }
}
