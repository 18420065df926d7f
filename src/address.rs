//! Tag addressing.
//!
//! A [`TagAddress`] identifies one named variable on one controller: the
//! variable name as declared in the controller program, the network address
//! of the controller (or of the communication adapter in front of it), and
//! the CIP routing path from that gateway to the controller CPU.
//!
//! # Example
//!
//! ```
//! use eip_tags::TagAddress;
//!
//! let addr = TagAddress::new("DB.HMI.AxisX_SetPosition", "192.168.250.1");
//! assert_eq!(addr.path, "1,0");
//! assert!(addr.validate().is_ok());
//!
//! let bad = TagAddress::new("", "192.168.250.1");
//! assert!(bad.validate().is_err());
//! ```

use crate::error::{Result, TagError};

/// Default CIP routing path (backplane port 1, slot 0).
pub const DEFAULT_PATH: &str = "1,0";

/// Identifies one named variable on one controller.
///
/// `name` and `gateway` must be non-empty for any operation to proceed;
/// [`validate`](TagAddress::validate) checks both before any I/O is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagAddress {
    /// Variable name as declared in the controller program.
    pub name: String,
    /// Network address of the controller or communication adapter.
    pub gateway: String,
    /// CIP routing path from the gateway to the controller CPU.
    pub path: String,
}

impl TagAddress {
    /// Creates an address with the default routing path.
    ///
    /// # Example
    ///
    /// ```
    /// use eip_tags::TagAddress;
    ///
    /// let addr = TagAddress::new("Machine.Speed", "192.168.250.1");
    /// ```
    pub fn new(name: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gateway: gateway.into(),
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Sets a custom routing path.
    ///
    /// # Example
    ///
    /// ```
    /// use eip_tags::TagAddress;
    ///
    /// let addr = TagAddress::new("Machine.Speed", "192.168.250.1").with_path("1,2");
    /// assert_eq!(addr.path, "1,2");
    /// ```
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Checks the invariants required before any operation.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidAddress`] if `name` or `gateway` is empty
    /// or contains only whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TagError::invalid_address("variable name is empty"));
        }
        if self.gateway.trim().is_empty() {
            return Err(TagError::invalid_address("gateway address is empty"));
        }
        Ok(())
    }
}

impl std::fmt::Display for TagAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.gateway)
    }
}
