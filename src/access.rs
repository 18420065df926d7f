//! The typed tag access facade.
//!
//! [`TagAccess`] is the component the host UI calls: it turns a (variable
//! name, gateway, declared type, value) tuple into one correctly-encoded,
//! correctly-sequenced read or write against the protocol client, and maps
//! every failure into a [`TagError`] the caller can present to an operator.
//!
//! Each operation is fully self-contained. The facade validates the address,
//! takes the exclusive section for its operation kind, opens a fresh channel,
//! connects, performs exactly one protocol exchange, and closes the channel
//! on every exit path. No channel is pooled, shared, or reused.
//!
//! # Concurrency
//!
//! Two independent locks serialize reads against reads and writes against
//! writes; a read and a write may overlap. Overlapping UI-triggered requests
//! of the same kind therefore queue instead of interleaving their
//! open/connect/exchange/close sequences against the controller.
//!
//! # Example
//!
//! ```
//! use eip_tags::{SimPlc, TagAccess, TagAddress, TagType, TagValue};
//!
//! let plc = SimPlc::new();
//! plc.preload("Machine.Speed", &TagValue::Real(0.0));
//!
//! let access = TagAccess::new(plc.clone());
//! let addr = TagAddress::new("Machine.Speed", "192.168.250.1");
//!
//! access.write_variable(&addr, TagType::Real, "12.5")?;
//! let value = access.read_variable(&addr, TagType::Real)?;
//! assert_eq!(value, TagValue::Real(12.5));
//! # Ok::<(), eip_tags::TagError>(())
//! ```

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::address::TagAddress;
use crate::channel::{ChannelConfig, PlcKind, TagChannel, TagChannelFactory, WireProtocol};
use crate::error::Result;
use crate::types::{TagType, TagValue};

/// Byte offset of the value within the tag's local buffer.
const VALUE_OFFSET: usize = 0;

/// Typed read/write access to single named variables on a controller.
///
/// Generic over the [`TagChannelFactory`] that produces per-operation
/// protocol channels; holds no session state beyond its two exclusion locks.
pub struct TagAccess<F> {
    factory: F,
    controller: PlcKind,
    protocol: WireProtocol,
    timeout: Duration,
    read_lock: Mutex<()>,
    write_lock: Mutex<()>,
}

impl<F: TagChannelFactory> TagAccess<F> {
    /// Creates a facade with the deployment defaults: Omron controller over
    /// EtherNet/IP with a 500 ms per-operation timeout.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            controller: PlcKind::default(),
            protocol: WireProtocol::default(),
            timeout: crate::channel::DEFAULT_TIMEOUT,
            read_lock: Mutex::new(()),
            write_lock: Mutex::new(()),
        }
    }

    /// Sets the controller family used for every channel.
    pub fn with_controller(mut self, controller: PlcKind) -> Self {
        self.controller = controller;
        self
    }

    /// Sets the wire protocol variant used for every channel.
    pub fn with_protocol(mut self, protocol: WireProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the variable at `address`, decoded as `declared`.
    ///
    /// # Errors
    ///
    /// - [`TagError::InvalidAddress`](crate::TagError::InvalidAddress) if the
    ///   address fails validation; no connection is attempted.
    /// - [`TagError::Connection`](crate::TagError::Connection) if the channel
    ///   cannot be opened or connected.
    /// - [`TagError::Timeout`](crate::TagError::Timeout) /
    ///   [`TagError::Protocol`](crate::TagError::Protocol) if the protocol
    ///   exchange fails or the reply cannot be decoded as `declared`.
    ///
    /// The channel is closed on every exit path.
    pub fn read_variable(&self, address: &TagAddress, declared: TagType) -> Result<TagValue> {
        address.validate()?;
        let _op = self.read_lock.lock();
        debug!(tag = %address, %declared, "read variable");

        let mut channel = ChannelGuard::new(self.open(address)?);
        channel.connect()?;
        channel.read()?;
        decode_value(&*channel, declared)
    }

    /// Parses `raw` as `declared` and writes it to the variable at `address`.
    ///
    /// # Errors
    ///
    /// - [`TagError::InvalidAddress`](crate::TagError::InvalidAddress) if the
    ///   address fails validation.
    /// - [`TagError::InvalidValue`](crate::TagError::InvalidValue) if `raw`
    ///   cannot be parsed as `declared`; reported before any network I/O.
    /// - [`TagError::Connection`](crate::TagError::Connection) /
    ///   [`TagError::Timeout`](crate::TagError::Timeout) /
    ///   [`TagError::Protocol`](crate::TagError::Protocol) as for reads.
    pub fn write_variable(&self, address: &TagAddress, declared: TagType, raw: &str) -> Result<()> {
        address.validate()?;
        let value = TagValue::parse(declared, raw)?;
        let _op = self.write_lock.lock();
        debug!(tag = %address, %declared, "write variable");

        let mut channel = ChannelGuard::new(self.open(address)?);
        channel.connect()?;
        encode_value(&mut *channel, &value)?;
        channel.write()
    }

    fn open(&self, address: &TagAddress) -> Result<F::Channel> {
        let config = ChannelConfig::new(address.clone())
            .with_controller(self.controller)
            .with_protocol(self.protocol)
            .with_timeout(self.timeout);
        self.factory.open(&config)
    }
}

impl<F> std::fmt::Debug for TagAccess<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagAccess")
            .field("controller", &self.controller)
            .field("protocol", &self.protocol)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Closes the wrapped channel when dropped, so disposal happens on every
/// exit path, including early returns from decode failures.
struct ChannelGuard<C: TagChannel> {
    channel: C,
}

impl<C: TagChannel> ChannelGuard<C> {
    fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: TagChannel> Deref for ChannelGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.channel
    }
}

impl<C: TagChannel> DerefMut for ChannelGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

impl<C: TagChannel> Drop for ChannelGuard<C> {
    fn drop(&mut self) {
        self.channel.close();
    }
}

/// Decode side of the type dispatch table: raw tag bytes to a typed value.
fn decode_value<C: TagChannel>(channel: &C, declared: TagType) -> Result<TagValue> {
    match declared {
        TagType::Bool => channel.get_bit(VALUE_OFFSET).map(TagValue::Bool),
        TagType::Int => channel.get_i16(VALUE_OFFSET).map(TagValue::Int),
        TagType::Uint => channel.get_u16(VALUE_OFFSET).map(TagValue::Uint),
        TagType::Real => channel.get_f32(VALUE_OFFSET).map(TagValue::Real),
        TagType::Lreal => channel.get_f64(VALUE_OFFSET).map(TagValue::Lreal),
        TagType::String => channel.get_string(VALUE_OFFSET).map(TagValue::String),
    }
}

/// Encode side of the type dispatch table: a typed value into the tag's
/// local buffer. Symmetric with [`decode_value`].
fn encode_value<C: TagChannel>(channel: &mut C, value: &TagValue) -> Result<()> {
    match value {
        TagValue::Bool(v) => channel.set_bit(VALUE_OFFSET, *v),
        TagValue::Int(v) => channel.set_i16(VALUE_OFFSET, *v),
        TagValue::Uint(v) => channel.set_u16(VALUE_OFFSET, *v),
        TagValue::Real(v) => channel.set_f32(VALUE_OFFSET, *v),
        TagValue::Lreal(v) => channel.set_f64(VALUE_OFFSET, *v),
        TagValue::String(v) => channel.set_string(VALUE_OFFSET, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TagError;
    use crate::sim::SimPlc;
    use std::sync::Arc;
    use std::thread;

    const GATEWAY: &str = "192.168.250.1";

    fn close_count(plc: &SimPlc, tag: &str) -> usize {
        let event = format!("close {tag}");
        plc.journal().iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_roundtrip_every_type() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Roundtrip", GATEWAY);

        let cases = [
            (TagType::Bool, "true", TagValue::Bool(true)),
            (TagType::Int, "-1234", TagValue::Int(-1234)),
            (TagType::Uint, "54321", TagValue::Uint(54321)),
            (TagType::Real, "3.14159", TagValue::Real(3.14159)),
            (
                TagType::Lreal,
                "2.718281828459045",
                TagValue::Lreal(2.718281828459045),
            ),
            (
                TagType::String,
                "PRODUCT-001",
                TagValue::String("PRODUCT-001".to_string()),
            ),
        ];
        for (declared, raw, expected) in cases {
            access.write_variable(&addr, declared, raw).unwrap();
            let value = access.read_variable(&addr, declared).unwrap();
            assert_eq!(value, expected, "roundtrip failed for {declared}");
        }
    }

    #[test]
    fn test_read_empty_name_no_network() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("", GATEWAY);

        let err = access.read_variable(&addr, TagType::Real).unwrap_err();
        assert!(matches!(err, TagError::InvalidAddress { .. }));
        assert!(plc.journal().is_empty());
    }

    #[test]
    fn test_write_empty_gateway_no_network() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", "");

        let err = access
            .write_variable(&addr, TagType::Int, "1")
            .unwrap_err();
        assert!(matches!(err, TagError::InvalidAddress { .. }));
        assert!(plc.journal().is_empty());
    }

    #[test]
    fn test_unknown_declared_type_never_reaches_network() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());

        // The closed set is enforced at the type-name boundary.
        let err = "DWORD".parse::<TagType>().unwrap_err();
        assert!(matches!(err, TagError::UnsupportedType { .. }));
        let _ = access;
        assert!(plc.journal().is_empty());
    }

    #[test]
    fn test_write_parse_error_before_any_connection() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        let err = access
            .write_variable(&addr, TagType::Int, "not-a-number")
            .unwrap_err();
        assert!(matches!(err, TagError::InvalidValue { .. }));
        assert!(plc.journal().is_empty());
    }

    #[test]
    fn test_connect_failure_closes_channel_once() {
        let plc = SimPlc::new();
        plc.fail_connect(true);
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        let err = access.read_variable(&addr, TagType::Real).unwrap_err();
        assert!(matches!(err, TagError::Connection { .. }));
        assert_eq!(close_count(&plc, "Counter"), 1);
    }

    #[test]
    fn test_read_timeout_maps_to_timeout_error() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        plc.timeout_reads(true);
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        let err = access.read_variable(&addr, TagType::Int).unwrap_err();
        assert!(matches!(err, TagError::Timeout));
        assert_eq!(close_count(&plc, "Counter"), 1);
    }

    #[test]
    fn test_write_timeout_closes_channel() {
        let plc = SimPlc::new();
        plc.timeout_writes(true);
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        let err = access
            .write_variable(&addr, TagType::Int, "7")
            .unwrap_err();
        assert!(matches!(err, TagError::Timeout));
        assert_eq!(close_count(&plc, "Counter"), 1);
    }

    #[test]
    fn test_missing_tag_is_protocol_error() {
        let plc = SimPlc::new();
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Undefined", GATEWAY);

        let err = access.read_variable(&addr, TagType::Int).unwrap_err();
        assert!(matches!(err, TagError::Protocol { .. }));
        assert_eq!(close_count(&plc, "Undefined"), 1);
    }

    #[test]
    fn test_decode_failure_still_closes_channel() {
        let plc = SimPlc::new();
        // One byte stored; decoding as LREAL needs eight.
        plc.preload("Flag", &TagValue::Bool(true));
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Flag", GATEWAY);

        let err = access.read_variable(&addr, TagType::Lreal).unwrap_err();
        assert!(matches!(err, TagError::Protocol { .. }));
        assert_eq!(close_count(&plc, "Flag"), 1);
    }

    #[test]
    fn test_successful_read_lifecycle_order() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        access.read_variable(&addr, TagType::Int).unwrap();
        assert_eq!(
            plc.journal(),
            vec![
                "open Counter",
                "connect Counter",
                "read Counter",
                "close Counter"
            ]
        );
    }

    #[test]
    fn test_concurrent_reads_do_not_interleave() {
        let plc = SimPlc::new();
        plc.preload("TagA", &TagValue::Int(1));
        plc.preload("TagB", &TagValue::Int(2));
        let access = Arc::new(TagAccess::new(plc.clone()));

        let mut handles = Vec::new();
        for name in ["TagA", "TagB"] {
            let access = Arc::clone(&access);
            handles.push(thread::spawn(move || {
                let addr = TagAddress::new(name, GATEWAY);
                for _ in 0..8 {
                    access.read_variable(&addr, TagType::Int).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let journal = plc.journal();
        assert_eq!(journal.len(), 2 * 8 * 4);
        // Each operation's open/connect/read/close must form one
        // uninterrupted block in the shared journal.
        for chunk in journal.chunks(4) {
            let tag = chunk[0].strip_prefix("open ").expect("chunk starts with open");
            assert_eq!(chunk[1], format!("connect {tag}"));
            assert_eq!(chunk[2], format!("read {tag}"));
            assert_eq!(chunk[3], format!("close {tag}"));
        }
    }

    #[test]
    fn test_concurrent_writes_do_not_interleave() {
        let plc = SimPlc::new();
        let access = Arc::new(TagAccess::new(plc.clone()));

        let mut handles = Vec::new();
        for name in ["TagA", "TagB"] {
            let access = Arc::clone(&access);
            handles.push(thread::spawn(move || {
                let addr = TagAddress::new(name, GATEWAY);
                for i in 0..8 {
                    access
                        .write_variable(&addr, TagType::Int, &i.to_string())
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let journal = plc.journal();
        assert_eq!(journal.len(), 2 * 8 * 4);
        for chunk in journal.chunks(4) {
            let tag = chunk[0].strip_prefix("open ").expect("chunk starts with open");
            assert_eq!(chunk[1], format!("connect {tag}"));
            assert_eq!(chunk[2], format!("write {tag}"));
            assert_eq!(chunk[3], format!("close {tag}"));
        }
    }

    #[test]
    fn test_failed_read_leaves_stored_value_untouched() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        plc.timeout_reads(true);
        let access = TagAccess::new(plc.clone());
        let addr = TagAddress::new("Counter", GATEWAY);

        assert!(access.read_variable(&addr, TagType::Int).is_err());
        plc.timeout_reads(false);
        assert_eq!(
            access.read_variable(&addr, TagType::Int).unwrap(),
            TagValue::Int(7)
        );
    }
}
