//! Protocol channel abstraction for tag I/O.
//!
//! The wire protocol (CIP/EtherNet-IP framing, controller addressing,
//! byte-level encoding) is not implemented here. This module defines the
//! capability set the facade requires from a conforming protocol client:
//! a [`TagChannel`] scoped to a single operation, created by a
//! [`TagChannelFactory`] from a [`ChannelConfig`].
//!
//! A channel's lifecycle is always: open → [`connect`](TagChannel::connect) →
//! one [`read`](TagChannel::read) or one [`write`](TagChannel::write) →
//! [`close`](TagChannel::close). Channels are never pooled or reused across
//! operations.
//!
//! The crate ships one implementation, the in-memory
//! [`SimPlc`](crate::SimPlc); bindings to a native tag library implement the
//! same traits.

use std::time::Duration;

use crate::address::TagAddress;
use crate::error::Result;

/// Default per-operation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Controller families a channel can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlcKind {
    /// Allen-Bradley ControlLogix/CompactLogix.
    ControlLogix,
    /// Allen-Bradley Micro800 series.
    Micro800,
    /// Omron NJ/NX series.
    #[default]
    Omron,
    /// Allen-Bradley SLC 500 series.
    Slc500,
}

/// Wire protocol variants a channel can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireProtocol {
    /// EtherNet/IP (CIP over TCP).
    #[default]
    AbEip,
    /// Modbus TCP.
    ModbusTcp,
}

/// Everything needed to open a channel for one operation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use eip_tags::{ChannelConfig, PlcKind, TagAddress};
///
/// let config = ChannelConfig::new(TagAddress::new("Machine.Speed", "192.168.250.1"))
///     .with_controller(PlcKind::Omron)
///     .with_timeout(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Address of the tag the channel is bound to.
    pub address: TagAddress,
    /// Controller family at the far end.
    pub controller: PlcKind,
    /// Wire protocol variant.
    pub protocol: WireProtocol,
    /// Bound on each protocol exchange; a channel never blocks past it.
    pub timeout: Duration,
}

impl ChannelConfig {
    /// Creates a configuration with the deployment defaults: Omron controller
    /// over EtherNet/IP with a 500 ms timeout.
    pub fn new(address: TagAddress) -> Self {
        Self {
            address,
            controller: PlcKind::default(),
            protocol: WireProtocol::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the controller family.
    pub fn with_controller(mut self, controller: PlcKind) -> Self {
        self.controller = controller;
        self
    }

    /// Sets the wire protocol variant.
    pub fn with_protocol(mut self, protocol: WireProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One protocol-client connection scoped to a single operation.
///
/// Implementations hold the tag's local data buffer: [`read`](TagChannel::read)
/// fills it from the controller, the typed getters decode from it, the typed
/// setters encode into it, and [`write`](TagChannel::write) flushes it back.
/// All offsets are byte offsets into that buffer.
pub trait TagChannel {
    /// Establishes the connection.
    ///
    /// Fails with [`TagError::Connection`](crate::TagError::Connection) if
    /// the gateway is unreachable or the address is malformed.
    fn connect(&mut self) -> Result<()>;

    /// Performs one protocol-level read into the local buffer.
    fn read(&mut self) -> Result<()>;

    /// Flushes the local buffer to the controller in one protocol-level write.
    fn write(&mut self) -> Result<()>;

    /// Reads bit 0 of the byte at `offset`.
    fn get_bit(&self, offset: usize) -> Result<bool>;

    /// Sets bit 0 of the byte at `offset`.
    fn set_bit(&mut self, offset: usize, value: bool) -> Result<()>;

    /// Reads a signed 16-bit value at `offset`.
    fn get_i16(&self, offset: usize) -> Result<i16>;

    /// Writes a signed 16-bit value at `offset`.
    fn set_i16(&mut self, offset: usize, value: i16) -> Result<()>;

    /// Reads an unsigned 16-bit value at `offset`.
    fn get_u16(&self, offset: usize) -> Result<u16>;

    /// Writes an unsigned 16-bit value at `offset`.
    fn set_u16(&mut self, offset: usize, value: u16) -> Result<()>;

    /// Reads a 32-bit float at `offset`.
    fn get_f32(&self, offset: usize) -> Result<f32>;

    /// Writes a 32-bit float at `offset`.
    fn set_f32(&mut self, offset: usize, value: f32) -> Result<()>;

    /// Reads a 64-bit float at `offset`.
    fn get_f64(&self, offset: usize) -> Result<f64>;

    /// Writes a 64-bit float at `offset`.
    fn set_f64(&mut self, offset: usize, value: f64) -> Result<()>;

    /// Reads a string at `offset`.
    fn get_string(&self, offset: usize) -> Result<String>;

    /// Writes a string at `offset`.
    fn set_string(&mut self, offset: usize, value: &str) -> Result<()>;

    /// Releases the underlying resources. Idempotent.
    fn close(&mut self);
}

/// Opens a fresh [`TagChannel`] per operation.
///
/// The facade calls this once at the start of every read or write; the
/// returned channel is used for exactly that operation and then closed.
pub trait TagChannelFactory {
    /// Channel type this factory produces.
    type Channel: TagChannel;

    /// Opens a channel for the configured tag.
    ///
    /// Construction failure (bad address syntax, resource exhaustion) is
    /// reported here; reachability is checked by
    /// [`connect`](TagChannel::connect).
    fn open(&self, config: &ChannelConfig) -> Result<Self::Channel>;
}
