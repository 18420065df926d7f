//! In-memory protocol client for demos and tests.
//!
//! [`SimPlc`] stands in for a real controller: it stores tag bytes in memory
//! and hands out one [`SimChannel`] per operation, exactly the lifecycle a
//! native protocol client follows. It also records a journal of channel
//! events and can inject connection and timeout faults, which is what the
//! facade's behavioral tests are written against.
//!
//! # Example
//!
//! ```
//! use eip_tags::{SimPlc, TagAccess, TagAddress, TagType, TagValue};
//!
//! let plc = SimPlc::new();
//! plc.preload("Machine.Speed", &TagValue::Real(12.5));
//!
//! let access = TagAccess::new(plc.clone());
//! let addr = TagAddress::new("Machine.Speed", "192.168.250.1");
//! assert_eq!(
//!     access.read_variable(&addr, TagType::Real).unwrap(),
//!     TagValue::Real(12.5)
//! );
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::TagBuffer;
use crate::channel::{ChannelConfig, TagChannel, TagChannelFactory};
use crate::error::{Result, TagError};
use crate::types::TagValue;

#[derive(Default)]
struct SimState {
    tags: HashMap<String, Vec<u8>>,
    journal: Vec<String>,
    fail_connect: bool,
    timeout_reads: bool,
    timeout_writes: bool,
}

/// Simulated controller with shared in-memory tag storage.
///
/// Cloning is cheap and shares the same storage, so a clone can be handed to
/// [`TagAccess`](crate::TagAccess) as the channel factory while the original
/// is kept for preloading values and inspecting the journal.
#[derive(Clone, Default)]
pub struct SimPlc {
    state: Arc<Mutex<SimState>>,
}

impl SimPlc {
    /// Creates a simulator with no tags defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a tag and stores `value` as its current raw bytes.
    pub fn preload(&self, name: impl Into<String>, value: &TagValue) {
        let mut buffer = TagBuffer::new();
        match value {
            TagValue::Bool(v) => buffer.set_bit(0, *v),
            TagValue::Int(v) => buffer.set_i16(0, *v),
            TagValue::Uint(v) => buffer.set_u16(0, *v),
            TagValue::Real(v) => buffer.set_f32(0, *v),
            TagValue::Lreal(v) => buffer.set_f64(0, *v),
            TagValue::String(v) => buffer.set_string(0, v),
        }
        self.state
            .lock()
            .tags
            .insert(name.into(), buffer.as_bytes().to_vec());
    }

    /// Returns the raw bytes currently stored for a tag, if it exists.
    pub fn tag_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.state.lock().tags.get(name).cloned()
    }

    /// Makes every subsequent `connect()` fail with a connection error.
    pub fn fail_connect(&self, fail: bool) {
        self.state.lock().fail_connect = fail;
    }

    /// Makes every subsequent protocol-level read time out.
    pub fn timeout_reads(&self, timeout: bool) {
        self.state.lock().timeout_reads = timeout;
    }

    /// Makes every subsequent protocol-level write time out.
    pub fn timeout_writes(&self, timeout: bool) {
        self.state.lock().timeout_writes = timeout;
    }

    /// Returns the recorded channel events, oldest first.
    ///
    /// Each entry is `"<event> <tag>"` where event is one of `open`,
    /// `connect`, `read`, `write`, `close`.
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().journal.clone()
    }

    /// Clears the recorded channel events.
    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    fn record(&self, event: &str, tag: &str) {
        self.state.lock().journal.push(format!("{event} {tag}"));
    }
}

impl std::fmt::Debug for SimPlc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SimPlc")
            .field("tags", &state.tags.len())
            .field("journal", &state.journal.len())
            .finish()
    }
}

impl TagChannelFactory for SimPlc {
    type Channel = SimChannel;

    fn open(&self, config: &ChannelConfig) -> Result<Self::Channel> {
        self.record("open", &config.address.name);
        Ok(SimChannel {
            plc: self.clone(),
            tag: config.address.name.clone(),
            buffer: TagBuffer::new(),
            connected: false,
            closed: false,
        })
    }
}

/// One simulated connection, scoped to a single operation.
pub struct SimChannel {
    plc: SimPlc,
    tag: String,
    buffer: TagBuffer,
    connected: bool,
    closed: bool,
}

impl TagChannel for SimChannel {
    fn connect(&mut self) -> Result<()> {
        self.plc.record("connect", &self.tag);
        if self.plc.state.lock().fail_connect {
            return Err(TagError::connection("gateway unreachable"));
        }
        self.connected = true;
        Ok(())
    }

    fn read(&mut self) -> Result<()> {
        self.plc.record("read", &self.tag);
        if !self.connected {
            return Err(TagError::protocol("channel is not connected"));
        }
        let state = self.plc.state.lock();
        if state.timeout_reads {
            return Err(TagError::Timeout);
        }
        match state.tags.get(&self.tag) {
            Some(bytes) => {
                self.buffer.load(bytes);
                Ok(())
            }
            None => Err(TagError::protocol(format!("no tag named \"{}\"", self.tag))),
        }
    }

    fn write(&mut self) -> Result<()> {
        self.plc.record("write", &self.tag);
        if !self.connected {
            return Err(TagError::protocol("channel is not connected"));
        }
        let mut state = self.plc.state.lock();
        if state.timeout_writes {
            return Err(TagError::Timeout);
        }
        state
            .tags
            .insert(self.tag.clone(), self.buffer.as_bytes().to_vec());
        Ok(())
    }

    fn get_bit(&self, offset: usize) -> Result<bool> {
        self.buffer.get_bit(offset)
    }

    fn set_bit(&mut self, offset: usize, value: bool) -> Result<()> {
        self.buffer.set_bit(offset, value);
        Ok(())
    }

    fn get_i16(&self, offset: usize) -> Result<i16> {
        self.buffer.get_i16(offset)
    }

    fn set_i16(&mut self, offset: usize, value: i16) -> Result<()> {
        self.buffer.set_i16(offset, value);
        Ok(())
    }

    fn get_u16(&self, offset: usize) -> Result<u16> {
        self.buffer.get_u16(offset)
    }

    fn set_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.buffer.set_u16(offset, value);
        Ok(())
    }

    fn get_f32(&self, offset: usize) -> Result<f32> {
        self.buffer.get_f32(offset)
    }

    fn set_f32(&mut self, offset: usize, value: f32) -> Result<()> {
        self.buffer.set_f32(offset, value);
        Ok(())
    }

    fn get_f64(&self, offset: usize) -> Result<f64> {
        self.buffer.get_f64(offset)
    }

    fn set_f64(&mut self, offset: usize, value: f64) -> Result<()> {
        self.buffer.set_f64(offset, value);
        Ok(())
    }

    fn get_string(&self, offset: usize) -> Result<String> {
        self.buffer.get_string(offset)
    }

    fn set_string(&mut self, offset: usize, value: &str) -> Result<()> {
        self.buffer.set_string(offset, value);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.connected = false;
            self.plc.record("close", &self.tag);
        }
    }
}

impl std::fmt::Debug for SimChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimChannel")
            .field("tag", &self.tag)
            .field("connected", &self.connected)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::TagAddress;

    fn open_channel(plc: &SimPlc, name: &str) -> SimChannel {
        let config = ChannelConfig::new(TagAddress::new(name, "192.168.250.1"));
        plc.open(&config).unwrap()
    }

    #[test]
    fn test_read_missing_tag_is_protocol_error() {
        let plc = SimPlc::new();
        let mut channel = open_channel(&plc, "Nope");
        channel.connect().unwrap();
        let err = channel.read().unwrap_err();
        assert!(matches!(err, TagError::Protocol { .. }));
    }

    #[test]
    fn test_read_before_connect_fails() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        let mut channel = open_channel(&plc, "Counter");
        assert!(channel.read().is_err());
    }

    #[test]
    fn test_write_then_read_back() {
        let plc = SimPlc::new();
        let mut channel = open_channel(&plc, "Counter");
        channel.connect().unwrap();
        channel.set_i16(0, -5).unwrap();
        channel.write().unwrap();

        let mut reader = open_channel(&plc, "Counter");
        reader.connect().unwrap();
        reader.read().unwrap();
        assert_eq!(reader.get_i16(0).unwrap(), -5);
    }

    #[test]
    fn test_fail_connect_injection() {
        let plc = SimPlc::new();
        plc.fail_connect(true);
        let mut channel = open_channel(&plc, "Counter");
        let err = channel.connect().unwrap_err();
        assert!(matches!(err, TagError::Connection { .. }));
    }

    #[test]
    fn test_timeout_injection() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        plc.timeout_reads(true);
        let mut channel = open_channel(&plc, "Counter");
        channel.connect().unwrap();
        assert!(matches!(channel.read().unwrap_err(), TagError::Timeout));
    }

    #[test]
    fn test_close_is_idempotent() {
        let plc = SimPlc::new();
        let mut channel = open_channel(&plc, "Counter");
        channel.close();
        channel.close();
        let closes = plc
            .journal()
            .iter()
            .filter(|e| e.as_str() == "close Counter")
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_journal_records_lifecycle() {
        let plc = SimPlc::new();
        plc.preload("Counter", &TagValue::Int(7));
        let mut channel = open_channel(&plc, "Counter");
        channel.connect().unwrap();
        channel.read().unwrap();
        channel.close();
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
    fn test_preload_layout_matches_buffer() {
        let plc = SimPlc::new();
        plc.preload("Speed", &TagValue::Uint(0x1234));
        assert_eq!(plc.tag_bytes("Speed").unwrap(), vec![0x34, 0x12]);
    }
}
