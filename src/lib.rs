//! # Typed Tag Access Facade
//!
//! A Rust library for reading and writing single named variables (tags) on
//! EtherNet/IP-class PLCs through a pluggable protocol client.
//!
//! This crate does **not** implement the CIP/EtherNet-IP wire protocol. It
//! implements the layer that sits directly above a conforming protocol
//! client: type dispatch from a declared tag type to the correct accessor
//! call, per-operation connection lifecycle, serialization of overlapping
//! requests, and mapping of every failure mode into a caller-presentable
//! error.
//!
//! ## Features
//!
//! - **Closed type set** — `BOOL`, `INT`, `UINT`, `REAL`, `LREAL`, `STRING`;
//!   unknown type names are a hard error, never coerced
//! - **One connection per operation** — constructed, connected, used for
//!   exactly one read or write, and closed on every exit path
//! - **No panics** — all errors returned as `Result<T, TagError>`
//! - **Deterministic ordering** — reads serialize against reads, writes
//!   against writes; lifecycles never interleave
//! - **Pluggable transport** — any type implementing [`TagChannel`] /
//!   [`TagChannelFactory`] plugs in; an in-memory [`SimPlc`] ships with the
//!   crate for demos and tests
//!
//! ## Quick Start
//!
//! ```
//! use eip_tags::{SimPlc, TagAccess, TagAddress, TagType, TagValue};
//!
//! fn main() -> eip_tags::Result<()> {
//!     // The simulator stands in for a real protocol client here.
//!     let plc = SimPlc::new();
//!     plc.preload("DB.HMI.AxisX_SetPosition", &TagValue::Real(0.0));
//!
//!     let access = TagAccess::new(plc.clone());
//!     let addr = TagAddress::new("DB.HMI.AxisX_SetPosition", "192.168.250.1");
//!
//!     // Write operator input, declared as REAL
//!     access.write_variable(&addr, TagType::Real, "125.5")?;
//!
//!     // Read it back, decoded as REAL
//!     let value = access.read_variable(&addr, TagType::Real)?;
//!     println!("{} = {}", addr, value);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Tag Types
//!
//! | Declared type | Rust type | Decode / encode at offset 0 |
//! |---------------|-----------|------------------------------|
//! | [`TagType::Bool`]   | `bool`   | single bit |
//! | [`TagType::Int`]    | `i16`    | signed 16-bit |
//! | [`TagType::Uint`]   | `u16`    | unsigned 16-bit |
//! | [`TagType::Real`]   | `f32`    | 32-bit float |
//! | [`TagType::Lreal`]  | `f64`    | 64-bit float |
//! | [`TagType::String`] | `String` | length-prefixed text |
//!
//! The set is closed: encode and decode match exhaustively over it, so the
//! two directions cannot drift apart.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, TagError>`]. The library never panics
//! in public code, and a failed operation never substitutes a default value.
//!
//! ```
//! use eip_tags::{SimPlc, TagAccess, TagAddress, TagError, TagType};
//!
//! let access = TagAccess::new(SimPlc::new());
//! let addr = TagAddress::new("Counter", "192.168.250.1");
//!
//! match access.write_variable(&addr, TagType::Int, "not-a-number") {
//!     Err(TagError::InvalidValue { input, expected }) => {
//!         println!("\"{input}\" is not a valid {expected}");
//!     }
//!     other => panic!("expected a parse error, got {other:?}"),
//! }
//! ```
//!
//! ## Connecting a Real Protocol Client
//!
//! Implement [`TagChannel`] over your tag library's connection object and
//! [`TagChannelFactory`] over its constructor, mapping its failures onto
//! [`TagError::Connection`], [`TagError::Timeout`] and
//! [`TagError::Protocol`]. The facade supplies a fresh [`ChannelConfig`]
//! (address, controller family, protocol variant, timeout) for every
//! operation and closes the channel when the operation ends.
//!
//! ## Design Philosophy
//!
//! 1. Each operation pays full connect/exchange/close cost; nothing is
//!    pooled, so no shared-connection state can corrupt
//! 2. Type dispatch is exhaustive; a silently-wrong coercion cannot compile
//! 3. The facade holds no mutable session state beyond its two locks
//! 4. Errors are always explicit and descriptive

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod access;
mod address;
mod buffer;
mod channel;
mod error;
mod sim;
mod types;

// Public re-exports
pub use access::TagAccess;
pub use address::{TagAddress, DEFAULT_PATH};
pub use buffer::TagBuffer;
pub use channel::{
    ChannelConfig, PlcKind, TagChannel, TagChannelFactory, WireProtocol, DEFAULT_TIMEOUT,
};
pub use error::{Result, TagError};
pub use sim::{SimChannel, SimPlc};
pub use types::{TagType, TagValue};
