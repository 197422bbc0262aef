// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # rdwire - polymorphic wire serialization with unknown-variant pass-through
//!
//! Two endpoints sharing a model schema rarely run the same version of it. A
//! reader that meets a variant it does not know must still keep the value,
//! compare it, hash it, forward it unchanged and carry on with the rest of
//! the stream. `rdwire` provides the dispatch layer that makes this work.
//!
//! ## Quick Start
//!
//! ```rust
//! use rdwire::{
//!     write_polymorphic, Polymorphic, RdId, ReadBuffer, RegistryBuilder, SerializationCtx,
//!     UnknownInstance, WireResult, WriteBuffer,
//! };
//! use std::borrow::Cow;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Event {
//!     Ping(u32),
//!     Unknown(UnknownInstance),
//! }
//!
//! const PING: RdId = RdId::new(1);
//!
//! impl Polymorphic for Event {
//!     const BASE_NAME: &'static str = "Event";
//!     fn type_id(&self) -> RdId {
//!         match self {
//!             Event::Ping(_) => PING,
//!             Event::Unknown(u) => u.id(),
//!         }
//!     }
//!     fn write_body(&self, _: &SerializationCtx, buffer: &mut WriteBuffer) -> WireResult<()> {
//!         match self {
//!             Event::Ping(n) => buffer.write_u32(*n),
//!             Event::Unknown(u) => u.write_payload(buffer),
//!         }
//!         Ok(())
//!     }
//!     fn from_unknown(unknown: UnknownInstance) -> Self {
//!         Event::Unknown(unknown)
//!     }
//!     fn as_unknown(&self) -> Option<&UnknownInstance> {
//!         match self {
//!             Event::Unknown(u) => Some(u),
//!             _ => None,
//!         }
//!     }
//!     fn type_name(&self) -> Cow<'static, str> {
//!         match self {
//!             Event::Ping(_) => "Ping".into(),
//!             Event::Unknown(_) => "Event_Unknown".into(),
//!         }
//!     }
//! }
//!
//! # fn main() -> WireResult<()> {
//! let mut builder = RegistryBuilder::new();
//! builder.register(PING, "Ping", |_, b| Ok(Event::Ping(b.read_u32()?)))?;
//! let registry = builder.freeze();
//! let ctx = SerializationCtx::new();
//!
//! // A newer peer sent id 99, which this side has never heard of.
//! let incoming = [99, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0xAB, 0xCD];
//! let mut reader = ReadBuffer::new(&incoming);
//! let event = registry.read_polymorphic(&ctx, &mut reader)?;
//! assert!(event.is_unknown());
//!
//! let mut out = WriteBuffer::new();
//! write_polymorphic(&ctx, &mut out, &event)?;
//! assert_eq!(out.as_bytes(), &incoming);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  TypeRegistry<T>  (dispatcher: id -> decoder | UnknownInstance)|
//! +---------------------------------------------------------------+
//! |  Polymorphic (tagged union per hierarchy) | SerializationCtx  |
//! +---------------------------------------------------------------+
//! |  ReadBuffer / WriteBuffer  (little-endian wire codec)         |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RegistryBuilder`] | Setup-time registration of decoders |
//! | [`TypeRegistry`] | Frozen dispatcher for one base hierarchy |
//! | [`UnknownInstance`] | Opaque holder for unresolved variants |
//! | [`Polymorphic`] | Contract between a hierarchy enum and the dispatcher |
//! | [`WireConfig`] | Frame length limit and framing policy |

pub mod buffer;
pub mod config;
mod ctx;
mod error;
mod id;
pub mod intern;
mod polymorphic;
mod registry;
mod unknown;

#[cfg(test)]
mod test_model;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use config::{ConfigError, WireConfig};
pub use ctx::SerializationCtx;
pub use error::{WireError, WireResult};
pub use id::{platform_independent_hash, RdId};
pub use intern::{read_interned_str, write_interned_str, InternDefinition, InternRoot};
pub use polymorphic::{
    ensure_known, write_polymorphic, write_polymorphic_list, write_polymorphic_nullable,
    Polymorphic,
};
pub use registry::{DecodeFn, RegistryBuilder, SerializersOwner, TypeRegistry};
pub use unknown::UnknownInstance;
