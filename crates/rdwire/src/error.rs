// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for wire encoding/decoding and registry setup.
//!
//! An unknown discriminator is deliberately absent from this list: it decodes
//! to an [`UnknownInstance`](crate::UnknownInstance). `UnknownVariant` only
//! exists for callers that opt into strict validation via
//! [`ensure_known`](crate::ensure_known).

use crate::config::ConfigError;
use crate::id::RdId;
use thiserror::Error;

/// Errors raised by the buffer codec, the dispatcher and the registry builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Fewer bytes remain than the current read step requires.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Two decoders claim the same discriminator (setup time only).
    #[error("duplicate registration for id {id}: {existing} already registered, {attempted} rejected")]
    DuplicateRegistration {
        id: RdId,
        existing: &'static str,
        attempted: &'static str,
    },

    /// `RdId::NULL` and `RdId::INTERN_DEFINITIONS` have a fixed meaning on the
    /// wire and cannot name a type.
    #[error("type {type_name} cannot use a reserved id")]
    ReservedId { type_name: &'static str },

    /// The null id appeared where a non-null polymorphic value is required.
    #[error("null {base} value at offset {offset}")]
    NullValue { offset: usize, base: &'static str },

    /// A length prefix was negative.
    #[error("invalid length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: i32 },

    #[error("payload of {length} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { length: usize, limit: usize },

    /// A known decoder left bytes unread inside its frame (strict framing).
    #[error("decoder for id {id} left {unread} trailing bytes in its frame")]
    TrailingBytes { id: RdId, unread: usize },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("intern index {index} not present in intern root '{key}'")]
    UnknownInternIndex { key: String, index: i32 },

    /// A definition disagrees with what the intern root already holds, or
    /// uses a negative index.
    #[error("intern definition {index} -> {value:?} conflicts with intern root '{key}'")]
    InternConflict {
        key: String,
        index: i32,
        value: String,
    },

    #[error("intern root '{key}' has no free index left")]
    InternTableFull { key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised only by strict callers that refuse opaque pass-through values.
    #[error("unknown variant {id} of {base} rejected")]
    UnknownVariant { id: RdId, base: &'static str },
}

pub type WireResult<T> = core::result::Result<T, WireError>;

impl From<ConfigError> for WireError {
    fn from(err: ConfigError) -> Self {
        WireError::InvalidConfig(err.to_string())
    }
}
