// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque pass-through value for variants the local schema does not know.
//!
//! An [`UnknownInstance`] is what an older reader decodes when a newer writer
//! sends a variant it has never heard of. It keeps the discriminator and the
//! exact frame payload, so writing it back produces the bytes that were read.
//! Intern definitions that arrived in front of the frame are kept as well and
//! published again when the instance is forwarded.
//!
//! # Wire Format
//!
//! ```text
//! +----------------+----------------+----------------------+
//! | id: i64 (LE)   | len: i32 (LE)  | payload: len bytes   |
//! +----------------+----------------+----------------------+
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::buffer::{ReadBuffer, WriteBuffer};
use crate::ctx::SerializationCtx;
use crate::error::{WireError, WireResult};
use crate::id::RdId;
use crate::intern::{self, InternDefinition};

const HASH_FACTOR: i64 = 31;

/// Discriminator plus raw payload of an unresolved polymorphic instance.
///
/// Equality, ordering and hashing are structural over `(id, payload)`. The
/// payload is copied out of the source buffer on read and never mutated
/// afterwards; clones share it.
#[derive(Debug, Clone)]
pub struct UnknownInstance {
    id: RdId,
    payload: Arc<[u8]>,
    intern_definitions: Vec<InternDefinition>,
}

impl UnknownInstance {
    pub fn new(id: RdId, payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            payload: payload.into(),
            intern_definitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_intern_definitions(mut self, definitions: Vec<InternDefinition>) -> Self {
        self.intern_definitions = definitions;
        self
    }

    pub fn id(&self) -> RdId {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Definitions that preceded the frame on the wire.
    pub fn intern_definitions(&self) -> &[InternDefinition] {
        &self.intern_definitions
    }

    /// Capture `len` payload bytes following an already consumed
    /// `[id][len]` header.
    ///
    /// The frame length comes from the dispatcher; nothing else knows where
    /// the instance ends.
    pub(crate) fn read(
        _ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
        id: RdId,
        len: usize,
    ) -> WireResult<Self> {
        let payload = buffer.read_bytes(len)?;
        Ok(Self::new(id, payload))
    }

    /// Write the complete frame: id, length, payload.
    ///
    /// Carried definitions are entered into the writer's intern roots first;
    /// those the stream has not published yet go out in a record ahead of the
    /// frame.
    pub fn write(&self, ctx: &SerializationCtx, buffer: &mut WriteBuffer) -> WireResult<()> {
        if self.id.is_reserved() {
            return Err(WireError::ReservedId {
                type_name: "UnknownInstance",
            });
        }
        if !self.intern_definitions.is_empty() {
            let unpublished = intern::absorb_definitions(ctx, &self.intern_definitions)?;
            if !unpublished.is_empty() {
                intern::write_definitions(buffer, &unpublished)?;
            }
        }
        buffer.write_id(self.id);
        buffer.write_byte_array(&self.payload)
    }

    /// Write the payload alone, for callers that frame the body themselves.
    pub fn write_payload(&self, buffer: &mut WriteBuffer) {
        buffer.write_bytes(&self.payload);
    }

    /// Deterministic hash of `(id, payload)`, identical on every platform and
    /// process.
    pub fn hash_code(&self) -> i64 {
        let content = self.payload.iter().fold(1i64, |acc, &b| {
            acc.wrapping_mul(HASH_FACTOR).wrapping_add(i64::from(b as i8))
        });
        self.id.value().wrapping_mul(HASH_FACTOR).wrapping_add(content)
    }

    /// Diagnostic label. Never a real type name.
    pub fn type_name(&self) -> String {
        format!("Unknown#{}", self.id)
    }
}

impl PartialEq for UnknownInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.payload == other.payload
    }
}

impl Eq for UnknownInstance {}

impl Hash for UnknownInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.payload.hash(state);
    }
}

impl PartialOrd for UnknownInstance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnknownInstance {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.id, &self.payload).cmp(&(other.id, &other.payload))
    }
}

impl fmt::Display for UnknownInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.type_name(), self.payload.len())
    }
}
