// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String interning with definitions published ahead of the frames that use
//! them.
//!
//! Each endpoint keeps its own [`InternRoot`] per key. Inside a value body an
//! interned string is always the bare table index. Entries a body adds to the
//! writer's table are collected by [`write_polymorphic`](crate::write_polymorphic)
//! and emitted as a definition record in front of that value's frame. The
//! dispatcher applies every record it meets before dispatching the frame
//! behind it, so a reader learns the definitions even when the frame itself
//! is a variant it cannot decode.
//!
//! ```text
//! record: [INTERN_DEFINITIONS: i64][len: i32][count: i32]
//!         ([key: string][index: i32][value: string])*
//! body:   [index: i32]                     (root attached)
//!         [-1: i32][len: i32][utf-8 bytes] (no root: inline)
//! ```
//!
//! An [`UnknownInstance`](crate::UnknownInstance) keeps the definitions that
//! preceded its frame and re-publishes them when it is forwarded.
//!
//! Interned strings must be written from inside a polymorphic body; nothing
//! publishes entries added outside one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::{ReadBuffer, WriteBuffer, LEN_PREFIX_SIZE};
use crate::ctx::SerializationCtx;
use crate::error::{WireError, WireResult};
use crate::id::RdId;

/// Marker preceding an inline value, written when no root is attached.
pub const INLINE_MARKER: i32 = -1;

/// One `index -> value` entry of the intern root registered under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternDefinition {
    pub key: Arc<str>,
    pub index: i32,
    pub value: Arc<str>,
}

#[derive(Debug, Default)]
struct InternTables {
    by_value: HashMap<Arc<str>, i32>,
    by_index: HashMap<i32, Arc<str>>,
    next_index: i32,
    /// Entries added by `intern` and not yet published.
    pending: Vec<(i32, Arc<str>)>,
}

/// Why an entry could not enter the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternRefusal {
    /// Every non-negative `i32` index is taken.
    Full,
    /// The index or the value is already bound differently, or the index is
    /// negative.
    Conflict,
}

/// Bidirectional value <-> index table.
#[derive(Debug, Default)]
pub struct InternRoot {
    tables: Mutex<InternTables>,
}

impl InternRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `value`, returning its index and whether it was newly added.
    ///
    /// New entries are queued for publication.
    pub fn intern(&self, value: &str) -> Result<(i32, bool), InternRefusal> {
        let mut tables = self.tables.lock();
        if let Some(&index) = tables.by_value.get(value) {
            return Ok((index, false));
        }
        let index = tables.next_index;
        tables.next_index = index.checked_add(1).ok_or(InternRefusal::Full)?;
        let shared: Arc<str> = Arc::from(value);
        tables.by_value.insert(Arc::clone(&shared), index);
        tables.by_index.insert(index, Arc::clone(&shared));
        tables.pending.push((index, shared));
        Ok((index, true))
    }

    /// Bind `index` to `value` as published by the other side.
    ///
    /// Returns `Ok(false)` if the exact entry is already present.
    pub fn define(&self, index: i32, value: &str) -> Result<bool, InternRefusal> {
        if index < 0 {
            return Err(InternRefusal::Conflict);
        }
        let mut tables = self.tables.lock();
        match (tables.by_index.get(&index), tables.by_value.get(value)) {
            (Some(existing), _) if &**existing == value => return Ok(false),
            (Some(_), _) | (None, Some(_)) => return Err(InternRefusal::Conflict),
            (None, None) => {}
        }
        let shared: Arc<str> = Arc::from(value);
        tables.by_value.insert(Arc::clone(&shared), index);
        tables.by_index.insert(index, shared);
        tables.next_index = tables.next_index.max(index.saturating_add(1));
        Ok(true)
    }

    pub fn index_of(&self, value: &str) -> Option<i32> {
        self.tables.lock().by_value.get(value).copied()
    }

    pub fn resolve(&self, index: i32) -> Option<Arc<str>> {
        self.tables.lock().by_index.get(&index).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.lock().by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.tables.lock().pending.len()
    }

    /// Remove and return the entries queued after `mark`.
    pub(crate) fn take_pending(&self, mark: usize) -> Vec<(i32, Arc<str>)> {
        let mut tables = self.tables.lock();
        let mark = mark.min(tables.pending.len());
        tables.pending.drain(mark..).collect()
    }

    /// Forget the entries queued after `mark`, as if never interned.
    pub(crate) fn discard_pending(&self, mark: usize) {
        let mut tables = self.tables.lock();
        let mark = mark.min(tables.pending.len());
        let dropped: Vec<_> = tables.pending.drain(mark..).collect();
        for (index, value) in dropped {
            tables.by_index.remove(&index);
            tables.by_value.remove(&value);
        }
    }
}

/// Write `value` through the intern root registered under `key`.
///
/// With a root, only the index is written and a new entry is queued for the
/// enclosing frame's definition record. Without a root the value is inline.
pub fn write_interned_str(
    ctx: &SerializationCtx,
    buffer: &mut WriteBuffer,
    key: &str,
    value: &str,
) -> WireResult<()> {
    let Some(root) = ctx.intern_root(key) else {
        buffer.write_i32(INLINE_MARKER);
        return buffer.write_string(value);
    };
    let (index, _) = root.intern(value).map_err(|refusal| refused(key, refusal, -1, value))?;
    buffer.write_i32(index);
    Ok(())
}

/// Read a value written by [`write_interned_str`].
pub fn read_interned_str(
    ctx: &SerializationCtx,
    buffer: &mut ReadBuffer<'_>,
    key: &str,
) -> WireResult<Arc<str>> {
    let index = buffer.read_i32()?;
    if index == INLINE_MARKER {
        return Ok(Arc::from(buffer.read_string()?));
    }
    ctx.intern_root(key)
        .and_then(|root| root.resolve(index))
        .ok_or_else(|| WireError::UnknownInternIndex {
            key: key.to_string(),
            index,
        })
}

fn refused(key: &str, refusal: InternRefusal, index: i32, value: &str) -> WireError {
    match refusal {
        InternRefusal::Full => WireError::InternTableFull {
            key: key.to_string(),
        },
        InternRefusal::Conflict => WireError::InternConflict {
            key: key.to_string(),
            index,
            value: value.to_string(),
        },
    }
}

/// Write a complete definition record, header included.
pub(crate) fn write_definitions(
    buffer: &mut WriteBuffer,
    definitions: &[InternDefinition],
) -> WireResult<()> {
    buffer.write_id(RdId::INTERN_DEFINITIONS);
    let slot = buffer.reserve_len();
    buffer.write_len(definitions.len())?;
    for definition in definitions {
        buffer.write_string(&definition.key)?;
        buffer.write_i32(definition.index);
        buffer.write_string(&definition.value)?;
    }
    buffer.fill_len(slot)
}

/// Read the body of a definition record.
pub(crate) fn read_definitions(frame: &mut ReadBuffer<'_>) -> WireResult<Vec<InternDefinition>> {
    let count = frame.read_len()?;
    // key length, index, value length
    let plausible = frame.remaining() / (3 * LEN_PREFIX_SIZE);
    let mut definitions = Vec::with_capacity(count.min(plausible));
    for _ in 0..count {
        let key: Arc<str> = Arc::from(frame.read_string()?);
        let index = frame.read_i32()?;
        let value: Arc<str> = Arc::from(frame.read_string()?);
        definitions.push(InternDefinition { key, index, value });
    }
    Ok(definitions)
}

/// Enter definitions read from the wire into the reader's roots.
///
/// Definitions for keys without a root are ignored.
pub(crate) fn apply_definitions(
    ctx: &SerializationCtx,
    definitions: &[InternDefinition],
) -> WireResult<()> {
    for definition in definitions {
        match ctx.intern_root(&definition.key) {
            Some(root) => {
                root.define(definition.index, &definition.value)
                    .map_err(|refusal| {
                        refused(&definition.key, refusal, definition.index, &definition.value)
                    })?;
            }
            None => log::trace!(
                "[rdwire] no intern root '{}', definition {} ignored",
                definition.key,
                definition.index
            ),
        }
    }
    Ok(())
}

/// Enter forwarded definitions into the writer's roots and return those the
/// downstream reader still has to be told about.
///
/// Definitions for keys without a root are always passed on.
pub(crate) fn absorb_definitions(
    ctx: &SerializationCtx,
    definitions: &[InternDefinition],
) -> WireResult<Vec<InternDefinition>> {
    let mut unpublished = Vec::new();
    for definition in definitions {
        let fresh = match ctx.intern_root(&definition.key) {
            Some(root) => root
                .define(definition.index, &definition.value)
                .map_err(|refusal| {
                    refused(&definition.key, refusal, definition.index, &definition.value)
                })?,
            None => true,
        };
        if fresh {
            unpublished.push(definition.clone());
        }
    }
    Ok(unpublished)
}
