// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::LEN_PREFIX_SIZE;
use crate::error::{WireError, WireResult};
use crate::id::RdId;

/// Generate little-endian write methods for primitive types.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.data.extend_from_slice(&value.to_le_bytes());
        }
    };
}

/// Position of a reserved `i32` length prefix.
///
/// Returned by [`WriteBuffer::reserve_len`]; consumed by
/// [`WriteBuffer::fill_len`] once the body behind it has been written.
#[derive(Debug)]
#[must_use = "a reserved length must be filled"]
pub struct LenSlot {
    pos: usize,
}

/// Append-only write buffer.
#[derive(Debug, Default, Clone)]
pub struct WriteBuffer {
    data: Vec<u8>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Current write offset (number of bytes written so far).
    pub fn offset(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Drop everything written after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Insert `bytes` at `pos`, shifting what follows.
    ///
    /// Reserved length slots before `pos` stay valid.
    pub(crate) fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) {
        self.data.splice(pos..pos, bytes.iter().copied());
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_u16, u16);
    impl_write_le!(write_i16, i16);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u64, u64);
    impl_write_le!(write_i64, i64);

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    pub fn write_id(&mut self, id: RdId) {
        self.write_i64(id.value());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write an `i32` length prefix.
    pub fn write_len(&mut self, len: usize) -> WireResult<()> {
        self.write_i32(len_to_i32(len)?);
        Ok(())
    }

    /// `[len: i32][bytes]`.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> WireResult<()> {
        self.write_len(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// `[len: i32][utf-8 bytes]`.
    pub fn write_string(&mut self, value: &str) -> WireResult<()> {
        self.write_byte_array(value.as_bytes())
    }

    /// Reserve room for an `i32` length prefix whose value is known only
    /// after the following body has been written.
    pub fn reserve_len(&mut self) -> LenSlot {
        let pos = self.data.len();
        self.data.extend_from_slice(&[0u8; LEN_PREFIX_SIZE]);
        LenSlot { pos }
    }

    /// Fill a reserved prefix with the number of bytes written after it.
    pub fn fill_len(&mut self, slot: LenSlot) -> WireResult<()> {
        let body_start = slot.pos + LEN_PREFIX_SIZE;
        let len = len_to_i32(self.data.len() - body_start)?;
        self.data[slot.pos..body_start].copy_from_slice(&len.to_le_bytes());
        Ok(())
    }
}

fn len_to_i32(len: usize) -> WireResult<i32> {
    i32::try_from(len).map_err(|_| WireError::PayloadTooLarge {
        length: len,
        limit: i32::MAX as usize,
    })
}
