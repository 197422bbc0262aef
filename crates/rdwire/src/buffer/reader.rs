// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::{WireError, WireResult};
use crate::id::RdId;

/// Generate little-endian read methods for primitive types.
///
/// Each generated method checks the remaining length first, so a failed read
/// leaves the cursor where it was.
macro_rules! impl_read_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self) -> WireResult<$type> {
            const SIZE: usize = core::mem::size_of::<$type>();
            let mut bytes = [0u8; SIZE];
            bytes.copy_from_slice(self.read_bytes(SIZE)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Bounds-checked read cursor over a borrowed byte slice.
///
/// Offsets reported in errors are absolute: a frame split off with
/// [`split_frame`](Self::split_frame) keeps counting from the start of the
/// enclosing buffer.
#[derive(Debug, Clone)]
pub struct ReadBuffer<'a> {
    buffer: &'a [u8],
    offset: usize,
    base: usize,
}

impl<'a> ReadBuffer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            base: 0,
        }
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    impl_read_le!(read_u16, u16);
    impl_read_le!(read_i16, i16);
    impl_read_le!(read_u32, u32);
    impl_read_le!(read_i32, i32);
    impl_read_le!(read_u64, u64);
    impl_read_le!(read_i64, i64);

    pub fn read_u8(&mut self) -> WireResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_bool(&mut self) -> WireResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_f64(&mut self) -> WireResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_id(&mut self) -> WireResult<RdId> {
        Ok(RdId::new(self.read_i64()?))
    }

    /// Borrow `len` bytes at the cursor and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> WireResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read an `i32` length prefix.
    ///
    /// The cursor only moves if the prefix is non-negative.
    pub fn read_len(&mut self) -> WireResult<usize> {
        let offset = self.offset();
        let snapshot = self.offset;
        let length = self.read_i32()?;
        usize::try_from(length).map_err(|_| {
            self.offset = snapshot;
            WireError::InvalidLength { offset, length }
        })
    }

    /// `[len: i32][bytes]`, copied out of the buffer.
    pub fn read_byte_array(&mut self) -> WireResult<Vec<u8>> {
        let len = self.read_len()?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// `[len: i32][utf-8 bytes]`.
    pub fn read_string(&mut self) -> WireResult<String> {
        let len = self.read_len()?;
        let offset = self.offset();
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8 { offset })
    }

    pub fn skip(&mut self, len: usize) -> WireResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Split the next `len` bytes off as an independent, bounded reader and
    /// advance this reader past them.
    ///
    /// Reads on the returned frame can never run into the bytes that follow
    /// it in the enclosing stream.
    pub fn split_frame(&mut self, len: usize) -> WireResult<ReadBuffer<'a>> {
        let base = self.offset();
        let bytes = self.read_bytes(len)?;
        Ok(ReadBuffer {
            buffer: bytes,
            offset: 0,
            base,
        })
    }

    fn truncated(&self, needed: usize) -> WireError {
        WireError::TruncatedInput {
            offset: self.offset(),
            needed,
            remaining: self.remaining(),
        }
    }
}
