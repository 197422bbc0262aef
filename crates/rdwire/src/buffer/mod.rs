// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sequential little-endian buffers for the wire codec.
//!
//! - [`ReadBuffer`] is a bounds-checked, monotonic cursor over a borrowed
//!   byte slice. Every read either succeeds completely or fails with
//!   [`WireError::TruncatedInput`](crate::WireError::TruncatedInput) without
//!   moving the cursor.
//! - [`WriteBuffer`] appends to an owned, growable byte vector. Length
//!   prefixes that are only known after the body has been written are
//!   reserved with [`WriteBuffer::reserve_len`] and filled afterwards; the
//!   write cursor itself never moves backwards.

mod reader;
mod writer;

pub use reader::ReadBuffer;
pub use writer::{LenSlot, WriteBuffer};

/// Width of a length prefix on the wire (`i32`).
pub const LEN_PREFIX_SIZE: usize = 4;

/// Width of a discriminator on the wire (`i64`).
pub const ID_SIZE: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RdId, WireError};

    const TEST_U8: u8 = 0xAB;
    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_roundtrip_across_numeric_types() {
        let mut writer = WriteBuffer::new();
        writer.write_u8(TEST_U8);
        writer.write_bool(true);
        writer.write_u16(TEST_U16);
        writer.write_i16(-7);
        writer.write_u32(TEST_U32);
        writer.write_i32(-42);
        writer.write_u64(TEST_U64);
        writer.write_i64(i64::MIN);
        writer.write_f64(6.25);
        writer.write_id(RdId::new(0x2A));
        writer.write_bytes(&[1, 2, 3, 4]);

        let bytes = writer.into_inner();
        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(reader.read_u8().expect("read u8"), TEST_U8);
        assert!(reader.read_bool().expect("read bool"));
        assert_eq!(reader.read_u16().expect("read u16"), TEST_U16);
        assert_eq!(reader.read_i16().expect("read i16"), -7);
        assert_eq!(reader.read_u32().expect("read u32"), TEST_U32);
        assert_eq!(reader.read_i32().expect("read i32"), -42);
        assert_eq!(reader.read_u64().expect("read u64"), TEST_U64);
        assert_eq!(reader.read_i64().expect("read i64"), i64::MIN);
        assert!((reader.read_f64().expect("read f64") - 6.25).abs() < f64::EPSILON);
        assert_eq!(reader.read_id().expect("read id"), RdId::new(0x2A));
        assert_eq!(reader.read_bytes(4).expect("read bytes"), &[1, 2, 3, 4]);
        assert!(reader.is_eof());
    }

    #[test]
    fn test_integers_are_little_endian() {
        let mut writer = WriteBuffer::new();
        writer.write_u32(0x0102_0304);
        writer.write_id(RdId::new(0x2A));
        assert_eq!(
            writer.as_bytes(),
            &[0x04, 0x03, 0x02, 0x01, 0x2A, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_read_overflow_reports_offset_and_keeps_cursor() {
        let buffer = [0u8; 5];
        let mut reader = ReadBuffer::new(&buffer);
        reader.read_u32().expect("read u32");

        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            WireError::TruncatedInput {
                offset: 4,
                needed: 4,
                remaining: 1,
            }
        );
        // failed read did not advance
        assert_eq!(reader.offset(), 4);
        assert_eq!(reader.read_u8().expect("read last byte"), 0);
    }

    #[test]
    fn test_read_bytes_shortfall() {
        let buffer = [1u8, 2, 3];
        let mut reader = ReadBuffer::new(&buffer);
        let err = reader.read_bytes(4).unwrap_err();
        assert!(matches!(err, WireError::TruncatedInput { needed: 4, .. }));
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn test_byte_array_and_string_roundtrip() {
        let mut writer = WriteBuffer::new();
        writer.write_byte_array(&[9, 8, 7]).expect("write array");
        writer.write_string("héllo").expect("write string");
        writer.write_byte_array(&[]).expect("write empty array");

        let bytes = writer.into_inner();
        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(reader.read_byte_array().expect("read array"), vec![9, 8, 7]);
        assert_eq!(reader.read_string().expect("read string"), "héllo");
        assert!(reader.read_byte_array().expect("read empty").is_empty());
        assert!(reader.is_eof());
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut writer = WriteBuffer::new();
        writer.write_i32(-1);
        let bytes = writer.into_inner();
        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(
            reader.read_byte_array().unwrap_err(),
            WireError::InvalidLength {
                offset: 0,
                length: -1,
            }
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut writer = WriteBuffer::new();
        writer.write_byte_array(&[0xFF, 0xFE]).expect("write array");
        let bytes = writer.into_inner();
        let mut reader = ReadBuffer::new(&bytes);
        assert_eq!(
            reader.read_string().unwrap_err(),
            WireError::InvalidUtf8 { offset: 4 }
        );
    }

    #[test]
    fn test_reserved_length_is_backfilled() {
        let mut writer = WriteBuffer::new();
        writer.write_u8(0xEE);
        let slot = writer.reserve_len();
        writer.write_bytes(&[1, 2, 3]);
        writer.fill_len(slot).expect("fill len");
        writer.write_u8(0xFF);

        assert_eq!(writer.as_bytes(), &[0xEE, 3, 0, 0, 0, 1, 2, 3, 0xFF]);
    }

    #[test]
    fn test_insert_after_open_slot_is_counted() {
        let mut writer = WriteBuffer::new();
        let slot = writer.reserve_len();
        writer.write_u8(1);
        let pos = writer.offset();
        writer.write_u8(3);
        writer.insert_bytes(pos, &[2, 2]);
        writer.fill_len(slot).expect("fill len");
        assert_eq!(writer.as_bytes(), &[4, 0, 0, 0, 1, 2, 2, 3]);

        writer.truncate(4);
        assert_eq!(writer.as_bytes(), &[4, 0, 0, 0]);
    }

    #[test]
    fn test_split_frame_is_bounded_and_keeps_absolute_offsets() {
        let buffer = [0xAAu8, 1, 2, 3, 0xBB];
        let mut reader = ReadBuffer::new(&buffer);
        reader.read_u8().expect("read prefix");

        let mut frame = reader.split_frame(3).expect("split frame");
        assert_eq!(reader.offset(), 4);
        assert_eq!(frame.offset(), 1);
        assert_eq!(frame.read_u16().expect("read in frame"), 0x0201);

        let err = frame.read_u16().unwrap_err();
        assert_eq!(
            err,
            WireError::TruncatedInput {
                offset: 3,
                needed: 2,
                remaining: 1,
            }
        );
        assert_eq!(reader.read_u8().expect("read suffix"), 0xBB);
    }
}
