// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Polymorphic values: one tagged union per base hierarchy.
//!
//! A hierarchy is an `enum` with one variant per known concrete type and an
//! `Unknown(UnknownInstance)` variant. [`Polymorphic`] connects it to the
//! dispatcher; decoding lives on [`TypeRegistry`](crate::TypeRegistry),
//! encoding needs no registry and lives here.
//!
//! # Wire Format
//!
//! ```text
//! value: [definitions record]? [id: i64][len: i32][body: len bytes]
//! null:  [0: i64]
//! list:  [count: i32][value]*
//! ```

use std::borrow::Cow;

use crate::buffer::WriteBuffer;
use crate::ctx::SerializationCtx;
use crate::error::{WireError, WireResult};
use crate::id::RdId;
use crate::intern;
use crate::unknown::UnknownInstance;

/// Base hierarchy of polymorphic model types.
pub trait Polymorphic: Sized {
    /// Name of the base type, for diagnostics.
    const BASE_NAME: &'static str;

    /// Runtime discriminator of this value.
    fn type_id(&self) -> RdId;

    /// Write the body of this value, without id or length.
    fn write_body(&self, ctx: &SerializationCtx, buffer: &mut WriteBuffer) -> WireResult<()>;

    /// Wrap an unresolved instance (the dispatcher fallback).
    fn from_unknown(unknown: UnknownInstance) -> Self;

    fn as_unknown(&self) -> Option<&UnknownInstance>;

    /// Diagnostic type label; `{BASE_NAME}_Unknown` style for unresolved
    /// values. Never used for dispatch.
    fn type_name(&self) -> Cow<'static, str>;

    fn is_unknown(&self) -> bool {
        self.as_unknown().is_some()
    }
}

/// Write one polymorphic value.
///
/// Known variants are written as id followed by their framed body. Intern
/// entries the body adds are published in a definition record placed in
/// front of the frame. An unknown instance is written back verbatim, together
/// with the definitions it arrived with. On error nothing of the value stays
/// in `buffer`.
pub fn write_polymorphic<T: Polymorphic>(
    ctx: &SerializationCtx,
    buffer: &mut WriteBuffer,
    value: &T,
) -> WireResult<()> {
    if let Some(unknown) = value.as_unknown() {
        return unknown.write(ctx, buffer);
    }
    let id = value.type_id();
    if id.is_reserved() {
        return Err(WireError::ReservedId {
            type_name: T::BASE_NAME,
        });
    }

    let start = buffer.offset();
    let marks = ctx.intern_marks();
    if let Err(err) = write_frame(ctx, buffer, id, value) {
        ctx.discard_intern_definitions(&marks);
        buffer.truncate(start);
        return Err(err);
    }

    let definitions = ctx.take_intern_definitions(&marks);
    if !definitions.is_empty() {
        let mut record = WriteBuffer::new();
        intern::write_definitions(&mut record, &definitions)?;
        buffer.insert_bytes(start, record.as_bytes());
    }
    Ok(())
}

fn write_frame<T: Polymorphic>(
    ctx: &SerializationCtx,
    buffer: &mut WriteBuffer,
    id: RdId,
    value: &T,
) -> WireResult<()> {
    buffer.write_id(id);
    let slot = buffer.reserve_len();
    value.write_body(ctx, buffer)?;
    buffer.fill_len(slot)
}

/// Write an optional polymorphic value; `None` is the null id alone.
pub fn write_polymorphic_nullable<T: Polymorphic>(
    ctx: &SerializationCtx,
    buffer: &mut WriteBuffer,
    value: Option<&T>,
) -> WireResult<()> {
    match value {
        Some(value) => write_polymorphic(ctx, buffer, value),
        None => {
            buffer.write_id(RdId::NULL);
            Ok(())
        }
    }
}

/// Write `[count][value]*`, unknown elements included, in order.
pub fn write_polymorphic_list<T: Polymorphic>(
    ctx: &SerializationCtx,
    buffer: &mut WriteBuffer,
    values: &[T],
) -> WireResult<()> {
    buffer.write_len(values.len())?;
    values
        .iter()
        .try_for_each(|value| write_polymorphic(ctx, buffer, value))
}

/// Reject opaque pass-through values.
///
/// For producers that must never emit a variant outside their own schema.
pub fn ensure_known<T: Polymorphic>(value: T) -> WireResult<T> {
    match value.as_unknown() {
        Some(unknown) => Err(WireError::UnknownVariant {
            id: unknown.id(),
            base: T::BASE_NAME,
        }),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_model::{Shape, CIRCLE_ID};

    #[test]
    fn test_known_value_is_framed() {
        let ctx = SerializationCtx::new();
        let mut out = WriteBuffer::new();
        write_polymorphic(&ctx, &mut out, &Shape::Circle { radius: 1.5 }).expect("write");

        let bytes = out.into_inner();
        assert_eq!(&bytes[..8], &CIRCLE_ID.value().to_le_bytes());
        assert_eq!(&bytes[8..12], &8i32.to_le_bytes());
        assert_eq!(&bytes[12..], &1.5f64.to_bits().to_le_bytes());
    }

    #[test]
    fn test_unknown_value_is_written_verbatim() {
        let ctx = SerializationCtx::new();
        let shape = Shape::from_unknown(UnknownInstance::new(RdId::new(0x2A), vec![1u8, 2, 3]));
        let mut out = WriteBuffer::new();
        write_polymorphic(&ctx, &mut out, &shape).expect("write");
        assert_eq!(
            out.as_bytes(),
            &[0x2A, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 1, 2, 3]
        );
    }

    #[test]
    fn test_null_is_bare_id() {
        let ctx = SerializationCtx::new();
        let mut out = WriteBuffer::new();
        write_polymorphic_nullable::<Shape>(&ctx, &mut out, None).expect("write");
        assert_eq!(out.as_bytes(), &[0u8; 8]);
    }

    #[test]
    fn test_ensure_known() {
        let known = Shape::Label {
            text: "a".to_string(),
        };
        assert_eq!(ensure_known(known.clone()), Ok(known));

        let unknown = Shape::from_unknown(UnknownInstance::new(RdId::new(9), Vec::new()));
        assert_eq!(
            ensure_known(unknown).unwrap_err(),
            WireError::UnknownVariant {
                id: RdId::new(9),
                base: "Shape",
            }
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Shape::Circle { radius: 0.0 }.type_name(), "Circle");
        let unknown = Shape::from_unknown(UnknownInstance::new(RdId::new(9), Vec::new()));
        assert_eq!(unknown.type_name(), "Shape_Unknown");
        assert!(unknown.is_unknown());
    }
}
