// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Minimal hierarchy shared by unit tests.

use std::borrow::Cow;
use std::sync::Arc;

use crate::{
    read_interned_str, write_interned_str, Polymorphic, RdId, RegistryBuilder, SerializationCtx,
    TypeRegistry, UnknownInstance, WireResult, WriteBuffer,
};

pub const CIRCLE_ID: RdId = RdId::new(0x10);
pub const NOTE_ID: RdId = RdId::new(0x18);
pub const LABEL_ID: RdId = RdId::new(0x20);
/// Only known to [`tagged_registry`].
pub const TAG_ID: RdId = RdId::new(0x30);
pub const NAMES_KEY: &str = "Names";

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Label { text: String },
    Note { text: Arc<str> },
    Tag { name: Arc<str> },
    Unknown(UnknownInstance),
}

impl Polymorphic for Shape {
    const BASE_NAME: &'static str = "Shape";

    fn type_id(&self) -> RdId {
        match self {
            Shape::Circle { .. } => CIRCLE_ID,
            Shape::Label { .. } => LABEL_ID,
            Shape::Note { .. } => NOTE_ID,
            Shape::Tag { .. } => TAG_ID,
            Shape::Unknown(unknown) => unknown.id(),
        }
    }

    fn write_body(&self, ctx: &SerializationCtx, buffer: &mut WriteBuffer) -> WireResult<()> {
        match self {
            Shape::Circle { radius } => buffer.write_f64(*radius),
            Shape::Label { text } => buffer.write_string(text)?,
            Shape::Note { text } => write_interned_str(ctx, buffer, NAMES_KEY, text)?,
            Shape::Tag { name } => write_interned_str(ctx, buffer, NAMES_KEY, name)?,
            Shape::Unknown(unknown) => unknown.write_payload(buffer),
        }
        Ok(())
    }

    fn from_unknown(unknown: UnknownInstance) -> Self {
        Shape::Unknown(unknown)
    }

    fn as_unknown(&self) -> Option<&UnknownInstance> {
        match self {
            Shape::Unknown(unknown) => Some(unknown),
            _ => None,
        }
    }

    fn type_name(&self) -> Cow<'static, str> {
        match self {
            Shape::Circle { .. } => Cow::Borrowed("Circle"),
            Shape::Label { .. } => Cow::Borrowed("Label"),
            Shape::Note { .. } => Cow::Borrowed("Note"),
            Shape::Tag { .. } => Cow::Borrowed("Tag"),
            Shape::Unknown(_) => Cow::Owned(format!("{}_Unknown", Self::BASE_NAME)),
        }
    }
}

pub fn shape_builder() -> RegistryBuilder<Shape> {
    let mut builder = RegistryBuilder::new();
    builder
        .register(CIRCLE_ID, "Circle", |_, buffer| {
            Ok(Shape::Circle {
                radius: buffer.read_f64()?,
            })
        })
        .expect("register Circle");
    builder
        .register(LABEL_ID, "Label", |_, buffer| {
            Ok(Shape::Label {
                text: buffer.read_string()?,
            })
        })
        .expect("register Label");
    builder
        .register(NOTE_ID, "Note", |ctx, buffer| {
            Ok(Shape::Note {
                text: read_interned_str(ctx, buffer, NAMES_KEY)?,
            })
        })
        .expect("register Note");
    builder
}

pub fn shape_registry() -> TypeRegistry<Shape> {
    shape_builder().freeze()
}

pub fn tagged_registry() -> TypeRegistry<Shape> {
    let mut builder = shape_builder();
    builder
        .register(TAG_ID, "Tag", |ctx, buffer| {
            Ok(Shape::Tag {
                name: read_interned_str(ctx, buffer, NAMES_KEY)?,
            })
        })
        .expect("register Tag");
    builder.freeze()
}

/// Context with a fresh `Names` intern root.
pub fn names_ctx() -> SerializationCtx {
    SerializationCtx::new().with_intern_root(NAMES_KEY, Arc::new(crate::InternRoot::new()))
}
