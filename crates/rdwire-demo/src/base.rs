// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `Base` hierarchy.

use std::borrow::Cow;
use std::sync::Arc;

use rdwire::{
    read_interned_str, write_interned_str, Polymorphic, RdId, ReadBuffer, SerializationCtx,
    UnknownInstance, WireResult, WriteBuffer,
};

/// Intern root key used by `Derived::string` and `Extended::label`.
pub const PROTOCOL_INTERN_KEY: &str = "Protocol";

pub const DERIVED_NAME: &str = "Derived";
pub const OPEN_DERIVED_NAME: &str = "OpenDerived";
pub const EXTENDED_NAME: &str = "Extended";

/// Discriminators, derived from type names so every endpoint agrees.
pub fn derived_id() -> RdId {
    RdId::from_type_name(DERIVED_NAME)
}

pub fn open_derived_id() -> RdId {
    RdId::from_type_name(OPEN_DERIVED_NAME)
}

pub fn extended_id() -> RdId {
    RdId::from_type_name(EXTENDED_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Base {
    /// Interned under [`PROTOCOL_INTERN_KEY`].
    Derived { string: Arc<str> },
    OpenDerived { string: String, open_field: i32 },
    /// Only known to the v2 schema. `label` is interned under
    /// [`PROTOCOL_INTERN_KEY`].
    Extended {
        tag: i64,
        label: Arc<str>,
        payload: Vec<u8>,
    },
    Unknown(UnknownInstance),
}

impl Base {
    pub fn derived(string: impl Into<Arc<str>>) -> Self {
        Base::Derived {
            string: string.into(),
        }
    }

    pub(crate) fn read_derived(
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<Self> {
        Ok(Base::Derived {
            string: read_interned_str(ctx, buffer, PROTOCOL_INTERN_KEY)?,
        })
    }

    pub(crate) fn read_open_derived(
        _ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<Self> {
        let string = buffer.read_string()?;
        let open_field = buffer.read_i32()?;
        Ok(Base::OpenDerived { string, open_field })
    }

    pub(crate) fn read_extended(
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<Self> {
        let tag = buffer.read_i64()?;
        let label = read_interned_str(ctx, buffer, PROTOCOL_INTERN_KEY)?;
        let payload = buffer.read_byte_array()?;
        Ok(Base::Extended {
            tag,
            label,
            payload,
        })
    }
}

impl Polymorphic for Base {
    const BASE_NAME: &'static str = "Base";

    fn type_id(&self) -> RdId {
        match self {
            Base::Derived { .. } => derived_id(),
            Base::OpenDerived { .. } => open_derived_id(),
            Base::Extended { .. } => extended_id(),
            Base::Unknown(unknown) => unknown.id(),
        }
    }

    fn write_body(&self, ctx: &SerializationCtx, buffer: &mut WriteBuffer) -> WireResult<()> {
        match self {
            Base::Derived { string } => {
                write_interned_str(ctx, buffer, PROTOCOL_INTERN_KEY, string)?;
            }
            Base::OpenDerived { string, open_field } => {
                buffer.write_string(string)?;
                buffer.write_i32(*open_field);
            }
            Base::Extended {
                tag,
                label,
                payload,
            } => {
                buffer.write_i64(*tag);
                write_interned_str(ctx, buffer, PROTOCOL_INTERN_KEY, label)?;
                buffer.write_byte_array(payload)?;
            }
            Base::Unknown(unknown) => unknown.write_payload(buffer),
        }
        Ok(())
    }

    fn from_unknown(unknown: UnknownInstance) -> Self {
        Base::Unknown(unknown)
    }

    fn as_unknown(&self) -> Option<&UnknownInstance> {
        match self {
            Base::Unknown(unknown) => Some(unknown),
            _ => None,
        }
    }

    fn type_name(&self) -> Cow<'static, str> {
        match self {
            Base::Derived { .. } => DERIVED_NAME.into(),
            Base::OpenDerived { .. } => OPEN_DERIVED_NAME.into(),
            Base::Extended { .. } => EXTENDED_NAME.into(),
            Base::Unknown(_) => Cow::Owned(format!("{}_Unknown", Self::BASE_NAME)),
        }
    }
}
