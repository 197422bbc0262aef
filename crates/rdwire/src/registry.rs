// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry and polymorphic dispatcher.
//!
//! # Lifecycle
//!
//! ```text
//! RegistryBuilder<T>  --register/register_owner-->  (setup, fallible)
//!        |
//!     freeze()
//!        v
//! TypeRegistry<T>     --read_polymorphic-->         (read-only, shareable)
//! ```
//!
//! Registration is only possible on the builder, so a registry that is being
//! used for decoding can never change underneath a reader. Duplicate
//! discriminators are rejected while building.
//!
//! # Dispatch
//!
//! A hit hands the decoder a reader bounded to exactly the instance's frame.
//! A miss captures the frame bytes into an [`UnknownInstance`]. Either way
//! the outer cursor ends right after the frame.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::buffer::{ReadBuffer, WriteBuffer, ID_SIZE, LEN_PREFIX_SIZE};
use crate::config::WireConfig;
use crate::ctx::SerializationCtx;
use crate::error::{WireError, WireResult};
use crate::id::RdId;
use crate::intern::{self, InternDefinition};
use crate::polymorphic::{self, Polymorphic};
use crate::unknown::UnknownInstance;

/// Decoder for one concrete variant: reads the body, id and length already
/// consumed.
pub type DecodeFn<T> =
    dyn Fn(&SerializationCtx, &mut ReadBuffer<'_>) -> WireResult<T> + Send + Sync;

struct Registration<T> {
    type_name: &'static str,
    decode: Box<DecodeFn<T>>,
}

/// Registers a group of related decoders at once (typically one generated
/// model).
pub trait SerializersOwner<T: Polymorphic> {
    fn register_serializers(&self, registry: &mut RegistryBuilder<T>) -> WireResult<()>;
}

/// Mutable registry used during setup.
pub struct RegistryBuilder<T> {
    entries: HashMap<RdId, Registration<T>>,
    owners: HashSet<TypeId>,
    config: WireConfig,
}

impl<T: Polymorphic> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Polymorphic> RegistryBuilder<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            owners: HashSet::new(),
            config: WireConfig::default(),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: WireConfig) -> WireResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Associate `id` with a decoder.
    ///
    /// Fails with `DuplicateRegistration` if `id` is taken and with
    /// `ReservedId` for `RdId::NULL` and `RdId::INTERN_DEFINITIONS`.
    pub fn register<F>(
        &mut self,
        id: RdId,
        type_name: &'static str,
        decode: F,
    ) -> WireResult<&mut Self>
    where
        F: Fn(&SerializationCtx, &mut ReadBuffer<'_>) -> WireResult<T> + Send + Sync + 'static,
    {
        if id.is_reserved() {
            return Err(WireError::ReservedId { type_name });
        }
        if let Some(existing) = self.entries.get(&id) {
            return Err(WireError::DuplicateRegistration {
                id,
                existing: existing.type_name,
                attempted: type_name,
            });
        }
        self.entries.insert(
            id,
            Registration {
                type_name,
                decode: Box::new(decode),
            },
        );
        Ok(self)
    }

    /// Register under the id derived from `type_name`
    /// (see [`RdId::from_type_name`]).
    pub fn register_named<F>(&mut self, type_name: &'static str, decode: F) -> WireResult<&mut Self>
    where
        F: Fn(&SerializationCtx, &mut ReadBuffer<'_>) -> WireResult<T> + Send + Sync + 'static,
    {
        self.register(RdId::from_type_name(type_name), type_name, decode)
    }

    /// Let `owner` register its decoders.
    ///
    /// Registering the same owner type twice is a no-op and returns
    /// `Ok(false)`. The owner's registrations are applied all-or-nothing: a
    /// clash with an existing id leaves the builder unchanged.
    pub fn register_owner<O>(&mut self, owner: &O) -> WireResult<bool>
    where
        O: SerializersOwner<T> + 'static,
    {
        let owner_id = TypeId::of::<O>();
        if self.owners.contains(&owner_id) {
            log::debug!(
                "[rdwire] serializers owner {} already registered for {}",
                std::any::type_name::<O>(),
                T::BASE_NAME
            );
            return Ok(false);
        }

        let mut scratch = RegistryBuilder {
            entries: HashMap::new(),
            owners: self.owners.clone(),
            config: self.config.clone(),
        };
        scratch.owners.insert(owner_id);
        owner.register_serializers(&mut scratch)?;

        for (id, registration) in &scratch.entries {
            if let Some(existing) = self.entries.get(id) {
                return Err(WireError::DuplicateRegistration {
                    id: *id,
                    existing: existing.type_name,
                    attempted: registration.type_name,
                });
            }
        }

        log::debug!(
            "[rdwire] serializers owner {} registered {} {} types",
            std::any::type_name::<O>(),
            scratch.entries.len(),
            T::BASE_NAME
        );
        self.entries.extend(scratch.entries);
        self.owners = scratch.owners;
        Ok(true)
    }

    pub fn contains(&self, id: RdId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish setup. The returned registry is read-only.
    pub fn freeze(self) -> TypeRegistry<T> {
        TypeRegistry {
            entries: self.entries,
            config: self.config,
        }
    }
}

/// Frozen registry: the dispatcher for one base hierarchy.
pub struct TypeRegistry<T> {
    entries: HashMap<RdId, Registration<T>>,
    config: WireConfig,
}

impl<T: Polymorphic> TypeRegistry<T> {
    pub fn contains(&self, id: RdId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn type_name_of(&self, id: RdId) -> Option<&'static str> {
        self.entries.get(&id).map(|r| r.type_name)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<RdId> {
        let mut ids: Vec<RdId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Read one non-null polymorphic value.
    pub fn read_polymorphic(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<T> {
        let (offset, id, definitions) = self.read_header(ctx, buffer)?;
        if id.is_null() {
            return Err(WireError::NullValue {
                offset,
                base: T::BASE_NAME,
            });
        }
        self.read_frame(ctx, buffer, id, definitions)
    }

    /// Read a polymorphic value that may be null.
    pub fn read_polymorphic_nullable(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<Option<T>> {
        let (_, id, definitions) = self.read_header(ctx, buffer)?;
        if id.is_null() {
            return Ok(None);
        }
        self.read_frame(ctx, buffer, id, definitions).map(Some)
    }

    /// Read `[count][value]*`.
    pub fn read_polymorphic_list(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<Vec<T>> {
        let count = buffer.read_len()?;
        // every element needs at least an id and a length
        let plausible = buffer.remaining() / (ID_SIZE + LEN_PREFIX_SIZE);
        let mut values = Vec::with_capacity(count.min(plausible));
        for _ in 0..count {
            values.push(self.read_polymorphic(ctx, buffer)?);
        }
        Ok(values)
    }

    /// Same as [`polymorphic::write_polymorphic`].
    pub fn write_polymorphic(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut WriteBuffer,
        value: &T,
    ) -> WireResult<()> {
        polymorphic::write_polymorphic(ctx, buffer, value)
    }

    /// Read the next value id, applying any definition records in front of
    /// it. Returns the id's offset, the id and the definitions seen.
    fn read_header(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
    ) -> WireResult<(usize, RdId, Vec<InternDefinition>)> {
        let mut definitions = Vec::new();
        loop {
            let offset = buffer.offset();
            let id = buffer.read_id()?;
            if id != RdId::INTERN_DEFINITIONS {
                return Ok((offset, id, definitions));
            }
            let len = self.read_frame_len(buffer)?;
            let mut frame = buffer.split_frame(len)?;
            let batch = intern::read_definitions(&mut frame)?;
            self.check_consumed(id, "intern definitions", &frame)?;
            intern::apply_definitions(ctx, &batch)?;
            log::trace!("[rdwire] applied {} intern definitions", batch.len());
            definitions.extend(batch);
        }
    }

    fn read_frame_len(&self, buffer: &mut ReadBuffer<'_>) -> WireResult<usize> {
        let len = buffer.read_len()?;
        let limit = self.config.max_payload_len as usize;
        if len > limit {
            return Err(WireError::PayloadTooLarge { length: len, limit });
        }
        Ok(len)
    }

    fn read_frame(
        &self,
        ctx: &SerializationCtx,
        buffer: &mut ReadBuffer<'_>,
        id: RdId,
        definitions: Vec<InternDefinition>,
    ) -> WireResult<T> {
        let len = self.read_frame_len(buffer)?;

        let Some(registration) = self.entries.get(&id) else {
            log::debug!(
                "[rdwire] unknown {} id {} at offset {}, keeping {} bytes opaque",
                T::BASE_NAME,
                id,
                buffer.offset(),
                len
            );
            return UnknownInstance::read(ctx, buffer, id, len)
                .map(|unknown| T::from_unknown(unknown.with_intern_definitions(definitions)));
        };

        log::trace!(
            "[rdwire] dispatch {} id {} -> {} ({} bytes)",
            T::BASE_NAME,
            id,
            registration.type_name,
            len
        );
        let mut frame = buffer.split_frame(len)?;
        let value = (registration.decode)(ctx, &mut frame)?;
        self.check_consumed(id, registration.type_name, &frame)?;
        Ok(value)
    }

    fn check_consumed(&self, id: RdId, what: &str, frame: &ReadBuffer<'_>) -> WireResult<()> {
        let unread = frame.remaining();
        if unread > 0 {
            if self.config.strict_framing {
                return Err(WireError::TrailingBytes { id, unread });
            }
            log::warn!("[rdwire] {} left {} trailing bytes, skipped", what, unread);
        }
        Ok(())
    }
}

impl<T> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&'static str> = self.entries.values().map(|r| r.type_name).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("types", &names)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> fmt::Debug for RegistryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("types", &self.entries.len())
            .field("owners", &self.owners.len())
            .finish()
    }
}
