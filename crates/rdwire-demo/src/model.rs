// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer owners for the two schema versions of the demo model.
//!
//! `DemoModelV2` is a superset of `DemoModelV1`: it registers the v1 owner
//! first (a no-op when already present) and then adds `Extended`.

use rdwire::{RegistryBuilder, SerializersOwner, TypeRegistry, WireConfig, WireResult};

use crate::base::{Base, DERIVED_NAME, EXTENDED_NAME, OPEN_DERIVED_NAME};

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoModelV1;

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoModelV2;

impl SerializersOwner<Base> for DemoModelV1 {
    fn register_serializers(&self, registry: &mut RegistryBuilder<Base>) -> WireResult<()> {
        registry
            .register_named(DERIVED_NAME, Base::read_derived)?
            .register_named(OPEN_DERIVED_NAME, Base::read_open_derived)?;
        Ok(())
    }
}

impl SerializersOwner<Base> for DemoModelV2 {
    fn register_serializers(&self, registry: &mut RegistryBuilder<Base>) -> WireResult<()> {
        registry.register_owner(&DemoModelV1)?;
        registry.register_named(EXTENDED_NAME, Base::read_extended)?;
        Ok(())
    }
}

/// Frozen `Base` registry for a v1 endpoint.
pub fn v1_registry(config: WireConfig) -> WireResult<TypeRegistry<Base>> {
    let mut builder = RegistryBuilder::new().with_config(config)?;
    builder.register_owner(&DemoModelV1)?;
    log::info!("[demo] v1 registry ready ({} types)", builder.len());
    Ok(builder.freeze())
}

/// Frozen `Base` registry for a v2 endpoint.
pub fn v2_registry(config: WireConfig) -> WireResult<TypeRegistry<Base>> {
    let mut builder = RegistryBuilder::new().with_config(config)?;
    builder.register_owner(&DemoModelV2)?;
    log::info!("[demo] v2 registry ready ({} types)", builder.len());
    Ok(builder.freeze())
}
