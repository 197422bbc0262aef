// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Demo model for `rdwire`.
//!
//! A `Base` hierarchy published in two schema versions. A v1 endpoint knows
//! `Derived` and `OpenDerived`; a v2 endpoint also knows `Extended`. Values a
//! v1 reader cannot resolve come back as `Base::Unknown` and are forwarded
//! byte-for-byte.

mod base;
mod model;

pub use base::{
    derived_id, extended_id, open_derived_id, Base, DERIVED_NAME, EXTENDED_NAME,
    OPEN_DERIVED_NAME, PROTOCOL_INTERN_KEY,
};
pub use model::{v1_registry, v2_registry, DemoModelV1, DemoModelV2};
