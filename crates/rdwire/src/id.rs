// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire discriminator for polymorphic values.

use std::fmt;

/// Seed of the platform independent string hash.
const HASH_SEED: i64 = 19;
const HASH_FACTOR: i64 = 31;

/// Identifier naming a concrete variant within a base hierarchy.
///
/// Written on the wire as a little-endian `i64`. `RdId::NULL` is reserved for
/// null polymorphic values and `RdId::INTERN_DEFINITIONS` for intern
/// definition records; neither names a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RdId(i64);

impl RdId {
    pub const NULL: RdId = RdId(0);

    /// Leads a record of intern definitions placed ahead of a frame.
    pub const INTERN_DEFINITIONS: RdId = RdId(-1);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// True for ids that can never name a registered type.
    pub const fn is_reserved(self) -> bool {
        self.0 == Self::NULL.0 || self.0 == Self::INTERN_DEFINITIONS.0
    }

    /// Discriminator derived from a type name.
    ///
    /// Both endpoints compute the same id for the same name regardless of
    /// platform: `h = 19; h = h * 31 + unit` over the UTF-16 code units of
    /// `name`, with wrapping `i64` arithmetic.
    pub fn from_type_name(name: &str) -> Self {
        Self(platform_independent_hash(name, HASH_SEED))
    }
}

/// Platform independent hash of `s` starting from `initial`.
pub fn platform_independent_hash(s: &str, initial: i64) -> i64 {
    s.encode_utf16().fold(initial, |acc, unit| {
        acc.wrapping_mul(HASH_FACTOR).wrapping_add(i64::from(unit))
    })
}

impl From<i64> for RdId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for RdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
