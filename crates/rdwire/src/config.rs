// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatcher configuration.
//!
//! Supports both programmatic and file-based configuration. File loading
//! requires the `config-loaders` feature (enabled by default).
//!
//! ```toml
//! max_payload_len = 1048576
//! strict_framing = true
//! ```

#[cfg(feature = "config-loaders")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "config-loaders")]
use std::path::Path;
use thiserror::Error;

/// Default frame length limit (64 MiB).
pub const DEFAULT_MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "config-loaders")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-loaders")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Limits and framing policy applied by a frozen registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(Serialize, Deserialize))]
pub struct WireConfig {
    /// Largest accepted frame length, checked before the payload is read.
    #[cfg_attr(feature = "config-loaders", serde(default = "default_max_payload_len"))]
    pub max_payload_len: u32,

    /// Fail instead of skipping when a known decoder leaves bytes unread in
    /// its frame.
    #[cfg_attr(feature = "config-loaders", serde(default))]
    pub strict_framing: bool,
}

#[cfg(feature = "config-loaders")]
fn default_max_payload_len() -> u32 {
    DEFAULT_MAX_PAYLOAD_LEN
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            strict_framing: false,
        }
    }
}

impl WireConfig {
    /// Load configuration from a TOML file.
    #[cfg(feature = "config-loaders")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    #[cfg(feature = "config-loaders")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn max_payload_len(mut self, limit: u32) -> Self {
        self.max_payload_len = limit;
        self
    }

    #[must_use]
    pub fn strict_framing(mut self, enabled: bool) -> Self {
        self.strict_framing = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload_len == 0 {
            return Err(ConfigError::Invalid(
                "max_payload_len must be greater than zero".into(),
            ));
        }
        if self.max_payload_len > i32::MAX as u32 {
            return Err(ConfigError::Invalid(format!(
                "max_payload_len {} exceeds the i32 length prefix range",
                self.max_payload_len
            )));
        }
        Ok(())
    }
}
