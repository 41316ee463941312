// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: alarmd TOML configuration
//! OWNERS: @runtime

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default per-uid cap on live alarms.
pub const DEFAULT_MAX_ALARMS_PER_UID: usize = 500;
/// Default global cap keeping service memory bounded.
pub const DEFAULT_MAX_ALARMS_TOTAL: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(&'static str),
}

/// Service limits.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AlarmdConfig {
    /// Live alarms one uid may hold.
    pub max_alarms_per_uid: usize,
    /// Live alarms across all callers.
    pub max_alarms_total: usize,
}

impl Default for AlarmdConfig {
    fn default() -> Self {
        Self {
            max_alarms_per_uid: DEFAULT_MAX_ALARMS_PER_UID,
            max_alarms_total: DEFAULT_MAX_ALARMS_TOTAL,
        }
    }
}

impl AlarmdConfig {
    /// Loads and validates a TOML config file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse_from(&data, path)
    }

    /// Parses and validates TOML text.
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        Self::parse_from(data, Path::new("<inline>"))
    }

    fn parse_from(data: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AlarmdConfig = toml::from_str(data)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_alarms_per_uid == 0 {
            return Err(ConfigError::Invalid("max_alarms_per_uid must be non-zero"));
        }
        if self.max_alarms_total == 0 {
            return Err(ConfigError::Invalid("max_alarms_total must be non-zero"));
        }
        Ok(())
    }
}
