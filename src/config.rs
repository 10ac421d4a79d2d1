use anyhow::{Context, Result};
use catalog::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::paths;

// ============================================================================
// Main Config Schema
// ============================================================================

/// The mcm configuration, read from `config.toml` in the config directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct McmConfig {
    /// Digest used to derive resource ids from labels
    pub hash: HashAlgorithm,

    /// How compiled catalogs are written
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print catalog JSON
    pub pretty: bool,
}

impl McmConfig {
    /// Load the config from the config directory, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    /// Load the config from a specific file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))
    }

    /// Serialize the config as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
