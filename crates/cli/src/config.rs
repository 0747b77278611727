//! Configuration management for the CLI
//!
//! Search thresholds are compiled into the search profiles. Only the
//! marketplace integration points come from the environment.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Template the created instances boot from
const DEFAULT_TEMPLATE_HASH: &str = "a3b79706f4f5ed8164bb1fadaeea2718";

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoutConfig {
    /// Marketplace CLI executable (`GPU_SCOUT_VASTAI_BIN`)
    #[serde(default = "default_vastai_bin")]
    pub vastai_bin: String,

    /// Deployment template for created instances (`GPU_SCOUT_TEMPLATE_HASH`)
    #[serde(default = "default_template_hash")]
    pub template_hash: String,
}

fn default_vastai_bin() -> String {
    scout_lib::source::DEFAULT_PROGRAM.to_string()
}

fn default_template_hash() -> String {
    DEFAULT_TEMPLATE_HASH.to_string()
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            vastai_bin: default_vastai_bin(),
            template_hash: default_template_hash(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from `GPU_SCOUT_*` environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("GPU_SCOUT"))
            .build()
            .context("Failed to read environment configuration")?;

        config
            .try_deserialize()
            .context("Invalid GPU_SCOUT_* configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::default();
        assert_eq!(config.vastai_bin, "vastai");
        assert_eq!(config.template_hash, DEFAULT_TEMPLATE_HASH);
    }

    #[test]
    fn test_load_without_overrides_uses_defaults() {
        // Only meaningful when the variables are not set by the caller
        if std::env::vars().any(|(k, _)| k.starts_with("GPU_SCOUT_")) {
            return;
        }
        let config = ScoutConfig::load().unwrap();
        assert_eq!(config.vastai_bin, "vastai");
    }
}
