//! Scene system configuration
//!
//! All tunables for the rendering core live in [`SceneSystemConfig`]:
//! worker-pool sizing, per-layer primitive budgets, and the policy applied
//! when a layer's primitive buffer fills mid-frame. Configs are plain serde
//! structs loadable from TOML, with validated defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents did not parse
    #[error("parse error: {0}")]
    Parse(String),

    /// Parsed config failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// What a layer does when its primitive buffer fills mid-frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Double the buffer and resume generation where it stopped.
    /// Every primitive is kept; memory is unbounded.
    #[default]
    Grow,

    /// Keep what fits and discard the rest, logging one warning per layer
    /// per frame. Memory is bounded by `layer_buffer_capacity`.
    Drop,
}

/// Scene system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSystemConfig {
    /// Number of render worker threads. `0` means one per available
    /// hardware thread.
    pub worker_threads: usize,

    /// Initial primitive capacity of each layer's accumulation buffer.
    pub layer_buffer_capacity: usize,

    /// Policy applied when a layer's buffer fills mid-frame.
    pub overflow_policy: OverflowPolicy,

    /// Frustum culling switch. Disabling it passes every object whose flags
    /// match the layer's draw mode; useful when diagnosing culling bugs.
    pub enable_culling: bool,
}

impl Default for SceneSystemConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            layer_buffer_capacity: 4096,
            overflow_policy: OverflowPolicy::default(),
            enable_culling: true,
        }
    }
}

impl SceneSystemConfig {
    /// Load a configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layer_buffer_capacity == 0 {
            return Err(ConfigError::Invalid(
                "layer_buffer_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count with the `0 = auto` rule applied
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads > 0 {
            self.worker_threads
        } else {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneSystemConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.effective_worker_threads() >= 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SceneSystemConfig {
            layer_buffer_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_from_toml() {
        let config: SceneSystemConfig = toml::from_str(
            r#"
            worker_threads = 2
            layer_buffer_capacity = 64
            overflow_policy = "drop"
            "#,
        )
        .unwrap();

        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.layer_buffer_capacity, 64);
        assert_eq!(config.overflow_policy, OverflowPolicy::Drop);
        // missing fields fall back to defaults
        assert!(config.enable_culling);
    }

    #[test]
    fn test_explicit_worker_count_wins() {
        let config = SceneSystemConfig {
            worker_threads: 3,
            ..Default::default()
        };
        assert_eq!(config.effective_worker_threads(), 3);
    }
}
