//! Configuration system
//!
//! Runtime settings (quality level, gravity, viewport) plus a small trait
//! for loading and saving config structs from TOML or RON files.

use crate::foundation::math::Dimension;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Render quality level
///
/// Quality gates how often a paint pass may run: each level maps to a
/// minimum interval between paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Lowest fidelity, paints at most every 24 ms
    Low,
    /// Default fidelity, paints at most every 16 ms
    Medium,
    /// Highest fidelity, paints at most every 16 ms
    High,
}

impl Quality {
    /// Minimum interval between paint passes for this level
    #[must_use]
    pub const fn min_frame_interval(self) -> Duration {
        match self {
            Self::Low => Duration::from_millis(24),
            Self::Medium | Self::High => Duration::from_millis(16),
        }
    }
}

/// Runtime configuration for a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Render quality level
    pub quality: Quality,

    /// Gravity constant applied to physics-enabled objects, pixels/step^2
    pub gravity: f64,

    /// Viewport dimensions in pixels
    pub viewport: Dimension,

    /// Emit per-frame debug logging
    pub logs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            quality: Quality::Low,
            gravity: 0.8,
            viewport: Dimension::new(1280.0, 720.0),
            logs: false,
        }
    }
}

impl Config for RuntimeConfig {}
