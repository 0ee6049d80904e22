//! Map configuration, deserialized from TOML.
//!
//! The defaults are embedded at compile time from `config/default.toml`
//! and mirrored by [`MapConfig::default`]; a test keeps the two in sync.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::GeographyError;

/// Embedded default configuration.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Top-level map configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// How declared province names are resolved.
    pub matching: MatchingConfig,
    /// When mountain name labels are drawn.
    pub labels: LabelConfig,
}

impl MapConfig {
    /// Parses a configuration from TOML text. Missing keys take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has mistyped keys.
    pub fn from_toml_str(text: &str) -> Result<Self, GeographyError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GeographyError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded map config from {}: {config:?}", path.display());
        Ok(config)
    }
}

/// Province name resolution options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Fall back to substring matching when exact and normalized lookups
    /// miss.
    pub fuzzy: bool,
    /// Attribute mountains without a declared province list to the province
    /// polygon containing them.
    pub geometric_fallback: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy: true,
            geometric_fallback: false,
        }
    }
}

/// Mountain label visibility options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Labels are drawn only when the zoom level is strictly greater than
    /// this.
    pub min_zoom: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { min_zoom: 5.0 }
    }
}

impl LabelConfig {
    /// Returns `true` if labels should be drawn at `zoom`.
    #[must_use]
    pub fn labels_visible_at(&self, zoom: f64) -> bool {
        zoom > self.min_zoom
    }
}
