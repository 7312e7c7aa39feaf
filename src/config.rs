//! Configuration file support.
//!
//! The only user-tunable piece of the curation workflow is the appearance of
//! the cell layer. Settings are stored as JSON in the platform config
//! directory; a missing or unreadable file falls back to defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::cell_layer;
use crate::viewer::PointStyle;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Errors that can occur while saving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No platform config directory is available
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Display attributes of the cell layer
    #[serde(default)]
    pub cell_layer: CellLayerConfig,
}

/// Cell layer appearance section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellLayerConfig {
    /// Marker symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Marker size in display units
    #[serde(default = "default_size")]
    pub size: f32,

    /// Layer opacity, 0.0 to 1.0
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Marker face colour name
    #[serde(default = "default_face_color")]
    pub face_color: String,
}

fn default_symbol() -> String {
    cell_layer::SYMBOL.to_string()
}

fn default_size() -> f32 {
    cell_layer::SIZE
}

fn default_opacity() -> f32 {
    cell_layer::OPACITY
}

fn default_face_color() -> String {
    cell_layer::FACE_COLOR.to_string()
}

impl Default for CellLayerConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            size: default_size(),
            opacity: default_opacity(),
            face_color: default_face_color(),
        }
    }
}

impl CellLayerConfig {
    /// Convert to the viewer-facing point style.
    pub fn to_point_style(&self) -> PointStyle {
        PointStyle {
            symbol: self.symbol.clone(),
            size: self.size,
            opacity: self.opacity,
            face_color: self.face_color.clone(),
        }
    }
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            cell_layer: CellLayerConfig::default(),
        }
    }
}

impl CurationConfig {
    /// Path of the config file, when the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cellcurate").join("config.json"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or cannot be parsed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save the configuration to the platform config directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fixed_layer_attributes() {
        let config = CurationConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.cell_layer.symbol, "ring");
        assert_eq!(config.cell_layer.size, 10.0);
        assert_eq!(config.cell_layer.opacity, 0.6);
        assert_eq!(config.cell_layer.face_color, "lightgoldenrodyellow");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CurationConfig =
            serde_json::from_str(r#"{"version": 1, "cell_layer": {"size": 14.0}}"#).unwrap();
        assert_eq!(config.cell_layer.size, 14.0);
        assert_eq!(config.cell_layer.symbol, "ring");
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let mut config = CurationConfig::default();
        config.cell_layer.face_color = "tomato".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let back: CurationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cell_layer.face_color, "tomato");
    }

    #[test]
    fn test_to_point_style() {
        let style = CellLayerConfig::default().to_point_style();
        assert_eq!(style, PointStyle::default());
    }
}
