//! Engine configuration persistence
//!
//! Stores grid preferences in `~/.config/gridview/config.yaml`. The config is
//! loaded once at startup and passed by reference to the components that
//! need it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Horizontal placement of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Numbers right, everything else left
    #[default]
    Auto,
    Left,
    Center,
    Right,
}

/// Every recognized grid option with its default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of a column without an explicit width
    pub cell_width: f64,
    pub min_cell_width: f64,
    pub max_cell_width: f64,
    pub row_height: f64,
    pub row_header_width: f64,
    pub header_height: f64,
    /// Font size in points
    pub font_size: f32,
    /// Digits shown for floating point values
    pub float_precision: usize,
    /// Space between cell border and text
    pub cell_padding: f64,
    /// Columns narrower than this draw no text
    pub min_text_width: f64,
    /// Average glyph advance as a fraction of the font size
    pub char_width_factor: f64,
    /// Most category values offered by the choice editor
    pub category_choice_limit: usize,
    /// Label rows with index values instead of sequential numbers
    pub show_index: bool,
    pub align: Align,
    /// Selected theme id (e.g., "default-dark", "default-light")
    pub theme: String,
    /// TTF/OTF font used by the viewer; system fonts are tried when unset
    pub font_path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_width: 100.0,
            min_cell_width: 30.0,
            max_cell_width: 300.0,
            row_height: 22.0,
            row_header_width: 50.0,
            header_height: 24.0,
            font_size: 13.0,
            float_precision: 3,
            cell_padding: 4.0,
            min_text_width: 12.0,
            char_width_factor: 0.6,
            category_choice_limit: 30,
            show_index: false,
            align: Align::Auto,
            theme: "default-dark".to_string(),
            font_path: None,
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a config file; missing keys take their defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(io_error)
    }

    /// Update theme and save
    pub fn set_theme(&mut self, theme_id: &str) -> Result<(), ConfigError> {
        self.theme = theme_id.to_string();
        self.save()
    }

    /// Average glyph advance in pixels
    pub fn char_width(&self) -> f64 {
        self.font_size as f64 * self.char_width_factor
    }

    /// Repair values that would break layout math
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.min_cell_width <= 0.0 {
            self.min_cell_width = defaults.min_cell_width;
        }
        if self.max_cell_width < self.min_cell_width {
            self.max_cell_width = self.min_cell_width;
        }
        self.cell_width = self.cell_width.clamp(self.min_cell_width, self.max_cell_width);
        if self.row_height < 1.0 {
            self.row_height = defaults.row_height;
        }
        if self.font_size <= 0.0 {
            self.font_size = defaults.font_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("float_precision: 2\nalign: right\n").unwrap();
        assert_eq!(config.float_precision, 2);
        assert_eq!(config.align, Align::Right);
        assert_eq!(config.cell_width, 100.0);
        assert_eq!(config.theme, "default-dark");
    }

    #[test]
    fn test_sanitized_repairs_bad_widths() {
        let config = EngineConfig {
            min_cell_width: -5.0,
            max_cell_width: 10.0,
            cell_width: 500.0,
            row_height: 0.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.min_cell_width, 30.0);
        assert_eq!(config.max_cell_width, 30.0);
        assert_eq!(config.cell_width, 30.0);
        assert_eq!(config.row_height, 22.0);
    }

    #[test]
    fn test_char_width() {
        let config = EngineConfig::default();
        assert!((config.char_width() - 7.8).abs() < 1e-9);
    }
}
