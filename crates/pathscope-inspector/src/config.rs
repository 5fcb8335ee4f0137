//! Inspector configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! marker_attribute = "data-source-path"
//! indent_width = 2
//!
//! [highlight]
//! width_px = 2
//! color = "#3b82f6"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scanner::DEFAULT_MARKER_ATTRIBUTE;

/// Errors raised while loading an [`InspectorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{}'", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// The values parse but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Outline applied to the selected element.
///
/// The outline offset always equals the outline width.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Outline width in CSS pixels.
    pub width_px: u32,
    /// Any CSS color.
    pub color: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            width_px: 2,
            color: "#3b82f6".to_string(),
        }
    }
}

impl HighlightStyle {
    /// Value for the `outline` property, e.g. `2px solid #3b82f6`.
    #[must_use]
    pub fn outline(&self) -> String {
        format!("{}px solid {}", self.width_px, self.color)
    }

    /// Value for the `outline-offset` property, e.g. `2px`.
    #[must_use]
    pub fn outline_offset(&self) -> String {
        format!("{}px", self.width_px)
    }
}

/// Settings shared by the scanner, the panel and the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Attribute whose presence marks an element and whose value is its
    /// source path.
    pub marker_attribute: String,
    /// Indentation per depth level, in columns of the text renderer.
    pub indent_width: usize,
    /// Highlight applied on selection.
    pub highlight: HighlightStyle,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            indent_width: 2,
            highlight: HighlightStyle::default(),
        }
    }
}

impl InspectorConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`InspectorConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), marker = %config.marker_attribute, "loaded config");
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.marker_attribute.trim();
        if marker.is_empty() {
            return Err(ConfigError::Invalid(
                "marker_attribute must not be empty".to_string(),
            ));
        }
        if marker.contains(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>') {
            return Err(ConfigError::Invalid(format!(
                "marker_attribute '{marker}' is not a valid attribute name"
            )));
        }
        if self.highlight.width_px == 0 {
            return Err(ConfigError::Invalid(
                "highlight.width_px must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
