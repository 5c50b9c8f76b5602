// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tool settings.
//!
//! Settings live in a RON file, `nodes_editor.ron` in the working directory
//! unless `--settings` names another one. Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "nodes_editor.ron";

/// Settings for the command line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format version
    pub version: u32,
    /// Extra `tracing` filter directive, e.g. `nodes_editor_graph=debug`
    pub log_filter: String,
    /// Write documents as indented JSON
    pub pretty_json: bool,
    /// Distance between neighbouring nodes in generated presets
    pub node_spacing: [f64; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            log_filter: "nodes_editor_app=info".to_string(),
            pretty_json: true,
            node_spacing: [220.0, 140.0],
        }
    }
}

impl Settings {
    /// Parse settings from RON text
    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(s)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion(settings.version));
        }
        Ok(settings)
    }

    /// Render settings as RON text
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load an explicitly named file, or the default file if it exists,
    /// or fall back to defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(SETTINGS_FILE_NAME);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON
    #[error("Invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be rendered
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version of the tool
    #[error("Unsupported settings version {0}")]
    UnsupportedVersion(u32),
}
