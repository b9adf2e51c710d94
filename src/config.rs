/// User settings
///
/// Optional JSON file in the user's config directory:
/// - Linux: ~/.config/nail-visualizer/settings.json
/// - macOS: ~/Library/Application Support/nail-visualizer/settings.json
/// - Windows: %APPDATA%\nail-visualizer\settings.json
///
/// A missing file means defaults. Missing fields take their defaults too.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::{DEFAULT_COLOR, DEFAULT_PALETTE};
use crate::error::{Error, Result};
use crate::state::edit::Adjustments;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log spec used when `RUST_LOG` is unset
    pub log_level: String,
    /// Nail color at startup
    pub default_color: String,
    /// Swatches shown under the picker
    pub palette: Vec<String>,
    /// Adjustments applied on upload and by "Reset Adjustments"
    pub adjustments: Adjustments,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            adjustments: Adjustments::default(),
        }
    }
}

impl Settings {
    /// Where the settings file lives, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("nail-visualizer");
        path.push("settings.json");
        Some(path)
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Settings = serde_json::from_str(&text).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(settings.sanitized())
    }

    /// Convert to pretty JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn sanitized(mut self) -> Self {
        self.adjustments = self.adjustments.clamped();
        if self.palette.is_empty() {
            self.palette = Self::default().palette;
        }
        self
    }
}
