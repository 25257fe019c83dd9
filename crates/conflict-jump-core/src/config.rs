use crate::error::NavigatorError;
use conflict_markers::MarkerSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// User-facing options, stored as `settings.json` with camelCase keys.
///
/// Every key is optional; missing keys take their defaults so a partial
/// file written by hand still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub conflict_markers: MarkerSet,
    #[serde(default = "default_true")]
    pub auto_jump_enabled: bool,
    #[serde(default = "default_true")]
    pub auto_open_next_file: bool,
    /// Milliseconds between a resolution and the automatic jump.
    #[serde(default = "default_auto_jump_delay")]
    pub auto_jump_delay: u64,
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    /// Milliseconds of quiet after an edit before it is re-classified.
    #[serde(default = "default_debounce_delay")]
    pub debounce_delay: u64,
    /// Glob patterns (relative to the workspace root) skipped by the scan.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conflict_markers: MarkerSet::default(),
            auto_jump_enabled: true,
            auto_open_next_file: true,
            auto_jump_delay: default_auto_jump_delay(),
            show_status_bar: true,
            debounce_delay: default_debounce_delay(),
            exclude: default_exclude(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_auto_jump_delay() -> u64 {
    2000
}
fn default_debounce_delay() -> u64 {
    300
}
fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".into(), "**/.git/**".into()]
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, NavigatorError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| NavigatorError::SettingsRead {
                path: path.to_path_buf(),
                source,
            })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| NavigatorError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, NavigatorError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), NavigatorError> {
        let write_err = |source| NavigatorError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), NavigatorError> {
        self.conflict_markers.validate()?;
        Ok(())
    }

    pub fn auto_jump_duration(&self) -> Duration {
        Duration::from_millis(self.auto_jump_delay)
    }

    pub fn debounce_duration(&self) -> Duration {
        Duration::from_millis(self.debounce_delay)
    }
}
