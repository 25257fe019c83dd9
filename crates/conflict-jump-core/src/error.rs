use std::path::PathBuf;

use conflict_markers::MarkerSetError;
use thiserror::Error;

/// Errors surfaced by the navigator's ambient surfaces.
///
/// Navigation itself never fails: missing editors, stale timers and
/// malformed markers are advisory messages or silent no-ops.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("failed to read settings from '{}': {source}", .path.display())]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings '{}': {source}", .path.display())]
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings to '{}': {source}", .path.display())]
    SettingsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    SettingsSerialize(#[from] serde_json::Error),

    #[error("invalid conflict markers: {0}")]
    InvalidMarkers(#[from] MarkerSetError),

    #[error("navigator service has stopped")]
    ServiceStopped,
}
