use crate::document::Document;
use crate::status::StatusText;
use std::path::{Path, PathBuf};

/// Where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    pub path: PathBuf,
    /// 0-based line of the cursor.
    pub cursor_line: usize,
}

/// The editor the navigator drives.
///
/// Navigation and messages are fire-and-forget: the navigator never waits
/// for, or reacts to, the host acting on them.
#[async_trait::async_trait]
pub trait EditorHost: Send + 'static {
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// Current text of the active editor's document.
    fn active_document(&self) -> Option<Document>;

    /// Load a document so it can be shown; the host decides where text comes from.
    async fn open_document(&mut self, path: &Path) -> anyhow::Result<Document>;

    /// Show `path` with the cursor on `line`.
    fn navigate(&mut self, path: &Path, line: usize);

    /// Advisory, non-modal message to the user.
    fn show_info(&mut self, message: &str);
}

/// Receives the workspace conflict total for display.
pub trait StatusSink: Send + 'static {
    fn update(&mut self, status: &StatusText);

    fn hide(&mut self);
}

/// Lists and reads the files of a workspace for the initial scan.
#[async_trait::async_trait]
pub trait WorkspaceEnumerator: Send + Sync + 'static {
    /// Every candidate file, skipping those matching `exclude` globs.
    async fn list_files(&self, exclude: &[String]) -> anyhow::Result<Vec<PathBuf>>;

    async fn read_document(&self, path: &Path) -> anyhow::Result<Document>;
}
