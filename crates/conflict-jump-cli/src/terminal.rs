//! Terminal host for `conflict-jump watch`.
//!
//! There is no real editor, so the "active editor" is whichever file was
//! last modified on disk or navigated to, and navigation intents are printed.

use conflict_jump_core::document::display_name;
use conflict_jump_core::{
    ActiveEditor, Document, EditorHost, FsWorkspace, NavigatorHandle, StatusSink, StatusText,
    WorkspaceEnumerator,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct TerminalHost {
    root: PathBuf,
    active: Arc<Mutex<Option<ActiveEditor>>>,
}

impl TerminalHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: Arc::default(),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveEditor>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `path` as being edited. Returns whether the active file changed.
    pub fn touch(&self, path: &Path) -> bool {
        let mut active = self.active();
        if active.as_ref().is_some_and(|a| a.path == path) {
            return false;
        }
        *active = Some(ActiveEditor {
            path: path.to_path_buf(),
            cursor_line: 0,
        });
        true
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[async_trait::async_trait]
impl EditorHost for TerminalHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.active().clone()
    }

    fn active_document(&self) -> Option<Document> {
        let path = self.active().as_ref()?.path.clone();
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(Document::from_text(path, &text)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "active file unreadable");
                None
            }
        }
    }

    async fn open_document(&mut self, path: &Path) -> anyhow::Result<Document> {
        Document::read(path).await
    }

    fn navigate(&mut self, path: &Path, line: usize) {
        println!("-> {}:{}", self.relative(path).display(), line + 1);
        *self.active() = Some(ActiveEditor {
            path: path.to_path_buf(),
            cursor_line: line,
        });
    }

    fn show_info(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Prints the status line whenever its text changes.
#[derive(Debug, Default)]
pub struct TerminalStatus {
    last: Option<String>,
}

impl StatusSink for TerminalStatus {
    fn update(&mut self, status: &StatusText) {
        if self.last.as_deref() == Some(status.text.as_str()) {
            return;
        }
        println!("[status] {}", status.text);
        self.last = Some(status.text.clone());
    }

    fn hide(&mut self) {
        self.last = None;
    }
}

/// Poll the workspace for modified files and report them as edits.
///
/// The first pass only records modification times. Stops once the service
/// has gone away.
pub async fn watch_files(
    workspace: FsWorkspace,
    exclude: Vec<String>,
    host: TerminalHost,
    handle: NavigatorHandle,
) -> anyhow::Result<()> {
    let mut seen: HashMap<PathBuf, SystemTime> = HashMap::new();
    let mut primed = false;
    let mut interval = tokio::time::interval(POLL_INTERVAL);

    loop {
        interval.tick().await;
        let files = workspace.list_files(&exclude).await?;
        for path in files {
            let Ok(modified) = tokio::fs::metadata(&path).await.and_then(|m| m.modified()) else {
                continue;
            };
            if seen.insert(path.clone(), modified) == Some(modified) || !primed {
                continue;
            }

            let document = match workspace.read_document(&path).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping changed file");
                    continue;
                }
            };
            tracing::debug!(file = %display_name(&path), "file modified");
            if host.touch(&path) {
                handle.active_editor_changed().await?;
            }
            handle.document_changed(document).await?;
        }
        primed = true;
    }
}
