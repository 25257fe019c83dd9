//! In-memory host for embedding and tests.
//!
//! Handles are cheap clones over shared state, so a copy kept outside the
//! navigator can inspect what it did after the original was moved in.

use crate::document::Document;
use crate::host::{ActiveEditor, EditorHost, StatusSink};
use crate::status::StatusText;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct HostState {
    documents: HashMap<PathBuf, Document>,
    active: Option<ActiveEditor>,
    navigations: Vec<(PathBuf, usize)>,
    messages: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a document's text.
    pub fn put_document(&self, document: Document) {
        self.state()
            .documents
            .insert(document.path().to_path_buf(), document);
    }

    /// Make `path` the active editor with the cursor on `line`.
    pub fn focus(&self, path: impl Into<PathBuf>, line: usize) {
        self.state().active = Some(ActiveEditor {
            path: path.into(),
            cursor_line: line,
        });
    }

    pub fn close_editor(&self) {
        self.state().active = None;
    }

    pub fn navigations(&self) -> Vec<(PathBuf, usize)> {
        self.state().navigations.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state().messages.clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.state().messages.last().cloned()
    }
}

#[async_trait::async_trait]
impl EditorHost for MemoryHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.state().active.clone()
    }

    fn active_document(&self) -> Option<Document> {
        let state = self.state();
        let active = state.active.as_ref()?;
        state.documents.get(&active.path).cloned()
    }

    async fn open_document(&mut self, path: &Path) -> anyhow::Result<Document> {
        self.state()
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no document at {}", path.display()))
    }

    fn navigate(&mut self, path: &Path, line: usize) {
        let mut state = self.state();
        state.navigations.push((path.to_path_buf(), line));
        state.active = Some(ActiveEditor {
            path: path.to_path_buf(),
            cursor_line: line,
        });
    }

    fn show_info(&mut self, message: &str) {
        self.state().messages.push(message.to_string());
    }
}

#[derive(Debug, Default)]
struct StatusState {
    current: Option<StatusText>,
    visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStatus {
    state: Arc<Mutex<StatusState>>,
}

impl MemoryStatus {
    fn state(&self) -> MutexGuard<'_, StatusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<StatusText> {
        self.state().current.clone()
    }

    pub fn visible(&self) -> bool {
        self.state().visible
    }
}

impl StatusSink for MemoryStatus {
    fn update(&mut self, status: &StatusText) {
        let mut state = self.state();
        state.current = Some(status.clone());
        state.visible = true;
    }

    fn hide(&mut self) {
        self.state().visible = false;
    }
}
