use crate::config::Settings;
use crate::document::Document;
use std::fmt;

/// Input to the navigator service, from the host or the user.
#[derive(Debug, Clone)]
pub enum Command {
    /// A document's text changed; carries the post-edit snapshot.
    DocumentChanged(Document),
    ActiveEditorChanged,
    JumpToNextConflict,
    JumpToPreviousConflict,
    OpenNextConflictedFile,
    ShowConflictStatus,
    ConfigChanged(Settings),
    /// Rescan the whole workspace in the background.
    ScanWorkspace,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::DocumentChanged(_) => "document_changed",
            Command::ActiveEditorChanged => "active_editor_changed",
            Command::JumpToNextConflict => "jump_to_next_conflict",
            Command::JumpToPreviousConflict => "jump_to_previous_conflict",
            Command::OpenNextConflictedFile => "open_next_conflicted_file",
            Command::ShowConflictStatus => "show_conflict_status",
            Command::ConfigChanged(_) => "config_changed",
            Command::ScanWorkspace => "scan_workspace",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
