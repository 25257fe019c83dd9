use anyhow::Context;
use conflict_markers::TextSource;
use std::path::{Path, PathBuf};

/// An immutable snapshot of one file's text, split into lines.
///
/// Change notifications carry a snapshot rather than a live buffer, so a
/// debounced evaluation sees exactly the text of the last edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    lines: Vec<String>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Split `text` on `\n`, dropping a trailing `\r` from each line.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self::new(path, lines)
    }

    pub async fn read(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::from_text(path, &text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Last path component, for user-facing messages.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

impl TextSource for Document {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_at(&self, index: usize) -> &str {
        &self.lines[index]
    }
}

/// Last component of `path`, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
