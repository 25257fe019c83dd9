use crate::document::Document;
use crate::host::WorkspaceEnumerator;
use anyhow::Context;
use chrono::{DateTime, Utc};
use conflict_markers::ConflictDetector;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of a full workspace scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Files with at least one conflict, in enumeration order.
    pub files: Vec<(PathBuf, usize)>,
    /// Files read and scanned.
    pub scanned: usize,
    /// Files that could not be read.
    pub skipped: usize,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn total_conflicts(&self) -> usize {
        self.files.iter().map(|(_, n)| n).sum()
    }
}

/// Enumerates files under a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Whether `rel_path` matches any exclude glob.
///
/// Paths are matched with forward slashes, both bare and with a leading `./`
/// so that `**/dir/**` also covers top-level directories.
pub fn is_excluded(rel_path: &Path, exclude: &[String]) -> bool {
    let path = rel_path.to_string_lossy().replace('\\', "/");
    let dotted = format!("./{path}");
    exclude.iter().any(|pattern| {
        let pat = pattern.replace('\\', "/");
        glob_match::glob_match(&pat, &path) || glob_match::glob_match(&pat, &dotted)
    })
}

fn walk(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !is_excluded(rel, exclude)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[async_trait::async_trait]
impl WorkspaceEnumerator for FsWorkspace {
    async fn list_files(&self, exclude: &[String]) -> anyhow::Result<Vec<PathBuf>> {
        let root = self.root.clone();
        let exclude = exclude.to_vec();
        tokio::task::spawn_blocking(move || walk(&root, &exclude))
            .await
            .context("workspace walk panicked")
    }

    async fn read_document(&self, path: &Path) -> anyhow::Result<Document> {
        Document::read(path).await
    }
}

/// Scan every workspace file for conflicts.
///
/// Unreadable files (binary content, permissions, deleted mid-scan) are
/// skipped and counted rather than failing the scan.
pub async fn scan_workspace(
    workspace: &dyn WorkspaceEnumerator,
    detector: &ConflictDetector,
    exclude: &[String],
) -> anyhow::Result<ScanReport> {
    let paths = workspace
        .list_files(exclude)
        .await
        .context("failed to list workspace files")?;

    let mut files = Vec::new();
    let mut scanned = 0;
    let mut skipped = 0;
    for path in paths {
        let document = match workspace.read_document(&path).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping file");
                skipped += 1;
                continue;
            }
        };
        scanned += 1;
        let count = detector.count(&document);
        if count > 0 {
            files.push((path, count));
        }
    }

    let report = ScanReport {
        files,
        scanned,
        skipped,
        finished_at: Utc::now(),
    };
    tracing::info!(
        conflicted = report.files.len(),
        conflicts = report.total_conflicts(),
        scanned,
        skipped,
        "workspace scan finished"
    );
    Ok(report)
}
