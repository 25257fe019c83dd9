//! Per-file conflict counts across edits.
//!
//! The tracker remembers the last known conflict count of every conflicted
//! file so that a later edit can be classified by comparing counts: a drop
//! means the user just resolved something, which is what triggers
//! auto-navigation. The conflicted-file set and the count map live in one
//! structure, so a path has a count iff it is in the set.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// How a document's conflict count moved since the last evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The file had no known conflicts and now has some.
    Introduced,
    /// The count dropped but conflicts remain.
    PartiallyResolved,
    /// The last conflict in the file was resolved.
    FullyResolved,
    Unchanged,
}

impl ChangeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOutcome::Introduced => "introduced",
            ChangeOutcome::PartiallyResolved => "partially_resolved",
            ChangeOutcome::FullyResolved => "fully_resolved",
            ChangeOutcome::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ChangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
pub struct ResolutionTracker {
    /// Conflicted files in first-detection order.
    files: Vec<PathBuf>,
    counts: HashMap<PathBuf, usize>,
}

impl ResolutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fresh conflict count for `path` and classify the change.
    pub fn on_change(&mut self, path: &Path, current: usize) -> ChangeOutcome {
        let previous = self.count_for(path);

        if current > 0 {
            if self.counts.insert(path.to_path_buf(), current).is_none() {
                self.files.push(path.to_path_buf());
            }
            if previous > current {
                ChangeOutcome::PartiallyResolved
            } else if previous == 0 {
                ChangeOutcome::Introduced
            } else {
                ChangeOutcome::Unchanged
            }
        } else {
            self.remove(path);
            if previous > 0 {
                ChangeOutcome::FullyResolved
            } else {
                ChangeOutcome::Unchanged
            }
        }
    }

    /// Replace all state with the results of a full workspace scan.
    ///
    /// Entries with a zero count are ignored.
    pub fn replace_all(&mut self, results: impl IntoIterator<Item = (PathBuf, usize)>) {
        self.files.clear();
        self.counts.clear();
        for (path, count) in results {
            if count == 0 {
                continue;
            }
            if self.counts.insert(path.clone(), count).is_none() {
                self.files.push(path);
            }
        }
    }

    /// Like [`replace_all`](Self::replace_all), but paths in `fresher` keep
    /// their tracked count: it was recorded after the scan read the file.
    pub fn merge_scan(
        &mut self,
        results: impl IntoIterator<Item = (PathBuf, usize)>,
        fresher: &HashSet<PathBuf>,
    ) {
        let kept: Vec<(PathBuf, usize)> = self
            .files
            .iter()
            .filter(|f| fresher.contains(*f))
            .map(|f| (f.clone(), self.count_for(f)))
            .collect();
        let merged: Vec<(PathBuf, usize)> = results
            .into_iter()
            .filter(|(path, _)| !fresher.contains(path))
            .chain(kept)
            .collect();
        self.replace_all(merged);
    }

    pub fn count_for(&self, path: &Path) -> usize {
        self.counts.get(path).copied().unwrap_or(0)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.counts.contains_key(path)
    }

    pub fn conflicted_files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of every file's last known count.
    pub fn total_conflicts(&self) -> usize {
        self.counts.values().sum()
    }

    /// The file after `current` in set order, wrapping; the first file when
    /// `current` is absent or not conflicted.
    pub fn next_file_after(&self, current: Option<&Path>) -> Option<&Path> {
        let position = current.and_then(|c| self.files.iter().position(|f| f == c));
        let next = match position {
            Some(i) if i + 1 < self.files.len() => i + 1,
            _ => 0,
        };
        self.files.get(next).map(PathBuf::as_path)
    }

    fn remove(&mut self, path: &Path) {
        if self.counts.remove(path).is_some() {
            self.files.retain(|f| f != path);
        }
    }
}
