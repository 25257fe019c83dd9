//! Core types for conflict marker detection.
//!
//! A document is viewed as a sequence of lines. Lines whose leading-trimmed
//! text begins with one of the configured prefixes are **markers**; the
//! assembler pairs markers into **blocks** delimiting one unresolved conflict.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the three conflict delimiters a line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// `<<<<<<<`: opens the "ours" side.
    Start,
    /// `=======`: divides "ours" from "theirs".
    Middle,
    /// `>>>>>>>`: closes the "theirs" side.
    End,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Start => "start",
            MarkerKind::Middle => "middle",
            MarkerKind::End => "end",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One marker occurrence found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// 0-based line index.
    pub line: usize,
    pub kind: MarkerKind,
    /// The line exactly as it appeared, before trimming.
    pub raw_text: String,
}

/// A well-formed conflict region `[start_line, end_line]`.
///
/// Always satisfies `start_line < middle_line < end_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictBlock {
    pub start_line: usize,
    pub middle_line: usize,
    pub end_line: usize,
}

impl fmt::Display for ConflictBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.start_line, self.middle_line, self.end_line
        )
    }
}

/// The three line prefixes that identify conflict markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_middle")]
    pub middle: String,
    #[serde(default = "default_end")]
    pub end: String,
}

fn default_start() -> String {
    "<<<<<<<".into()
}
fn default_middle() -> String {
    "=======".into()
}
fn default_end() -> String {
    ">>>>>>>".into()
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            start: default_start(),
            middle: default_middle(),
            end: default_end(),
        }
    }
}

impl MarkerSet {
    pub fn new(
        start: impl Into<String>,
        middle: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, MarkerSetError> {
        let set = Self {
            start: start.into(),
            middle: middle.into(),
            end: end.into(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Reject prefixes that would make classification meaningless.
    ///
    /// An empty prefix matches every line, and two identical prefixes make
    /// the lower-precedence kind unreachable.
    pub fn validate(&self) -> Result<(), MarkerSetError> {
        for (kind, prefix) in self.prefixes() {
            if prefix.trim().is_empty() {
                return Err(MarkerSetError::EmptyPrefix(kind));
            }
        }
        let [(k1, p1), (k2, p2), (k3, p3)] = self.prefixes();
        for (a, b, pa, pb) in [(k1, k2, p1, p2), (k1, k3, p1, p3), (k2, k3, p2, p3)] {
            if pa == pb {
                return Err(MarkerSetError::DuplicatePrefix {
                    first: a,
                    second: b,
                    prefix: pa.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Classify one line. Precedence is start, then middle, then end.
    pub fn classify(&self, line: &str) -> Option<MarkerKind> {
        let text = line.trim_start();
        self.prefixes()
            .into_iter()
            .find(|(_, prefix)| text.starts_with(*prefix))
            .map(|(kind, _)| kind)
    }

    fn prefixes(&self) -> [(MarkerKind, &str); 3] {
        [
            (MarkerKind::Start, self.start.as_str()),
            (MarkerKind::Middle, self.middle.as_str()),
            (MarkerKind::End, self.end.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerSetError {
    #[error("{0} marker prefix is empty")]
    EmptyPrefix(MarkerKind),

    #[error("{first} and {second} markers share the prefix '{prefix}'")]
    DuplicatePrefix {
        first: MarkerKind,
        second: MarkerKind,
        prefix: String,
    },
}

/// Read-only, line-addressable text.
///
/// Implementors must return a line for every index below `line_count()`.
pub trait TextSource {
    fn line_count(&self) -> usize;

    fn line_at(&self, index: usize) -> &str;
}

impl TextSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index]
    }
}

impl TextSource for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        &self[index]
    }
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line_at(&self, index: usize) -> &str {
        (**self).line_at(index)
    }
}

impl TextSource for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        &self[index]
    }
}

impl TextSource for Vec<&str> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index]
    }
}
