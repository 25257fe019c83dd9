//! # conflict-markers
//!
//! Finds version-control conflict regions in plain text and answers
//! navigation questions about them.
//!
//! ## Pipeline
//!
//! 1. **Scanner**: classifies each line by prefix against a [`MarkerSet`]
//!    (start, then middle, then end) and emits [`Marker`]s in line order.
//! 2. **Assembler**: pairs markers into [`ConflictBlock`]s. Unterminated or
//!    out-of-order markers are silently dropped; a malformed document never
//!    fails, it just yields fewer blocks.
//! 3. **Query**: a [`ConflictIndex`] answers next/previous (both wrap
//!    around), count and "conflict N of M" position over one scan.
//!
//! ## Example
//!
//! ```rust
//! use conflict_markers::ConflictDetector;
//!
//! let detector = ConflictDetector::default();
//! let index = detector.detect_str("<<<<<<< HEAD\na\n=======\nb\n>>>>>>> main");
//!
//! let next = index.find_next(-1).unwrap();
//! assert_eq!((next.start_line, next.middle_line, next.end_line), (0, 2, 4));
//! assert_eq!(index.index_of(next.start_line), 1);
//! ```

pub mod assembler;
pub mod detector;
pub mod query;
pub mod scanner;
pub mod types;

pub use assembler::assemble;
pub use detector::ConflictDetector;
pub use query::ConflictIndex;
pub use scanner::{scan, scan_str};
pub use types::{ConflictBlock, Marker, MarkerKind, MarkerSet, MarkerSetError, TextSource};
