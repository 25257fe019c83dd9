//! Conflict detector: scanner + assembler behind the current marker set.

use crate::assembler::assemble;
use crate::query::ConflictIndex;
use crate::scanner::{scan, scan_str};
use crate::types::{MarkerSet, MarkerSetError, TextSource};

/// Produces a fresh [`ConflictIndex`] for a document on every call.
///
/// Nothing is cached between calls, so results always reflect the text
/// passed in, even if the same document was scanned a moment before.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    markers: MarkerSet,
}

impl ConflictDetector {
    pub fn new(markers: MarkerSet) -> Result<Self, MarkerSetError> {
        markers.validate()?;
        Ok(Self { markers })
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Swap in a new marker set, e.g. after a configuration change.
    pub fn set_markers(&mut self, markers: MarkerSet) -> Result<(), MarkerSetError> {
        markers.validate()?;
        if markers != self.markers {
            tracing::debug!(
                start = %markers.start,
                middle = %markers.middle,
                end = %markers.end,
                "conflict markers updated"
            );
        }
        self.markers = markers;
        Ok(())
    }

    pub fn detect<T: TextSource + ?Sized>(&self, source: &T) -> ConflictIndex {
        let markers = scan(source, &self.markers);
        ConflictIndex::new(assemble(&markers))
    }

    pub fn detect_str(&self, text: &str) -> ConflictIndex {
        let markers = scan_str(text, &self.markers);
        ConflictIndex::new(assemble(&markers))
    }

    pub fn has_conflicts<T: TextSource + ?Sized>(&self, source: &T) -> bool {
        !self.detect(source).is_empty()
    }

    pub fn count<T: TextSource + ?Sized>(&self, source: &T) -> usize {
        self.detect(source).count()
    }
}
