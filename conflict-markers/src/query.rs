//! Navigation queries over one scan of a document.
//!
//! A [`ConflictIndex`] is immutable: every query on the same value sees the
//! same block list, so "conflict 2 of 3" reporting can combine
//! [`ConflictIndex::find_next`], [`ConflictIndex::index_of`] and
//! [`ConflictIndex::count`] without re-scanning in between.
//!
//! Next/previous navigation wraps around at either end of the document
//! instead of reporting that the end was reached.

use crate::types::ConflictBlock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictIndex {
    blocks: Vec<ConflictBlock>,
}

impl ConflictIndex {
    pub fn new(blocks: Vec<ConflictBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[ConflictBlock] {
        &self.blocks
    }

    pub fn count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First block starting after `current_line`, wrapping to the first block.
    ///
    /// `current_line` may be `-1` to mean "before the document".
    pub fn find_next(&self, current_line: i64) -> Option<&ConflictBlock> {
        self.blocks
            .iter()
            .find(|b| b.start_line as i64 > current_line)
            .or_else(|| self.blocks.first())
    }

    /// Last block starting before `current_line`, wrapping to the last block.
    pub fn find_previous(&self, current_line: i64) -> Option<&ConflictBlock> {
        self.blocks
            .iter()
            .rev()
            .find(|b| (b.start_line as i64) < current_line)
            .or_else(|| self.blocks.last())
    }

    /// 1-based position of the block starting at `start_line`, or 0.
    pub fn index_of(&self, start_line: usize) -> usize {
        self.blocks
            .iter()
            .position(|b| b.start_line == start_line)
            .map_or(0, |i| i + 1)
    }
}

impl From<Vec<ConflictBlock>> for ConflictIndex {
    fn from(blocks: Vec<ConflictBlock>) -> Self {
        Self::new(blocks)
    }
}

impl<'a> IntoIterator for &'a ConflictIndex {
    type Item = &'a ConflictBlock;
    type IntoIter = std::slice::Iter<'a, ConflictBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
