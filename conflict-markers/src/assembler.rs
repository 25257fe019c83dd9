//! Conflict block assembler.
//!
//! Pairs the scanner's marker stream into [`ConflictBlock`]s with a small
//! state machine. Malformed input is never an error: stray middle/end
//! markers are ignored and unterminated conflicts are dropped, so a
//! half-edited document still yields every block that is complete.

use crate::types::{ConflictBlock, Marker, MarkerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    SawStart { start: usize },
    SawMiddle { start: usize, middle: usize },
}

/// Assemble markers (in line order) into well-formed blocks.
pub fn assemble<'a, I>(markers: I) -> Vec<ConflictBlock>
where
    I: IntoIterator<Item = &'a Marker>,
{
    let mut blocks = Vec::new();
    let mut state = State::Idle;

    for marker in markers {
        state = match (state, marker.kind) {
            // A start always (re)opens a block; the last start before a middle wins.
            (_, MarkerKind::Start) => State::SawStart { start: marker.line },
            (State::SawStart { start }, MarkerKind::Middle) => State::SawMiddle {
                start,
                middle: marker.line,
            },
            (State::SawMiddle { start, middle }, MarkerKind::End) => {
                blocks.push(ConflictBlock {
                    start_line: start,
                    middle_line: middle,
                    end_line: marker.line,
                });
                State::Idle
            }
            // Second middle keeps the first; stray middle/end markers are ignored.
            (current, _) => current,
        };
    }

    if state != State::Idle {
        tracing::trace!(?state, "dropping unterminated conflict");
    }

    blocks
}
