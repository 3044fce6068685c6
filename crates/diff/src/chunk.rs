use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::range::PositionRange;

/// A correlated pair of line spans, one visually grouped change.
///
/// Both spans are half-open. A span whose start equals its end is a
/// zero-width insertion point on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    /// First line of the chunk in the remote text
    pub edit_from: usize,

    /// One past the last line of the chunk in the remote text
    pub edit_to: usize,

    /// First line of the chunk in the base text
    pub orig_from: usize,

    /// One past the last line of the chunk in the base text
    pub orig_to: usize,
}

impl Chunk {
    pub fn new(edit_from: usize, edit_to: usize, orig_from: usize, orig_to: usize) -> Self {
        Self {
            edit_from,
            edit_to,
            orig_from,
            orig_to,
        }
    }

    /// Check if the remote line belongs to this chunk
    pub fn in_edit(&self, line: usize) -> bool {
        line >= self.edit_from && line < self.edit_to
    }

    /// Check if the base line belongs to this chunk
    pub fn in_orig(&self, line: usize) -> bool {
        line >= self.orig_from && line < self.orig_to
    }

    /// Remote lines as a standard Range
    pub fn edit_range(&self) -> Range<usize> {
        self.edit_from..self.edit_to
    }

    /// Base lines as a standard Range
    pub fn orig_range(&self) -> Range<usize> {
        self.orig_from..self.orig_to
    }

    fn cover(&mut self, edit: &Range<usize>, orig: &Range<usize>) {
        self.edit_from = self.edit_from.min(edit.start);
        self.edit_to = self.edit_to.max(edit.end);
        self.orig_from = self.orig_from.min(orig.start);
        self.orig_to = self.orig_to.max(orig.end);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Addition,
    Deletion,
}

/// Line spans a single range occupies on its own side and on the other side
struct Spans {
    own: Range<usize>,
    other: Range<usize>,
}

impl Spans {
    fn of(range: &PositionRange, other_start: usize) -> Self {
        let start = range.from.line;
        let whole = range.covers_whole_lines();

        // A range ending on a newline leaves the following line untouched
        // unless it also started mid-line and split that line in two.
        let end_offset = if whole && range.ends_on_newline { 0 } else { 1 };
        let other_len = if whole { 0 } else { 1 };

        Self {
            own: start..start + range.line_diff() + end_offset,
            other: other_start..other_start + other_len,
        }
    }
}

/// Merge sorted additions (against the remote text) and deletions (against
/// the base text) into ordered, non-overlapping chunks.
///
/// Both inputs must be sorted by `from`. Edits with no unchanged line
/// between them end up in the same chunk.
pub fn build_chunks(additions: &[PositionRange], deletions: &[PositionRange]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Option<Chunk> = None;

    // Base line minus remote line for the text after everything consumed
    let mut edit_offset: isize = 0;
    let mut ia = 0;
    let mut id = 0;

    loop {
        let side = match (additions.get(ia), deletions.get(id)) {
            (Some(addition), Some(deletion)) => {
                let deletion_line = deletion.from.line as isize - edit_offset;
                let addition_line = addition.from.line as isize;
                // TODO: track a char-level offset too, the column test below
                // compares raw columns of two different texts
                if addition_line < deletion_line
                    || (addition_line == deletion_line && addition.from.ch <= deletion.from.ch)
                {
                    Side::Addition
                } else {
                    Side::Deletion
                }
            }
            (Some(_), None) => Side::Addition,
            (None, Some(_)) => Side::Deletion,
            (None, None) => break,
        };

        let range = match side {
            Side::Addition => {
                ia += 1;
                &additions[ia - 1]
            }
            Side::Deletion => {
                id += 1;
                &deletions[id - 1]
            }
        };

        let other_start = match side {
            Side::Addition => range.from.line as isize + edit_offset,
            Side::Deletion => range.from.line as isize - edit_offset,
        };
        let spans = Spans::of(range, other_start.max(0) as usize);
        let (edit, orig) = match side {
            Side::Addition => (&spans.own, &spans.other),
            Side::Deletion => (&spans.other, &spans.own),
        };
        trace!(
            "{:?} at {}:{} spans edit {:?} orig {:?}",
            side,
            range.from.line,
            range.from.ch,
            edit,
            orig
        );

        current = match current {
            Some(mut chunk) => {
                let overlaps = match side {
                    Side::Addition => orig.start <= chunk.orig_to,
                    Side::Deletion => edit.start <= chunk.edit_to,
                };
                if overlaps {
                    chunk.cover(edit, orig);
                    Some(chunk)
                } else {
                    chunks.push(chunk);
                    Some(Chunk::new(edit.start, edit.end, orig.start, orig.end))
                }
            }
            None => Some(Chunk::new(edit.start, edit.end, orig.start, orig.end)),
        };

        let linediff = range.line_diff() as isize;
        match side {
            Side::Addition => edit_offset -= linediff,
            Side::Deletion => edit_offset += linediff,
        }
    }

    chunks.extend(current);
    debug!(
        "built {} chunks from {} additions and {} deletions",
        chunks.len(),
        additions.len(),
        deletions.len()
    );
    chunks
}
