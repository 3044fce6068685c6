use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Error, Result};

/// A half-open span of char offsets into a base or remote string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRange {
    /// First char of the span
    pub from: usize,

    /// One past the last char of the span
    pub to: usize,
}

impl RawRange {
    /// Create a new range from start and end (exclusive)
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Number of chars in the range
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Check if this range is empty
    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }

    /// Convert to a standard Range
    pub fn to_range(&self) -> Range<usize> {
        self.from..self.to
    }
}

impl From<Range<usize>> for RawRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A zero-based line and char column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// A raw range translated into line/column coordinates of its text.
///
/// `to` sits on the line of the range's last char, so a range ending with a
/// line terminator stays on that line and flags `ends_on_newline` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionRange {
    pub from: Position,
    pub to: Position,

    /// The char right before `to` is a line terminator
    pub ends_on_newline: bool,

    /// The range begins at the start of a line
    pub chunk_start_line: bool,

    /// The range runs to the end of its text
    pub reaches_end: bool,
}

impl PositionRange {
    /// Number of line terminators covered by the range
    pub fn line_diff(&self) -> usize {
        self.to.line - self.from.line + usize::from(self.ends_on_newline)
    }

    /// Whether every line the range touches is wholly inside it
    pub fn covers_whole_lines(&self) -> bool {
        self.chunk_start_line && (self.ends_on_newline || self.reaches_end)
    }
}

/// Translate raw char ranges over `text` into position ranges.
///
/// Ranges are translated independently, so the output is parallel to the
/// input and keeps its order.
pub fn raw_to_pos(raws: &[RawRange], text: &str) -> Result<Vec<PositionRange>> {
    let rope = Rope::from_str(text);
    raws.iter().map(|raw| translate(&rope, raw)).collect()
}

fn translate(rope: &Rope, raw: &RawRange) -> Result<PositionRange> {
    let len = rope.len_chars();
    if raw.from > raw.to || raw.to > len {
        return Err(Error::InvalidRange {
            from: raw.from,
            to: raw.to,
            len,
        });
    }

    let from_line = rope.char_to_line(raw.from);
    let from = Position::new(from_line, raw.from - rope.line_to_char(from_line));

    // `to` is exclusive, so locate the line of the last char in the range
    let to = if raw.to > raw.from {
        let to_line = rope.char_to_line(raw.to - 1);
        Position::new(to_line, raw.to - rope.line_to_char(to_line))
    } else {
        from
    };

    let ends_on_newline = raw.to > 0 && rope.char_to_line(raw.to) > rope.char_to_line(raw.to - 1);

    Ok(PositionRange {
        from,
        to,
        ends_on_newline,
        chunk_start_line: from.ch == 0,
        reaches_end: raw.to == len,
    })
}
