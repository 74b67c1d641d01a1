//! Source positions and ranges
//!
//! Lines and columns are 1-based and counted in characters; a tab is one
//! column. Range ends are inclusive: a one-character token begins and ends
//! at the same position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (line, column) pair, ordered lexicographically
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const HOME: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the next column on the same line
    pub fn right(self, columns: usize) -> Self {
        Self::new(self.line, self.column + columns)
    }

    /// Position after walking over `text` starting here
    ///
    /// `\r\n`, `\n` and `\r` each count as one line break.
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    pos = Position::new(pos.line + 1, 1);
                }
                '\n' => pos = Position::new(pos.line + 1, 1),
                _ => pos.column += 1,
            }
        }
        pos
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An inclusive (begin, end) span of positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub begin: Position,
    pub end: Position,
}

impl Range {
    pub fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    pub fn from_coords(begin_line: usize, begin_column: usize, end_line: usize, end_column: usize) -> Self {
        Self::new(
            Position::new(begin_line, begin_column),
            Position::new(end_line, end_column),
        )
    }

    /// Whether `position` lies inside this range, ends included
    pub fn contains_position(&self, position: Position) -> bool {
        self.begin <= position && position <= self.end
    }

    /// Whether `other` lies entirely inside this range
    pub fn contains(&self, other: &Range) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Whether the ranges share at least one position
    pub fn overlaps(&self, other: &Range) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Smallest range covering both
    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.begin.min(other.begin), self.end.max(other.end))
    }

    /// Number of lines touched by the range
    pub fn line_count(&self) -> usize {
        self.end.line - self.begin.line + 1
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}
