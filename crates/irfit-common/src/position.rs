//! Source positions.
//!
//! Source front ends report 1-based lines and columns. IR line hints carry
//! only a line, so placeholder elements use [`Position::line`], which spans
//! the whole line with zero columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A span in a source file (1-indexed lines and columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Position {
    pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Position {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// An approximate position covering a single line, used when only an IR
    /// line hint is known.
    pub const fn line(line: u32) -> Self {
        Position::new(line, 0, line, 0)
    }

    /// True if `line` falls inside this span.
    pub const fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}
