//! Cell positions and A1 notation.
//!
//! Provides conversion between spreadsheet-style references (e.g., "A1",
//! "B2", "AA100") and zero-indexed row/column coordinates.
//!
//! A [`Position`] is allowed to be out of range: formulas may carry a
//! reference past the edge of the sheet and evaluate it to `#REF!`.
//! Use [`Position::is_valid`] before treating one as an addressable cell.
//!
//! # Examples
//!
//! ```
//! use sheetgraph_engine::engine::Position;
//!
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos.col, 1); // 0-indexed
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows.
pub const MAX_ROWS: usize = 1_048_576;
/// Number of addressable columns (`A` through `XFD`).
pub const MAX_COLS: usize = 16_384;

/// A cell position by row and column (0-indexed).
///
/// Ordering is row-major, so sorted positions read like a printed sheet.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// A position that is never valid.
    pub const NONE: Position = Position {
        row: usize::MAX,
        col: usize::MAX,
    };

    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Whether this position lies inside the sheet.
    pub const fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a reference written in A1 notation (letters are case-insensitive).
    ///
    /// Returns `None` if the text is not shaped like a reference. A
    /// well-shaped reference outside the sheet (`ZZZZ1`, `A0`) still parses,
    /// into a position for which [`is_valid`](Position::is_valid) is false.
    pub fn from_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let digits = &caps["digits"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.saturating_mul(26).saturating_add(digit);
        }
        let col = col_acc - 1;

        // Row "0" and rows too long for usize land out of range.
        let row = digits
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .unwrap_or(usize::MAX);

        Some(Position::new(row, col))
    }

    /// Convert a column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<digits>[0-9]+)$")
            .expect("A1 reference regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Position::from_a1(s) {
            Some(pos) if pos.is_valid() => Ok(pos),
            Some(_) => Err(format!("Cell reference out of range: {}", s)),
            None => Err(format!("Invalid cell reference: {}", s)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("#REF!");
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Dimensions of the printable area of a sheet.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    pub const fn new(rows: usize, cols: usize) -> Size {
        Size { rows, cols }
    }
}
