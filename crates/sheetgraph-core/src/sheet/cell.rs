//! Cells: content, memoized value, and dependency edges.

use std::cell::RefCell;
use std::collections::HashSet;

use sheetgraph_engine::engine::{Formula, ParseError, Position, Value};

/// Leading character that turns input into a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces input to be read as literal text.
pub const ESCAPE_SIGN: char = '\'';

/// Identifier for a cell slot in a [`Sheet`](super::Sheet).
///
/// A slot index plus a generation counter. The generation is bumped every
/// time a slot is reused, so a stale id never aliases a different cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CellId(pub(crate) usize, pub(crate) u32);

impl CellId {
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// What a cell holds.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Classify raw user input.
    /// - Empty string -> Empty
    /// - `=` followed by anything -> Formula (the rest is parsed)
    /// - Otherwise -> Text, verbatim (including a lone `=` or a leading `'`)
    pub fn from_input(input: &str) -> Result<CellContent, ParseError> {
        if input.is_empty() {
            return Ok(CellContent::Empty);
        }
        match input.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(Formula::parse(expression)?))
            }
            _ => Ok(CellContent::Text(input.to_string())),
        }
    }

    /// The text a user would edit: formulas in canonical form with their
    /// leading `=`, text verbatim.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_SIGN, f.expression()),
        }
    }

    /// In-range positions a formula reads; empty for other content.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Formula(f) => f.referenced_cells(),
            _ => Vec::new(),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

/// A cell in the sheet.
///
/// Edges are stored on both ends: `depends_on` lists the cells this cell's
/// formula reads, `referenced_by` lists the cells whose formulas read this
/// one. The sheet keeps the two in sync.
#[derive(Debug)]
pub struct Cell {
    pub(crate) position: Position,
    pub(crate) content: CellContent,
    /// Last computed value of a formula. `None` means it must be recomputed.
    pub(crate) memo: RefCell<Option<Value>>,
    pub(crate) depends_on: HashSet<CellId>,
    pub(crate) referenced_by: HashSet<CellId>,
    /// False once the cell has been cleared. The slot lingers, unlisted,
    /// while other formulas still reference it.
    pub(crate) listed: bool,
}

impl Cell {
    pub(crate) fn new_empty(position: Position) -> Cell {
        Cell {
            position,
            content: CellContent::Empty,
            memo: RefCell::new(None),
            depends_on: HashSet::new(),
            referenced_by: HashSet::new(),
            listed: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Text as entered (see [`CellContent::text`]).
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// In-range positions this cell's formula reads.
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells()
    }

    /// Whether any formula in the sheet reads this cell.
    pub fn is_referenced(&self) -> bool {
        !self.referenced_by.is_empty()
    }

    /// Value of non-formula content. Text loses one leading escape sign.
    pub(crate) fn literal_value(&self) -> Option<Value> {
        match &self.content {
            CellContent::Empty => Some(Value::default()),
            CellContent::Text(s) => {
                let text = s.strip_prefix(ESCAPE_SIGN).unwrap_or(s);
                Some(Value::Text(text.to_string()))
            }
            CellContent::Formula(_) => None,
        }
    }

    pub(crate) fn memo(&self) -> Option<Value> {
        self.memo.borrow().clone()
    }

    pub(crate) fn needs_evaluation(&self) -> bool {
        self.content.is_formula() && self.memo.borrow().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classification() {
        assert_eq!(CellContent::from_input("").unwrap(), CellContent::Empty);
        assert_eq!(
            CellContent::from_input("hello").unwrap(),
            CellContent::Text("hello".to_string())
        );
        assert_eq!(
            CellContent::from_input("=").unwrap(),
            CellContent::Text("=".to_string())
        );
        assert!(CellContent::from_input("=1+2").unwrap().is_formula());
        assert_eq!(
            CellContent::from_input("'=1+2").unwrap(),
            CellContent::Text("'=1+2".to_string())
        );
    }

    #[test]
    fn test_from_input_does_not_trim() {
        assert_eq!(
            CellContent::from_input("  42 ").unwrap(),
            CellContent::Text("  42 ".to_string())
        );
    }

    #[test]
    fn test_from_input_syntax_error() {
        let err = CellContent::from_input("=1+").unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let content = CellContent::from_input("= ( A1 + 2 ) * b3").unwrap();
        assert_eq!(content.text(), "=(A1+2)*B3");
        assert_eq!(
            content.referenced_cells(),
            vec![Position::new(0, 0), Position::new(2, 1)]
        );
    }

    #[test]
    fn test_escape_kept_in_text_stripped_from_value() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.content = CellContent::from_input("'=A1").unwrap();
        assert_eq!(cell.text(), "'=A1");
        assert_eq!(cell.literal_value(), Some(Value::Text("=A1".to_string())));
    }

    #[test]
    fn test_only_one_escape_is_stripped() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.content = CellContent::Text("''x".to_string());
        assert_eq!(cell.literal_value(), Some(Value::Text("'x".to_string())));
    }

    #[test]
    fn test_empty_cell_value_is_empty_text() {
        let cell = Cell::new_empty(Position::new(3, 3));
        assert_eq!(cell.literal_value(), Some(Value::Text(String::new())));
        assert!(!cell.needs_evaluation());
    }
}
