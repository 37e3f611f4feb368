//! Error types for sheet mutations and lookups.

use sheetgraph_engine::engine::{ParseError, Position};
use thiserror::Error;

/// Errors returned by [`Sheet`](crate::Sheet) operations.
///
/// Every error leaves the sheet exactly as it was before the call.
/// Evaluation problems such as `#DIV/0!` are not errors here; they are
/// ordinary cell values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),

    #[error("Formula syntax error in {position}: {error}")]
    FormulaSyntax { position: Position, error: ParseError },
}

pub type Result<T> = std::result::Result<T, SheetError>;
