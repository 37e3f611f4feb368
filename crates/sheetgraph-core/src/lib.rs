//! sheetgraph-core - Sheet model over the formula engine.
//!
//! A [`Sheet`] owns a sparse set of cells, keeps the dependency graph
//! between them acyclic, and evaluates formulas lazily with memoization.

pub mod error;
pub mod print;
pub mod sheet;

pub use error::{Result, SheetError};
pub use print::{print_texts, print_values};
pub use sheet::{Cell, CellContent, CellId, Sheet};

pub use sheetgraph_engine::engine::{FormulaError, Position, Size, Value};
