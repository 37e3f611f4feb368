//! Sheet state and logic.

mod cell;
mod eval;
mod graph;
mod ops;
mod state;

pub use cell::{Cell, CellContent, CellId, ESCAPE_SIGN, FORMULA_SIGN};
pub use state::Sheet;
