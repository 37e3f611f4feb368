//! Formula engine API.
//!
//! This module provides everything a sheet needs to work with formulas:
//!
//! - [`Position`], [`Size`] - Cell coordinates and A1 notation
//! - [`Value`], [`FormulaError`] - Computed cell values and in-cell errors
//! - [`Formula`] - Parsed arithmetic formulas (evaluate, print, list references)
//! - [`ParseError`] - Why formula text was rejected
//! - [`format_number`] - Number display

mod ast;
mod format;
mod formula;
mod lexer;
mod parser;
mod position;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use format::format_number;
pub use formula::Formula;
pub use parser::{MAX_DEPTH, ParseError, ParseResult};
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{FormulaError, Value};
