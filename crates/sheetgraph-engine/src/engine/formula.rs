//! Parsed formulas.
//!
//! [`Formula`] is the whole contract the sheet relies on: evaluate against a
//! cell lookup, print back canonical text, and list referenced cells.

use super::ast::Expr;
use super::parser::{ParseResult, parse_expression};
use super::position::Position;
use super::value::FormulaError;

/// A parsed arithmetic formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse formula text, without the leading `=`.
    pub fn parse(expression: &str) -> ParseResult<Formula> {
        Ok(Formula {
            expr: parse_expression(expression)?,
        })
    }

    /// Evaluate the formula. `lookup` supplies the numeric value of each
    /// referenced in-range cell, or the error that cell raises.
    pub fn evaluate<F>(&self, mut lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(Position) -> Result<f64, FormulaError>,
    {
        self.expr.evaluate(&mut lookup)
    }

    /// Canonical source text, without the leading `=`.
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// In-range cells the formula reads, sorted and without duplicates.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.expr.collect_cells(&mut cells);
        cells.retain(Position::is_valid);
        cells.sort();
        cells.dedup();
        cells
    }
}
