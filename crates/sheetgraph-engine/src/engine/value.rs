//! Cell values and formula errors.
//!
//! A [`Value`] is what a cell reads as: a number, a piece of text, or a
//! [`FormulaError`]. Errors are ordinary values here. They are stored in
//! memos, printed as `#REF!`-style tokens, and re-raised when another
//! formula consumes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::format::format_number;

/// Error produced while evaluating a formula.
#[derive(Error, Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum FormulaError {
    #[error("#DIV/0!")]
    DivByZero,
    #[error("#VALUE!")]
    BadValue,
    #[error("#REF!")]
    BadRef,
    #[error("")]
    Unknown,
}

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Value {
    /// Coerce this value to a number for use as a formula operand.
    ///
    /// - numbers pass through
    /// - empty text counts as `0`
    /// - other text must parse completely (after trimming) as a finite number,
    ///   otherwise `#VALUE!`
    /// - errors are re-raised unchanged
    pub fn to_number(&self) -> Result<f64, FormulaError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    _ => Err(FormulaError::BadValue),
                }
            }
            Value::Error(e) => Err(*e),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<FormulaError> for Value {
    fn from(e: FormulaError) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, FormulaError>> for Value {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}
