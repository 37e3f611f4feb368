//! Formula expression tree.
//!
//! An [`Expr`] can evaluate itself against a cell lookup, print itself back
//! as canonical source, and report the cells it reads.

use std::fmt;

use super::format::format_number;
use super::position::Position;
use super::value::FormulaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// A reference to another cell. May be out of range, in which case it
    /// evaluates to `#REF!`.
    Cell(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Evaluate the expression, resolving cell references through `lookup`.
    ///
    /// Out-of-range references fail with `#REF!` before `lookup` is called.
    /// Any non-finite intermediate result fails with `#DIV/0!`. The first
    /// error aborts the whole evaluation.
    pub fn evaluate<F>(&self, lookup: &mut F) -> Result<f64, FormulaError>
    where
        F: FnMut(Position) -> Result<f64, FormulaError>,
    {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Cell(pos) => {
                if !pos.is_valid() {
                    return Err(FormulaError::BadRef);
                }
                lookup(*pos)
            }
            Expr::Unary { op, operand } => {
                let value = operand.evaluate(lookup)?;
                Ok(match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Minus => -value,
                })
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(lookup)?;
                let rhs = rhs.evaluate(lookup)?;
                let result = op.apply(lhs, rhs);
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::DivByZero)
                }
            }
        }
    }

    /// Append every referenced position, in source order, to `out`.
    pub fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_cells(out);
                rhs.collect_cells(out);
            }
        }
    }
}

/// Canonical source form: no whitespace and only the parentheses needed to
/// parse back into the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                let sign = match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                };
                write!(f, "{}", sign)?;
                write_operand(f, operand, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                write_operand(f, lhs, lhs.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                // Operators are left-associative, so an equal-precedence
                // right operand only keeps its grouping with parentheses.
                write_operand(f, rhs, rhs.precedence() <= prec)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}
