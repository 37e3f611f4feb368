//! On-demand, memoized evaluation of cell values.
//!
//! Reading a formula cell first brings every stale formula it depends on
//! up to date, dependencies before dependents, using an explicit stack.
//! Each formula is then evaluated once against already-memoized inputs.

use std::collections::HashSet;

use log::trace;
use sheetgraph_engine::engine::{FormulaError, Position, Value};

use super::Sheet;
use super::cell::{Cell, CellContent, CellId};
use super::state::ensure_valid;
use crate::error::Result;

impl Sheet {
    /// The computed value of the cell at `pos`.
    ///
    /// Absent and empty cells read as empty text. Formula results are
    /// memoized until something they depend on changes. Evaluation errors
    /// come back as [`Value::Error`], not as `Err`.
    pub fn value(&self, pos: Position) -> Result<Value> {
        ensure_valid(pos)?;
        Ok(match self.index.get(&pos) {
            Some(&id) => self.cell_value(id),
            None => Value::default(),
        })
    }

    pub(crate) fn cell_value(&self, id: CellId) -> Value {
        let Some(cell) = self.get(id) else {
            return Value::default();
        };
        if let Some(value) = cell.literal_value() {
            return value;
        }
        if let Some(value) = cell.memo() {
            return value;
        }
        self.refresh(id);
        cell.memo().unwrap_or(Value::Error(FormulaError::Unknown))
    }

    /// Evaluate `root` and every stale formula below it, in dependency order.
    fn refresh(&self, root: CellId) {
        let mut stack = vec![(root, false)];
        let mut expanded = HashSet::new();
        while let Some((id, ready)) = stack.pop() {
            let Some(cell) = self.get(id) else {
                continue;
            };
            if !cell.needs_evaluation() {
                continue;
            }
            if ready {
                self.evaluate(cell);
                continue;
            }
            if !expanded.insert(id) {
                continue;
            }
            stack.push((id, true));
            stack.extend(cell.depends_on.iter().map(|dep| (*dep, false)));
        }
    }

    fn evaluate(&self, cell: &Cell) {
        let CellContent::Formula(formula) = &cell.content else {
            return;
        };
        self.evaluations.set(self.evaluations.get() + 1);
        let value = Value::from(formula.evaluate(|pos| self.numeric_value(pos)));
        trace!("evaluated {} -> {:?}", cell.position, value);
        *cell.memo.borrow_mut() = Some(value);
    }

    /// A referenced cell's value as a formula operand.
    fn numeric_value(&self, pos: Position) -> std::result::Result<f64, FormulaError> {
        match self.index.get(&pos) {
            Some(&id) => self.cell_value(id).to_number(),
            None => Ok(0.0),
        }
    }
}
