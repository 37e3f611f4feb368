use std::collections::HashSet;

use log::{debug, warn};
use sheetgraph_engine::engine::Position;

use super::Sheet;
use super::cell::{CellContent, CellId};
use super::state::ensure_valid;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from user input.
    ///
    /// Empty input makes an empty cell, `=` followed by an expression makes
    /// a formula, anything else is text. Cells the formula references are
    /// created (empty) if they do not exist yet.
    ///
    /// Fails without changing the sheet if the position is out of range,
    /// the formula does not parse, or it would create a circular
    /// dependency.
    pub fn set_cell(&mut self, pos: Position, input: &str) -> Result<()> {
        ensure_valid(pos)?;
        let content = CellContent::from_input(input).map_err(|error| {
            warn!("rejected formula for {}: {}", pos, error);
            SheetError::FormulaSyntax {
                position: pos,
                error,
            }
        })?;

        // Cells listed by this call, so a rejected edit can be rolled back.
        let mut listed_now: Vec<CellId> = Vec::new();

        let (id, changed) = self.materialize(pos);
        if changed {
            listed_now.push(id);
        }

        let mut refs = HashSet::new();
        for referenced in content.referenced_cells() {
            let (ref_id, changed) = self.materialize(referenced);
            if changed {
                listed_now.push(ref_id);
            }
            refs.insert(ref_id);
        }

        if !self.can_adopt(id, &refs) {
            warn!("rejected {}{}: circular dependency", pos, describe(&content));
            // Roll back in reverse so the target cell is released last.
            for created in listed_now.into_iter().rev() {
                self.unmaterialize(created);
            }
            return Err(SheetError::CircularDependency(pos));
        }

        if let Some(cell) = self.get_mut(id) {
            cell.content = content;
        }
        self.rewire(id, refs);
        let invalidated = self.invalidate(id);
        debug!("set {}; invalidated {} cell(s)", pos, invalidated);
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// The cell stops being listed (it no longer appears in
    /// [`Sheet::cell`] or the printable area). Formulas that read it keep
    /// working and see it as empty, i.e. `0`.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        ensure_valid(pos)?;
        let Some(&id) = self.index.get(&pos) else {
            return Ok(());
        };

        if let Some(cell) = self.get_mut(id) {
            cell.content = CellContent::Empty;
            cell.listed = false;
        }
        self.rewire(id, HashSet::new());
        let invalidated = self.invalidate(id);
        self.release_if_unused(id);
        debug!("cleared {}; invalidated {} cell(s)", pos, invalidated);
        Ok(())
    }
}

fn describe(content: &CellContent) -> String {
    match content {
        CellContent::Formula(_) => format!(" = {}", content.text()),
        _ => String::new(),
    }
}
