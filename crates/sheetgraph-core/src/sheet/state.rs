use std::collections::HashMap;

use sheetgraph_engine::engine::{Position, Size};

use super::cell::{Cell, CellId};
use crate::error::{Result, SheetError};

struct Slot {
    generation: u32,
    cell: Option<Cell>,
}

/// A sparse grid of cells with a dependency graph between them.
///
/// The sheet owns every cell in a slot arena. Cells refer to each other
/// only by [`CellId`], never by ownership.
///
/// `Sheet` is single-threaded: memoized values live in `RefCell`s so reads
/// can fill them in. Callers that need to share a sheet across threads must
/// wrap the whole sheet in one lock.
pub struct Sheet {
    slots: Vec<Slot>,
    free: Vec<usize>,
    /// Every live slot, listed or not.
    pub(crate) index: HashMap<Position, CellId>,
    /// Number of formula evaluations performed so far.
    pub(crate) evaluations: std::cell::Cell<u64>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Sheet {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            evaluations: std::cell::Cell::new(0),
        }
    }

    /// The cell at `pos`, or `None` if nothing was written or referenced
    /// there (or it has since been cleared).
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        ensure_valid(pos)?;
        Ok(self.cell_at(pos).filter(|cell| cell.listed))
    }

    /// Text of the cell at `pos` as entered; empty if absent.
    pub fn text(&self, pos: Position) -> Result<String> {
        Ok(self.cell(pos)?.map(Cell::text).unwrap_or_default())
    }

    /// In-range positions the formula at `pos` reads.
    pub fn referenced_cells(&self, pos: Position) -> Result<Vec<Position>> {
        Ok(self
            .cell(pos)?
            .map(Cell::referenced_cells)
            .unwrap_or_default())
    }

    /// Positions of the cells whose formulas read `pos` directly, sorted.
    pub fn dependents(&self, pos: Position) -> Result<Vec<Position>> {
        ensure_valid(pos)?;
        let Some(cell) = self.cell_at(pos) else {
            return Ok(Vec::new());
        };
        let mut positions: Vec<Position> = cell
            .referenced_by
            .iter()
            .filter_map(|id| self.get(*id).map(Cell::position))
            .collect();
        positions.sort();
        Ok(positions)
    }

    /// Tight bounding box of all listed cells, `(0, 0)` if there are none.
    pub fn printable_size(&self) -> Size {
        self.cells().fold(Size::default(), |size, cell| {
            Size::new(
                size.rows.max(cell.position.row + 1),
                size.cols.max(cell.position.col + 1),
            )
        })
    }

    /// Listed cells, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots
            .iter()
            .filter_map(|slot| slot.cell.as_ref())
            .filter(|cell| cell.listed)
    }

    /// Number of formula evaluations performed by this sheet so far.
    /// Reads served from a memo do not count.
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.get()
    }

    pub(crate) fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.index.get(&pos).and_then(|id| self.get(*id))
    }

    pub(crate) fn get(&self, id: CellId) -> Option<&Cell> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.cell.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.cell.as_mut())
    }

    /// Return the id of the cell at `pos`, creating an empty cell if needed.
    /// Also re-lists a cell that was cleared while still referenced.
    ///
    /// The flag is true when the call changed what is listed, so a failed
    /// mutation can undo it with [`Sheet::unmaterialize`].
    pub(crate) fn materialize(&mut self, pos: Position) -> (CellId, bool) {
        if let Some(&id) = self.index.get(&pos)
            && let Some(cell) = self.get_mut(id)
        {
            let relisted = !cell.listed;
            cell.listed = true;
            return (id, relisted);
        }
        let id = self.alloc(Cell::new_empty(pos));
        self.index.insert(pos, id);
        (id, true)
    }

    /// Undo a [`Sheet::materialize`] that reported a change.
    pub(crate) fn unmaterialize(&mut self, id: CellId) {
        if let Some(cell) = self.get_mut(id) {
            cell.listed = false;
        }
        self.release_if_unused(id);
    }

    /// Free the slot of an unlisted cell that nothing references any more.
    pub(crate) fn release_if_unused(&mut self, id: CellId) {
        let unused = self
            .get(id)
            .is_some_and(|cell| !cell.listed && cell.referenced_by.is_empty());
        if !unused {
            return;
        }
        let slot = &mut self.slots[id.idx()];
        if let Some(cell) = slot.cell.take() {
            self.index.remove(&cell.position);
            self.free.push(id.0);
        }
    }

    fn alloc(&mut self, cell: Cell) -> CellId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.cell = Some(cell);
            return CellId::new(idx, slot.generation);
        }
        let idx = self.slots.len();
        self.slots.push(Slot {
            generation: 1,
            cell: Some(cell),
        });
        CellId::new(idx, 1)
    }

    /// Number of occupied slots, listed or not.
    #[cfg(test)]
    pub(crate) fn live_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.cell.is_some()).count()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn ensure_valid(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
