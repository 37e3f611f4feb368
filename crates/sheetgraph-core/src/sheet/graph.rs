//! Dependency graph maintenance.
//!
//! Edges live on the cells themselves (`depends_on` / `referenced_by`).
//! This module keeps both directions consistent, rejects edits that would
//! close a cycle, and discards memoized values downstream of a change.
//!
//! All walks use an explicit stack and a visited set, so deep dependency
//! chains cannot overflow the call stack.

use std::collections::HashSet;

use super::Sheet;
use super::cell::CellId;

impl Sheet {
    /// Whether `cell` can take on content that reads `candidate_refs`
    /// without creating a cycle.
    ///
    /// Walks from `cell` along `referenced_by` edges, i.e. through every
    /// cell that already depends on it. Reaching one of the candidate
    /// references means the new edges would close a loop (this includes
    /// `cell` reading itself).
    pub(crate) fn can_adopt(&self, cell: CellId, candidate_refs: &HashSet<CellId>) -> bool {
        if candidate_refs.is_empty() {
            return true;
        }

        let mut stack = vec![cell];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if candidate_refs.contains(&current) {
                return false;
            }
            if let Some(entry) = self.get(current) {
                stack.extend(entry.referenced_by.iter().copied());
            }
        }
        true
    }

    /// Replace the outgoing edges of `cell` with `new_refs` and update the
    /// reverse index on both the old and new targets.
    ///
    /// Old targets that were cleared and are no longer referenced by anyone
    /// are released.
    pub(crate) fn rewire(&mut self, cell: CellId, new_refs: HashSet<CellId>) {
        let Some(entry) = self.get_mut(cell) else {
            return;
        };
        let old_refs = std::mem::replace(&mut entry.depends_on, new_refs.clone());

        for old in old_refs.difference(&new_refs) {
            if let Some(target) = self.get_mut(*old) {
                target.referenced_by.remove(&cell);
            }
            self.release_if_unused(*old);
        }
        for new in new_refs.difference(&old_refs) {
            if let Some(target) = self.get_mut(*new) {
                target.referenced_by.insert(cell);
            }
        }
    }

    /// Discard the memo of `cell` and of every cell that transitively reads
    /// it. Nothing is recomputed here. Returns the number of cells visited.
    pub(crate) fn invalidate(&mut self, cell: CellId) -> usize {
        let mut stack = vec![cell];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(entry) = self.get_mut(current) {
                entry.memo.get_mut().take();
                stack.extend(entry.referenced_by.iter().copied());
            }
        }
        visited.len()
    }
}
