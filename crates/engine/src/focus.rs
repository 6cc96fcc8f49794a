use serde::{Deserialize, Serialize};

use snapgrid_core::{ColumnId, RecordId};

/// A cell marked as context for the AI agent. The same cell may sit in the
/// read set and the write set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedCell {
    pub record_id: RecordId,
    pub column_id: ColumnId,
}

impl FocusedCell {
    pub fn new(record_id: RecordId, column_id: impl Into<ColumnId>) -> Self {
        Self {
            record_id,
            column_id: column_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSet {
    Read,
    Write,
}

impl FocusSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Result of a toggle over a selection: how many cells entered and left the
/// set, so a single keystroke can report mixed feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub added: usize,
    pub removed: usize,
}

/// Read/write focus sets with uniqueness by (record, column). Entries have
/// no persistence of their own; they live and die with user or agent action.
#[derive(Debug, Default)]
pub struct FocusTracker {
    read: Vec<FocusedCell>,
    write: Vec<FocusedCell>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self, set: FocusSet) -> &[FocusedCell] {
        match set {
            FocusSet::Read => &self.read,
            FocusSet::Write => &self.write,
        }
    }

    pub fn contains(&self, set: FocusSet, cell: &FocusedCell) -> bool {
        self.cells(set).contains(cell)
    }

    /// Add cells, skipping any already present. Idempotent.
    pub fn add(&mut self, set: FocusSet, cells: &[FocusedCell]) {
        let target = self.set_mut(set);
        for cell in cells {
            if !target.contains(cell) {
                target.push(cell.clone());
            }
        }
    }

    /// Remove matching cells; absent cells are ignored.
    pub fn remove(&mut self, set: FocusSet, cells: &[FocusedCell]) {
        let target = self.set_mut(set);
        target.retain(|existing| !cells.contains(existing));
    }

    pub fn clear(&mut self, set: FocusSet) {
        self.set_mut(set).clear();
    }

    pub fn clear_all(&mut self) {
        self.read.clear();
        self.write.clear();
    }

    /// Toggle each cell of a selection independently: present cells leave,
    /// absent cells enter, both applied as one update.
    pub fn toggle(&mut self, set: FocusSet, cells: &[FocusedCell]) -> ToggleOutcome {
        let target = self.set_mut(set);

        let mut to_add: Vec<FocusedCell> = Vec::new();
        let mut to_remove: Vec<FocusedCell> = Vec::new();
        for cell in cells {
            if target.contains(cell) {
                if !to_remove.contains(cell) {
                    to_remove.push(cell.clone());
                }
            } else if !to_add.contains(cell) {
                to_add.push(cell.clone());
            }
        }

        target.retain(|existing| !to_remove.contains(existing));
        target.extend(to_add.iter().cloned());

        ToggleOutcome {
            added: to_add.len(),
            removed: to_remove.len(),
        }
    }

    fn set_mut(&mut self, set: FocusSet) -> &mut Vec<FocusedCell> {
        match set {
            FocusSet::Read => &mut self.read,
            FocusSet::Write => &mut self.write,
        }
    }
}
