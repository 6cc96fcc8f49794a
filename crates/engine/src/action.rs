use snapgrid_core::{ColumnId, RecordId, TableId};

use crate::focus::{FocusSet, FocusedCell, ToggleOutcome};
use crate::suggest::{CellRef, ReconcileOutcome};

/// Closed set of grid gestures. Each variant carries a typed payload and is
/// routed to its handler by `Workbook::dispatch`. Menu items map to
/// variants, never to display strings.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    AcceptSuggestions { table: TableId, items: Vec<CellRef> },
    RejectSuggestions { table: TableId, items: Vec<CellRef> },
    AcceptAllSuggestions { table: TableId },
    RejectAllSuggestions { table: TableId },
    DeleteRecords { table: TableId, ids: Vec<RecordId> },
    UndeleteRecords { table: TableId, ids: Vec<RecordId> },
    ToggleColumnHidden { table: TableId, column: ColumnId },
    ToggleColumnProtected { table: TableId, column: ColumnId },
    ToggleFocus { set: FocusSet, cells: Vec<FocusedCell> },
    ClearFocus { set: FocusSet },
}

/// What a dispatched action produced, for UI feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Suggestion accept/reject counts.
    Reconciled(ReconcileOutcome),
    /// A bulk batch was applied and submitted.
    Applied,
    /// A view flag was toggled; carries the new effective value.
    ViewToggled(bool),
    /// Focus toggle counts.
    FocusToggled(ToggleOutcome),
    /// A focus set was cleared.
    FocusCleared,
}
