use snapgrid_core::{Column, FieldValue, Record, TableId, View};

use crate::views;

/// Resolved state of one (record, column) cell. Exactly one state applies;
/// precedence is top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Soft-deleted locally; reversible via undelete.
    Deleted,
    /// Created locally, not yet persisted.
    Created,
    /// The agent proposes removing the whole record.
    SuggestedDeleted,
    /// The agent proposes a replacement value for this cell.
    SuggestedValue,
    /// A local pending edit exists for this cell.
    Edited,
    Clean,
}

impl CellState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Created => "created",
            Self::SuggestedDeleted => "suggested-deleted",
            Self::SuggestedValue => "suggested-value",
            Self::Edited => "edited",
            Self::Clean => "clean",
        }
    }
}

/// What the grid paints for a cell. `struck` means the current value renders
/// with strikethrough; `suggested` carries the proposed replacement when one
/// exists (suggested-deleted strikes without a replacement).
#[derive(Debug, Clone, PartialEq)]
pub struct CellDisplay {
    pub current: FieldValue,
    pub suggested: Option<FieldValue>,
    pub struck: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCell {
    pub display: CellDisplay,
    /// What the edit box edits: pending edit if present, else base value.
    /// Suggestions never feed the edit box directly.
    pub editable_value: FieldValue,
    pub state: CellState,
    pub readonly: bool,
}

/// Merge a record's mutation layers into one display/editability decision
/// for a single column. Pure; the only context consulted besides the record
/// is the column definition and the active view's protection override.
pub fn resolve_cell(
    record: &Record,
    column: &Column,
    table_id: &TableId,
    view: Option<&View>,
) -> ResolvedCell {
    let state = cell_state(record, column);

    let current = record.editable_value(&column.id).clone();
    let display = match state {
        CellState::SuggestedDeleted => CellDisplay {
            current,
            suggested: None,
            struck: true,
        },
        CellState::SuggestedValue => CellDisplay {
            current,
            suggested: record.suggested_value(&column.id).cloned(),
            struck: true,
        },
        _ => CellDisplay {
            current,
            suggested: None,
            struck: false,
        },
    };

    let readonly = column.readonly
        || column.id.is_id_column()
        || views::is_column_protected(view, table_id, &column.id);

    ResolvedCell {
        display,
        editable_value: record.editable_value(&column.id).clone(),
        state,
        readonly,
    }
}

fn cell_state(record: &Record, column: &Column) -> CellState {
    if record.edits.deleted {
        CellState::Deleted
    } else if record.edits.created {
        CellState::Created
    } else if record.suggestions.delete_proposed {
        CellState::SuggestedDeleted
    } else if record.suggested_value(&column.id).is_some() {
        CellState::SuggestedValue
    } else if record.has_pending_edit(&column.id) {
        CellState::Edited
    } else {
        CellState::Clean
    }
}
