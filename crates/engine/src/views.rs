use snapgrid_core::{ColumnId, ColumnOverride, TableId, View};

/// `Some(false)` is the only thing that hides a table; absence and
/// `Some(true)` both read as visible.
pub fn is_table_visible(view: Option<&View>, table_id: &TableId) -> bool {
    table_flag(view, table_id, |t| t.visible)
}

pub fn is_table_editable(view: Option<&View>, table_id: &TableId) -> bool {
    table_flag(view, table_id, |t| t.editable)
}

fn table_flag(
    view: Option<&View>,
    table_id: &TableId,
    pick: impl Fn(&snapgrid_core::TableOverride) -> Option<bool>,
) -> bool {
    view.and_then(|v| v.table(table_id))
        .and_then(pick)
        .unwrap_or(true)
}

/// The explicit column override if one was set, else false. Column flags do
/// not inherit from the table's visible/editable flags; the two levels are
/// independent so the config records exactly which property was changed.
pub fn is_column_hidden(view: Option<&View>, table_id: &TableId, column_id: &ColumnId) -> bool {
    column_flag(view, table_id, column_id, |c| c.hidden)
}

pub fn is_column_protected(view: Option<&View>, table_id: &TableId, column_id: &ColumnId) -> bool {
    column_flag(view, table_id, column_id, |c| c.protected)
}

fn column_flag(
    view: Option<&View>,
    table_id: &TableId,
    column_id: &ColumnId,
    pick: impl Fn(&ColumnOverride) -> Option<bool>,
) -> bool {
    view.and_then(|v| v.table(table_id))
        .and_then(|t| t.column(column_id))
        .and_then(pick)
        .unwrap_or(false)
}

/// One flag's worth of change in an upsert. `Unset` returns the flag to
/// "inherit"; omitting the flag from the patch leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridePatch {
    Set(bool),
    Unset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub hidden: Option<OverridePatch>,
    pub protected: Option<OverridePatch>,
}

impl ColumnPatch {
    pub fn hide(value: bool) -> Self {
        Self {
            hidden: Some(OverridePatch::Set(value)),
            ..Self::default()
        }
    }

    pub fn protect(value: bool) -> Self {
        Self {
            protected: Some(OverridePatch::Set(value)),
            ..Self::default()
        }
    }

    pub fn unset_hidden() -> Self {
        Self {
            hidden: Some(OverridePatch::Unset),
            ..Self::default()
        }
    }

    pub fn unset_protected() -> Self {
        Self {
            protected: Some(OverridePatch::Unset),
            ..Self::default()
        }
    }
}

/// Merge a patch into the view's column entry, creating the table and column
/// entries on demand. Entries that end up with no explicit flags are removed
/// outright, keeping the persisted config minimal; unsetting a flag that was
/// never set is therefore a no-op and the whole operation is idempotent.
pub fn upsert_column_override(
    view: &mut View,
    table_id: &TableId,
    column_id: &ColumnId,
    patch: ColumnPatch,
) {
    let table = view.config.entry(table_id.clone()).or_default();

    let position = table
        .columns
        .iter()
        .position(|c| &c.column_id == column_id);
    let mut entry = match position {
        Some(i) => table.columns[i].clone(),
        None => ColumnOverride::new(column_id.clone()),
    };

    match patch.hidden {
        Some(OverridePatch::Set(v)) => entry.hidden = Some(v),
        Some(OverridePatch::Unset) => entry.hidden = None,
        None => {}
    }
    match patch.protected {
        Some(OverridePatch::Set(v)) => entry.protected = Some(v),
        Some(OverridePatch::Unset) => entry.protected = None,
        None => {}
    }

    match (position, entry.is_empty()) {
        (Some(i), true) => {
            table.columns.remove(i);
        }
        (Some(i), false) => table.columns[i] = entry,
        (None, true) => {}
        (None, false) => table.columns.push(entry),
    }

    if view.config.get(table_id).is_some_and(|t| t.is_empty()) {
        view.config.remove(table_id);
    }
}

/// Flip the effective hidden flag to its explicit opposite. Returns the new
/// effective value.
pub fn toggle_column_hidden(view: &mut View, table_id: &TableId, column_id: &ColumnId) -> bool {
    let next = !is_column_hidden(Some(view), table_id, column_id);
    upsert_column_override(view, table_id, column_id, ColumnPatch::hide(next));
    next
}

pub fn toggle_column_protected(view: &mut View, table_id: &TableId, column_id: &ColumnId) -> bool {
    let next = !is_column_protected(Some(view), table_id, column_id);
    upsert_column_override(view, table_id, column_id, ColumnPatch::protect(next));
    next
}
