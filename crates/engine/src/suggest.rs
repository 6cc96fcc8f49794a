use serde::{Deserialize, Serialize};

use snapgrid_core::{ColumnId, Record, RecordId};

/// Addresses one pending suggestion. `column_id: None` targets the
/// record-level delete proposal rather than a cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub record_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
}

impl CellRef {
    pub fn cell(record_id: RecordId, column_id: impl Into<ColumnId>) -> Self {
        Self {
            record_id,
            column_id: Some(column_id.into()),
        }
    }

    pub fn record(record_id: RecordId) -> Self {
        Self {
            record_id,
            column_id: None,
        }
    }
}

/// Counts reported back to the UI. A zero-count outcome is informational,
/// never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub records_affected: usize,
    pub changes_affected: usize,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.records_affected == 0 && self.changes_affected == 0
    }
}

/// Accept suggestions cell by cell. An accepted value becomes the new base
/// truth and discards both the suggestion and any pending local edit on the
/// same cell (the suggestion wins over the edit). Accepting a delete
/// proposal confirms it and clears the marker; physically removing the
/// record is the caller's responsibility. Items with no pending suggestion
/// are skipped and not counted.
pub fn accept_cells(records: &mut [Record], items: &[CellRef]) -> ReconcileOutcome {
    reconcile(records, items, Decision::Accept)
}

/// Reject suggestions cell by cell: the suggestion entry or delete marker is
/// dropped, base fields and pending edits stay untouched. Rejecting an
/// already-cleared suggestion is a no-op that reports zero.
pub fn reject_cells(records: &mut [Record], items: &[CellRef]) -> ReconcileOutcome {
    reconcile(records, items, Decision::Reject)
}

/// Expand to every pending suggestion across the table, then accept each
/// with the per-cell semantics. No suggestions means zero counts.
pub fn accept_all(records: &mut [Record]) -> ReconcileOutcome {
    let items = expand_all(records);
    accept_cells(records, &items)
}

/// Expand to every pending suggestion across the table, then reject each.
pub fn reject_all(records: &mut [Record]) -> ReconcileOutcome {
    let items = expand_all(records);
    reject_cells(records, &items)
}

#[derive(Clone, Copy)]
enum Decision {
    Accept,
    Reject,
}

fn reconcile(records: &mut [Record], items: &[CellRef], decision: Decision) -> ReconcileOutcome {
    let mut changes = 0usize;
    let mut touched: Vec<RecordId> = Vec::new();

    for item in items {
        let Some(record) = records.iter_mut().find(|r| r.id == item.record_id) else {
            continue;
        };

        let changed = match (&item.column_id, decision) {
            (Some(column), Decision::Accept) => {
                match record.suggestions.values.remove(column) {
                    Some(value) => {
                        record.fields.insert(column.clone(), value);
                        // Accepted suggestion wins over a pending edit here
                        record.edits.values.remove(column);
                        true
                    }
                    None => false,
                }
            }
            (Some(column), Decision::Reject) => record.suggestions.values.remove(column).is_some(),
            (None, _) => {
                let had = record.suggestions.delete_proposed;
                record.suggestions.delete_proposed = false;
                had
            }
        };

        if changed {
            changes += 1;
            if !touched.contains(&record.id) {
                touched.push(record.id);
            }
        }
    }

    ReconcileOutcome {
        records_affected: touched.len(),
        changes_affected: changes,
    }
}

pub(crate) fn expand_all(records: &[Record]) -> Vec<CellRef> {
    let mut items = Vec::new();
    for record in records {
        for column in record.suggestions.values.keys() {
            items.push(CellRef::cell(record.id, column.clone()));
        }
        if record.suggestions.delete_proposed {
            items.push(CellRef::record(record.id));
        }
    }
    items
}
