use std::collections::BTreeSet;

use snapgrid_core::{BulkOperation, FieldValue, Record, RecordId, Table};

use crate::error::ValidationError;

/// Apply a batch of operations against one record snapshot, returning the
/// new collection. Two-phase: the whole batch is validated before any
/// mutation, so a failing op leaves the input untouched and nothing partial
/// is ever observable. Ops apply in array order. No I/O happens here;
/// submitting the batch to persistence is the caller's job.
pub fn apply(
    table: &Table,
    records: &[Record],
    ops: &[BulkOperation],
) -> Result<Vec<Record>, ValidationError> {
    validate(records, ops)?;

    let mut next: Vec<Record> = records.to_vec();
    for op in ops {
        match op {
            BulkOperation::Create { id, data } => {
                let mut fields = data.clone();
                // Every table column absent from the payload defaults to null
                for column in &table.columns {
                    fields
                        .entry(column.id.clone())
                        .or_insert(FieldValue::Null);
                }
                let mut record = Record::new(*id, fields);
                record.edits.created = true;
                next.push(record);
            }
            BulkOperation::Update { id, patch } => {
                let record = existing_mut(&mut next, *id);
                // Shallow merge: per-column overwrite, not deep merge
                for (column, value) in patch {
                    record.edits.values.insert(column.clone(), value.clone());
                }
            }
            BulkOperation::Delete { id } => {
                existing_mut(&mut next, *id).edits.deleted = true;
            }
            BulkOperation::Undelete { id } => {
                existing_mut(&mut next, *id).edits.deleted = false;
            }
        }
    }
    Ok(next)
}

/// Check every op against the snapshot plus ids created earlier in the same
/// batch. Update/delete/undelete require an existing target; create requires
/// a fresh pending id.
fn validate(records: &[Record], ops: &[BulkOperation]) -> Result<(), ValidationError> {
    let mut known: BTreeSet<RecordId> = records.iter().map(|r| r.id).collect();

    for op in ops {
        let id = op.record_id();
        match op {
            BulkOperation::Create { .. } => {
                if !known.insert(id) {
                    return Err(ValidationError::DuplicateRecordId { id });
                }
            }
            _ => {
                if !known.contains(&id) {
                    return Err(ValidationError::UnknownRecord {
                        op: op.op_type_name(),
                        id,
                    });
                }
            }
        }
    }
    Ok(())
}

// Validation guarantees the target exists; a missed lookup here is a bug in
// `validate`, not caller error.
fn existing_mut(records: &mut [Record], id: RecordId) -> &mut Record {
    records
        .iter_mut()
        .find(|r| r.id == id)
        .unwrap_or_else(|| unreachable!("validated op targets missing record {id}"))
}
