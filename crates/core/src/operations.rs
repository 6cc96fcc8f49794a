use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field_value::FieldValue;
use crate::ids::{ColumnId, RecordId};

/// One element of a mutation batch. A batch commits against a single record
/// snapshot or is rejected as a whole; submission to the persistence layer
/// happens after the local apply and is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BulkOperation {
    /// Insert a new record under a caller-supplied pending id. Columns the
    /// data map omits are defaulted to null.
    Create {
        id: RecordId,
        data: BTreeMap<ColumnId, FieldValue>,
    },
    /// Shallow-merge the patch into the record's pending edits
    /// (per-column overwrite, not deep merge).
    Update {
        id: RecordId,
        patch: BTreeMap<ColumnId, FieldValue>,
    },
    /// Mark the record soft-deleted.
    Delete { id: RecordId },
    /// Clear a soft-delete marker.
    Undelete { id: RecordId },
}

impl BulkOperation {
    /// The record this operation targets.
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Create { id, .. }
            | Self::Update { id, .. }
            | Self::Delete { id }
            | Self::Undelete { id } => *id,
        }
    }

    /// String name of the operation type for error reporting.
    pub fn op_type_name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Undelete { .. } => "undelete",
        }
    }
}
