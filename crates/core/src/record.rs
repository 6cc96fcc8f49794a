use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field_value::FieldValue;
use crate::ids::{ColumnId, RecordId};

/// Pending local mutations layered over a record's base fields.
/// `created` and `deleted` are lifecycle markers: a soft delete never
/// physically removes the record and is reversible via undelete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOverlay {
    pub values: BTreeMap<ColumnId, FieldValue>,
    pub created: bool,
    pub deleted: bool,
}

impl EditOverlay {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.created && !self.deleted
    }
}

/// Unconfirmed values proposed by the AI agent. `delete_proposed` means the
/// agent suggests removing the whole record; the record stays in place until
/// the user accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionOverlay {
    pub values: BTreeMap<ColumnId, FieldValue>,
    pub delete_proposed: bool,
}

impl SuggestionOverlay {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.delete_proposed
    }
}

/// One row of a snapshot table: base truth plus the mutation layers the
/// resolver merges into a per-cell display decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Id assigned by the source system once persistence succeeds.
    pub remote_id: Option<String>,
    /// Last-known base truth per column.
    pub fields: BTreeMap<ColumnId, FieldValue>,
    pub edits: EditOverlay,
    pub suggestions: SuggestionOverlay,
    /// Set by the server-side exclusion filter; filtered records sort last.
    pub filtered: bool,
}

impl Record {
    pub fn new(id: RecordId, fields: BTreeMap<ColumnId, FieldValue>) -> Self {
        Self {
            id,
            remote_id: None,
            fields,
            edits: EditOverlay::default(),
            suggestions: SuggestionOverlay::default(),
            filtered: false,
        }
    }

    /// The value the edit box shows: pending edit if present, else base.
    /// Suggestions never feed the edit box directly.
    pub fn editable_value(&self, column: &ColumnId) -> &FieldValue {
        self.edits
            .values
            .get(column)
            .or_else(|| self.fields.get(column))
            .unwrap_or(&FieldValue::Null)
    }

    pub fn base_value(&self, column: &ColumnId) -> &FieldValue {
        self.fields.get(column).unwrap_or(&FieldValue::Null)
    }

    pub fn suggested_value(&self, column: &ColumnId) -> Option<&FieldValue> {
        self.suggestions.values.get(column)
    }

    pub fn has_pending_edit(&self, column: &ColumnId) -> bool {
        self.edits.values.contains_key(column)
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}
