use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{ColumnId, SnapshotId, TableId, ViewId};

/// Explicit per-column override. `None` means "inherit the default", never
/// "the opposite of the other flag": unset is a first-class state, so the
/// persisted config records exactly which property was changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOverride {
    #[serde(rename = "wsId")]
    pub column_id: ColumnId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
}

impl ColumnOverride {
    pub fn new(column_id: impl Into<ColumnId>) -> Self {
        Self {
            column_id: column_id.into(),
            hidden: None,
            protected: None,
        }
    }

    /// An override with no explicit flags carries no information and is
    /// dropped from the persisted config.
    pub fn is_empty(&self) -> bool {
        self.hidden.is_none() && self.protected.is_none()
    }
}

/// Per-table override bundle. Table-level `visible`/`editable` and
/// column-level `hidden`/`protected` are independent; column flags do not
/// inherit from table flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnOverride>,
}

impl TableOverride {
    pub fn column(&self, column_id: &ColumnId) -> Option<&ColumnOverride> {
        self.columns.iter().find(|c| &c.column_id == column_id)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_none() && self.editable.is_none() && self.columns.is_empty()
    }
}

/// A named, reusable bundle of visibility/protection overrides for one
/// snapshot. Persisted shape:
/// `{ id, name?, parentId?, snapshotId, config: { [tableId]: { visible?,
/// editable?, columns?: [{ wsId, hidden?, protected? }] } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ViewId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ViewId>,
    pub snapshot_id: SnapshotId,
    #[serde(default)]
    pub config: BTreeMap<TableId, TableOverride>,
}

impl View {
    pub fn new(snapshot_id: SnapshotId) -> Self {
        Self {
            id: ViewId::new(),
            name: None,
            parent_id: None,
            snapshot_id,
            config: BTreeMap::new(),
        }
    }

    pub fn named(snapshot_id: SnapshotId, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(snapshot_id)
        }
    }

    pub fn table(&self, table_id: &TableId) -> Option<&TableOverride> {
        self.config.get(table_id)
    }
}
