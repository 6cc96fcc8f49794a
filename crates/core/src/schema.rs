use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::{ColumnId, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    TextList,
    Numeric,
    NumericList,
    Boolean,
    BooleanList,
    Jsonb,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextList => "text[]",
            Self::Numeric => "numeric",
            Self::NumericList => "numeric[]",
            Self::Boolean => "boolean",
            Self::BooleanList => "boolean[]",
            Self::Jsonb => "jsonb",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "text" => Ok(Self::Text),
            "text[]" => Ok(Self::TextList),
            "numeric" => Ok(Self::Numeric),
            "numeric[]" => Ok(Self::NumericList),
            "boolean" => Ok(Self::Boolean),
            "boolean[]" => Ok(Self::BooleanList),
            "jsonb" => Ok(Self::Jsonb),
            _ => Err(CoreError::InvalidData(format!("unknown column type: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub column_type: ColumnType,
    pub readonly: bool,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type,
            readonly: false,
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// A connector table: id plus an ordered column sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(id: impl Into<TableId>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            columns,
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }
}
