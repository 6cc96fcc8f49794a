use std::collections::BTreeMap;

use snapgrid_core::{Record, RecordId, TableId};

use crate::error::EngineError;

/// Owns the in-memory record snapshot, one ordered collection per table.
/// Source order is preserved; the sort engine works on copies. All mutation
/// goes through wholesale `replace` (the unit of atomic installation) or a
/// targeted `record_mut`.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: BTreeMap<TableId, Vec<Record>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, table_id: TableId, records: Vec<Record>) {
        self.tables.insert(table_id, records);
    }

    /// Records for a table in source order. Unknown tables read as empty.
    pub fn records(&self, table_id: &TableId) -> &[Record] {
        self.tables.get(table_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn records_mut(&mut self, table_id: &TableId) -> Option<&mut Vec<Record>> {
        self.tables.get_mut(table_id)
    }

    pub fn record(&self, table_id: &TableId, record_id: RecordId) -> Option<&Record> {
        self.records(table_id).iter().find(|r| r.id == record_id)
    }

    pub fn record_mut(
        &mut self,
        table_id: &TableId,
        record_id: RecordId,
    ) -> Result<&mut Record, EngineError> {
        self.tables
            .get_mut(table_id)
            .ok_or_else(|| EngineError::TableNotFound(table_id.clone()))?
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(EngineError::RecordNotFound(record_id))
    }

    /// Install a new record collection for a table wholesale. Used both for
    /// optimistic local applies and for adopting the authoritative set the
    /// persistence layer returns.
    pub fn replace(&mut self, table_id: &TableId, records: Vec<Record>) {
        self.tables.insert(table_id.clone(), records);
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &TableId> {
        self.tables.keys()
    }
}
