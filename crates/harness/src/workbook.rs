use std::collections::BTreeMap;

use snapgrid_core::{
    BulkOperation, Column, ColumnType, FieldValue, Record, RecordId, SnapshotId, Table, TableId,
};
use snapgrid_engine::{EngineError, Persistence, Workbook};

use crate::persistence::MemoryPersistence;

/// A workbook wired to the in-memory fake server, with a standard "contacts"
/// table. Keeps a handle on the fake so tests can assert on what was
/// submitted after the workbook takes ownership of the box.
pub struct TestWorkbook {
    pub workbook: Workbook,
    pub persistence: MemoryPersistence,
    pub table_id: TableId,
}

impl TestWorkbook {
    pub fn new() -> Self {
        Self::with_persistence(MemoryPersistence::new())
    }

    /// Build against any persistence impl; the MemoryPersistence handle is
    /// still returned for seeding, but only wired in when `persistence` is
    /// the memory fake itself.
    pub fn with_persistence(persistence: MemoryPersistence) -> Self {
        let table = contacts_table();
        let table_id = table.id.clone();
        persistence.register_table(table.clone(), Vec::new());

        let mut workbook = Workbook::new(SnapshotId::new(), Box::new(persistence.clone()));
        workbook.add_table(table, Vec::new());

        Self {
            workbook,
            persistence,
            table_id,
        }
    }

    /// A workbook whose persistence always fails, for optimistic-failure
    /// tests. Seeded records are installed locally only.
    pub fn failing(persistence: impl Persistence + 'static) -> Self {
        let table = contacts_table();
        let table_id = table.id.clone();
        let mut workbook = Workbook::new(SnapshotId::new(), Box::new(persistence));
        workbook.add_table(table, Vec::new());

        Self {
            workbook,
            persistence: MemoryPersistence::new(),
            table_id,
        }
    }

    /// Install a clean record, as if it arrived with the connector import.
    /// Unlike `create_contact` this leaves no created marker behind.
    pub fn seed_contact(&mut self, name: &str, email: Option<&str>) -> RecordId {
        let mut fields = BTreeMap::new();
        fields.insert("name".into(), FieldValue::Text(name.into()));
        fields.insert(
            "email".into(),
            match email {
                Some(e) => FieldValue::Text(e.into()),
                None => FieldValue::Null,
            },
        );
        fields.insert("notes".into(), FieldValue::Null);
        let record = Record::new(RecordId::new(), fields);
        let id = record.id;

        let mut records = self.workbook.records(&self.table_id).to_vec();
        records.push(record);
        self.workbook.add_table(contacts_table(), records.clone());
        self.persistence.register_table(contacts_table(), records);
        id
    }

    /// Create a contact through the normal bulk path and return its id.
    pub fn create_contact(
        &mut self,
        name: &str,
        email: Option<&str>,
    ) -> Result<RecordId, EngineError> {
        let id = RecordId::new();
        let mut data = BTreeMap::new();
        data.insert("name".into(), FieldValue::Text(name.into()));
        if let Some(email) = email {
            data.insert("email".into(), FieldValue::Text(email.into()));
        }
        self.workbook
            .apply_operations(&self.table_id, &[BulkOperation::Create { id, data }])?;
        Ok(id)
    }

    /// Queue a single-cell pending edit.
    pub fn edit_cell(
        &mut self,
        id: RecordId,
        column: &str,
        value: FieldValue,
    ) -> Result<(), EngineError> {
        let mut patch = BTreeMap::new();
        patch.insert(column.into(), value);
        self.workbook
            .apply_operations(&self.table_id, &[BulkOperation::Update { id, patch }])
    }

    pub fn record(&self, id: RecordId) -> &Record {
        self.workbook
            .record(&self.table_id, id)
            .expect("record should exist in test workbook")
    }
}

impl Default for TestWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard test schema: readonly id plus three editable text columns.
pub fn contacts_table() -> Table {
    Table::new(
        "contacts",
        vec![
            Column::new("id", "ID", ColumnType::Text).readonly(),
            Column::new("name", "Name", ColumnType::Text),
            Column::new("email", "Email", ColumnType::Text),
            Column::new("notes", "Notes", ColumnType::Text),
        ],
    )
}
