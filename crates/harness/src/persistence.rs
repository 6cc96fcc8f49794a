use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use snapgrid_core::{BulkOperation, Record, Table, TableId, View};
use snapgrid_engine::{bulk, CellRef, PersistError, Persistence, ReconcileDecision};

#[derive(Default)]
struct MemoryInner {
    tables: BTreeMap<TableId, Table>,
    records: BTreeMap<TableId, Vec<Record>>,
    next_remote_id: u64,
    submitted_ops: Vec<(TableId, Vec<BulkOperation>)>,
    reconciles: Vec<(TableId, ReconcileDecision, Vec<CellRef>)>,
    upserted_views: Vec<View>,
}

/// Fake persistence API: applies submitted batches to its own copy of the
/// data and returns that as the authoritative set, assigning a remote id to
/// every created record the way the real source system would. Cloning shares
/// the underlying state so tests can keep a handle for assertions after the
/// workbook takes ownership. Single-threaded by design, like the engine.
#[derive(Clone, Default)]
pub struct MemoryPersistence {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the fake server with a table and its current record set.
    pub fn register_table(&self, table: Table, records: Vec<Record>) {
        let mut inner = self.inner.borrow_mut();
        inner.records.insert(table.id.clone(), records);
        inner.tables.insert(table.id.clone(), table);
    }

    pub fn submitted_ops(&self) -> Vec<(TableId, Vec<BulkOperation>)> {
        self.inner.borrow().submitted_ops.clone()
    }

    pub fn reconciles(&self) -> Vec<(TableId, ReconcileDecision, Vec<CellRef>)> {
        self.inner.borrow().reconciles.clone()
    }

    pub fn upserted_views(&self) -> Vec<View> {
        self.inner.borrow().upserted_views.clone()
    }
}

impl Persistence for MemoryPersistence {
    fn submit_operations(
        &mut self,
        table_id: &TableId,
        ops: &[BulkOperation],
    ) -> Result<Vec<Record>, PersistError> {
        let mut inner = self.inner.borrow_mut();
        inner
            .submitted_ops
            .push((table_id.clone(), ops.to_vec()));

        let table = inner
            .tables
            .get(table_id)
            .ok_or_else(|| PersistError::Rejected(format!("unknown table: {table_id}")))?
            .clone();
        let current = inner.records.get(table_id).cloned().unwrap_or_default();

        let mut next = bulk::apply(&table, &current, ops)
            .map_err(|e| PersistError::Rejected(e.to_string()))?;

        // The source system issues remote ids for newly created records
        for record in &mut next {
            if record.edits.created && record.remote_id.is_none() {
                inner.next_remote_id += 1;
                record.remote_id = Some(format!("srv-{}", inner.next_remote_id));
            }
        }

        inner.records.insert(table_id.clone(), next.clone());
        Ok(next)
    }

    fn submit_reconcile(
        &mut self,
        table_id: &TableId,
        decision: ReconcileDecision,
        items: &[CellRef],
    ) -> Result<(), PersistError> {
        self.inner
            .borrow_mut()
            .reconciles
            .push((table_id.clone(), decision, items.to_vec()));
        Ok(())
    }

    fn upsert_view(&mut self, view: &View) -> Result<View, PersistError> {
        self.inner.borrow_mut().upserted_views.push(view.clone());
        Ok(view.clone())
    }
}

/// Persistence that always fails with a network error, for exercising the
/// keep-optimistic-state-on-failure path. Counts attempts.
#[derive(Clone, Default)]
pub struct FailingPersistence {
    attempts: Rc<RefCell<usize>>,
}

impl FailingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }

    fn fail<T>(&self) -> Result<T, PersistError> {
        *self.attempts.borrow_mut() += 1;
        Err(PersistError::Network("connection refused".into()))
    }
}

impl Persistence for FailingPersistence {
    fn submit_operations(
        &mut self,
        _table_id: &TableId,
        _ops: &[BulkOperation],
    ) -> Result<Vec<Record>, PersistError> {
        self.fail()
    }

    fn submit_reconcile(
        &mut self,
        _table_id: &TableId,
        _decision: ReconcileDecision,
        _items: &[CellRef],
    ) -> Result<(), PersistError> {
        self.fail()
    }

    fn upsert_view(&mut self, _view: &View) -> Result<View, PersistError> {
        self.fail()
    }
}
