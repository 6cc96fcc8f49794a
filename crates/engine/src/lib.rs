pub mod action;
pub mod bulk;
pub mod error;
pub mod focus;
pub mod notify;
pub mod persist;
pub mod resolve;
pub mod sort;
pub mod store;
pub mod suggest;
pub mod views;

pub use action::{ActionOutcome, GridAction};
pub use error::{EngineError, PersistError, ValidationError};
pub use focus::{FocusSet, FocusTracker, FocusedCell, ToggleOutcome};
pub use notify::{ChangeEvent, ChangeNotifier, SubscriptionId};
pub use persist::{Persistence, ReconcileDecision};
pub use resolve::{CellDisplay, CellState, ResolvedCell};
pub use sort::{SortDirection, SortSpec};
pub use store::RecordStore;
pub use suggest::{CellRef, ReconcileOutcome};
pub use views::{ColumnPatch, OverridePatch};

use std::collections::BTreeMap;

use snapgrid_core::{
    BulkOperation, ColumnId, FieldValue, Record, RecordId, SnapshotId, Table, TableId, View,
};

/// One open snapshot: tables, the record store, focus sets, the optional
/// active view and the persistence seam, all serialized through this single
/// owner. Every mutation is applied optimistically in memory before the
/// persistence call; on failure the optimistic state stays and the error is
/// surfaced (no rollback, no retry).
pub struct Workbook {
    snapshot_id: SnapshotId,
    tables: BTreeMap<TableId, Table>,
    store: RecordStore,
    focus: FocusTracker,
    active_view: Option<View>,
    notifier: ChangeNotifier,
    persistence: Box<dyn Persistence>,
}

impl Workbook {
    pub fn new(snapshot_id: SnapshotId, persistence: Box<dyn Persistence>) -> Self {
        Self {
            snapshot_id,
            tables: BTreeMap::new(),
            store: RecordStore::new(),
            focus: FocusTracker::new(),
            active_view: None,
            notifier: ChangeNotifier::new(),
            persistence,
        }
    }

    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot_id
    }

    /// Register an imported table and its initial record set.
    pub fn add_table(&mut self, table: Table, records: Vec<Record>) {
        let table_id = table.id.clone();
        self.tables.insert(table_id.clone(), table);
        self.store.insert_table(table_id, records);
    }

    pub fn table(&self, table_id: &TableId) -> Option<&Table> {
        self.tables.get(table_id)
    }

    pub fn records(&self, table_id: &TableId) -> &[Record] {
        self.store.records(table_id)
    }

    pub fn record(&self, table_id: &TableId, record_id: RecordId) -> Option<&Record> {
        self.store.record(table_id, record_id)
    }

    // ========================================================================
    // Read path (called by the rendering layer before paint)
    // ========================================================================

    /// Records in display order: comparator sort if requested, filtered
    /// records always last.
    pub fn sorted_records(&self, table_id: &TableId, sort: Option<&SortSpec>) -> Vec<Record> {
        sort::sort_records(self.store.records(table_id), sort)
    }

    /// Resolve one cell's display/editability against the active view.
    pub fn resolve_cell(
        &self,
        table_id: &TableId,
        record_id: RecordId,
        column_id: &ColumnId,
    ) -> Result<ResolvedCell, EngineError> {
        let table = self
            .tables
            .get(table_id)
            .ok_or_else(|| EngineError::TableNotFound(table_id.clone()))?;
        let column = table
            .column(column_id)
            .ok_or_else(|| EngineError::ColumnNotFound(column_id.clone()))?;
        let record = self
            .store
            .record(table_id, record_id)
            .ok_or(EngineError::RecordNotFound(record_id))?;
        Ok(resolve::resolve_cell(
            record,
            column,
            table_id,
            self.active_view.as_ref(),
        ))
    }

    // ========================================================================
    // Bulk mutation
    // ========================================================================

    /// Validate and apply a batch against the current snapshot, install it
    /// optimistically, then submit to persistence. A validation failure
    /// rejects the whole batch with nothing mutated; a persistence failure
    /// leaves the optimistic state in place.
    pub fn apply_operations(
        &mut self,
        table_id: &TableId,
        ops: &[BulkOperation],
    ) -> Result<(), EngineError> {
        let table = self
            .tables
            .get(table_id)
            .ok_or_else(|| EngineError::TableNotFound(table_id.clone()))?;

        let next = bulk::apply(table, self.store.records(table_id), ops)?;
        self.store.replace(table_id, next);
        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });

        let authoritative = self.persistence.submit_operations(table_id, ops)?;
        self.store.replace(table_id, authoritative);
        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });
        Ok(())
    }

    // ========================================================================
    // Suggestion reconciliation
    // ========================================================================

    pub fn accept_cells(
        &mut self,
        table_id: &TableId,
        items: Vec<CellRef>,
    ) -> Result<ReconcileOutcome, EngineError> {
        self.reconcile(table_id, ReconcileDecision::Accept, Some(items))
    }

    pub fn reject_cells(
        &mut self,
        table_id: &TableId,
        items: Vec<CellRef>,
    ) -> Result<ReconcileOutcome, EngineError> {
        self.reconcile(table_id, ReconcileDecision::Reject, Some(items))
    }

    pub fn accept_all_for_table(
        &mut self,
        table_id: &TableId,
    ) -> Result<ReconcileOutcome, EngineError> {
        self.reconcile(table_id, ReconcileDecision::Accept, None)
    }

    pub fn reject_all_for_table(
        &mut self,
        table_id: &TableId,
    ) -> Result<ReconcileOutcome, EngineError> {
        self.reconcile(table_id, ReconcileDecision::Reject, None)
    }

    fn reconcile(
        &mut self,
        table_id: &TableId,
        decision: ReconcileDecision,
        items: Option<Vec<CellRef>>,
    ) -> Result<ReconcileOutcome, EngineError> {
        let records = self
            .store
            .records_mut(table_id)
            .ok_or_else(|| EngineError::TableNotFound(table_id.clone()))?;

        let items = items.unwrap_or_else(|| suggest::expand_all(records));
        let outcome = match decision {
            ReconcileDecision::Accept => suggest::accept_cells(records, &items),
            ReconcileDecision::Reject => suggest::reject_cells(records, &items),
        };

        // Nothing pending at the targets: informational, skip the round trip
        if outcome.is_empty() {
            return Ok(outcome);
        }

        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });
        self.persistence.submit_reconcile(table_id, decision, &items)?;
        Ok(outcome)
    }

    // ========================================================================
    // Agent channel (external writer of suggestions and filters)
    // ========================================================================

    /// Record a proposed replacement value from the AI agent.
    pub fn suggest_value(
        &mut self,
        table_id: &TableId,
        record_id: RecordId,
        column_id: impl Into<ColumnId>,
        value: FieldValue,
    ) -> Result<(), EngineError> {
        let record = self.store.record_mut(table_id, record_id)?;
        record.suggestions.values.insert(column_id.into(), value);
        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });
        Ok(())
    }

    /// Record the agent's proposal to remove a record.
    pub fn suggest_delete(
        &mut self,
        table_id: &TableId,
        record_id: RecordId,
    ) -> Result<(), EngineError> {
        let record = self.store.record_mut(table_id, record_id)?;
        record.suggestions.delete_proposed = true;
        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });
        Ok(())
    }

    /// Apply the server-side exclusion filter flag to a record.
    pub fn set_filtered(
        &mut self,
        table_id: &TableId,
        record_id: RecordId,
        filtered: bool,
    ) -> Result<(), EngineError> {
        let record = self.store.record_mut(table_id, record_id)?;
        record.filtered = filtered;
        self.notifier
            .emit(&ChangeEvent::RecordsReplaced { table: table_id.clone() });
        Ok(())
    }

    // ========================================================================
    // View configuration
    // ========================================================================

    pub fn active_view(&self) -> Option<&View> {
        self.active_view.as_ref()
    }

    pub fn set_active_view(&mut self, view: Option<View>) {
        self.active_view = view;
        self.notifier.emit(&ChangeEvent::ViewChanged);
    }

    pub fn is_table_visible(&self, table_id: &TableId) -> bool {
        views::is_table_visible(self.active_view.as_ref(), table_id)
    }

    pub fn is_table_editable(&self, table_id: &TableId) -> bool {
        views::is_table_editable(self.active_view.as_ref(), table_id)
    }

    pub fn is_column_hidden(&self, table_id: &TableId, column_id: &ColumnId) -> bool {
        views::is_column_hidden(self.active_view.as_ref(), table_id, column_id)
    }

    pub fn is_column_protected(
        &self,
        table_id: &TableId,
        column_id: &ColumnId,
    ) -> bool {
        views::is_column_protected(self.active_view.as_ref(), table_id, column_id)
    }

    /// Merge a column override into the active view (creating an unnamed
    /// view for this snapshot if none is active), then persist it. The
    /// persisted view replaces the local one on success.
    pub fn upsert_column_override(
        &mut self,
        table_id: &TableId,
        column_id: &ColumnId,
        patch: ColumnPatch,
    ) -> Result<(), EngineError> {
        let snapshot_id = self.snapshot_id;
        let view = self
            .active_view
            .get_or_insert_with(|| View::new(snapshot_id));
        views::upsert_column_override(view, table_id, column_id, patch);
        self.notifier.emit(&ChangeEvent::ViewChanged);
        self.persist_active_view()
    }

    pub fn toggle_column_hidden(
        &mut self,
        table_id: &TableId,
        column_id: &ColumnId,
    ) -> Result<bool, EngineError> {
        let snapshot_id = self.snapshot_id;
        let view = self
            .active_view
            .get_or_insert_with(|| View::new(snapshot_id));
        let next = views::toggle_column_hidden(view, table_id, column_id);
        self.notifier.emit(&ChangeEvent::ViewChanged);
        self.persist_active_view()?;
        Ok(next)
    }

    pub fn toggle_column_protected(
        &mut self,
        table_id: &TableId,
        column_id: &ColumnId,
    ) -> Result<bool, EngineError> {
        let snapshot_id = self.snapshot_id;
        let view = self
            .active_view
            .get_or_insert_with(|| View::new(snapshot_id));
        let next = views::toggle_column_protected(view, table_id, column_id);
        self.notifier.emit(&ChangeEvent::ViewChanged);
        self.persist_active_view()?;
        Ok(next)
    }

    fn persist_active_view(&mut self) -> Result<(), EngineError> {
        let Some(view) = self.active_view.as_ref() else {
            return Ok(());
        };
        let persisted = self.persistence.upsert_view(view)?;
        self.active_view = Some(persisted);
        Ok(())
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus_cells(&self, set: FocusSet) -> &[FocusedCell] {
        self.focus.cells(set)
    }

    pub fn add_focus(&mut self, set: FocusSet, cells: &[FocusedCell]) {
        self.focus.add(set, cells);
        self.notifier.emit(&ChangeEvent::FocusChanged { set });
    }

    pub fn remove_focus(&mut self, set: FocusSet, cells: &[FocusedCell]) {
        self.focus.remove(set, cells);
        self.notifier.emit(&ChangeEvent::FocusChanged { set });
    }

    pub fn toggle_focus(&mut self, set: FocusSet, cells: &[FocusedCell]) -> ToggleOutcome {
        let outcome = self.focus.toggle(set, cells);
        self.notifier.emit(&ChangeEvent::FocusChanged { set });
        outcome
    }

    pub fn clear_focus(&mut self, set: FocusSet) {
        self.focus.clear(set);
        self.notifier.emit(&ChangeEvent::FocusChanged { set });
    }

    pub fn clear_all_focus(&mut self) {
        self.focus.clear_all();
        self.notifier.emit(&ChangeEvent::FocusChanged { set: FocusSet::Read });
        self.notifier.emit(&ChangeEvent::FocusChanged { set: FocusSet::Write });
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ChangeEvent) + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.notifier.unsubscribe(id);
    }

    // ========================================================================
    // Action dispatch
    // ========================================================================

    /// Route a typed grid action to its handler.
    pub fn dispatch(&mut self, action: GridAction) -> Result<ActionOutcome, EngineError> {
        match action {
            GridAction::AcceptSuggestions { table, items } => {
                Ok(ActionOutcome::Reconciled(self.accept_cells(&table, items)?))
            }
            GridAction::RejectSuggestions { table, items } => {
                Ok(ActionOutcome::Reconciled(self.reject_cells(&table, items)?))
            }
            GridAction::AcceptAllSuggestions { table } => Ok(ActionOutcome::Reconciled(
                self.accept_all_for_table(&table)?,
            )),
            GridAction::RejectAllSuggestions { table } => Ok(ActionOutcome::Reconciled(
                self.reject_all_for_table(&table)?,
            )),
            GridAction::DeleteRecords { table, ids } => {
                let ops: Vec<BulkOperation> =
                    ids.into_iter().map(|id| BulkOperation::Delete { id }).collect();
                self.apply_operations(&table, &ops)?;
                Ok(ActionOutcome::Applied)
            }
            GridAction::UndeleteRecords { table, ids } => {
                let ops: Vec<BulkOperation> = ids
                    .into_iter()
                    .map(|id| BulkOperation::Undelete { id })
                    .collect();
                self.apply_operations(&table, &ops)?;
                Ok(ActionOutcome::Applied)
            }
            GridAction::ToggleColumnHidden { table, column } => Ok(ActionOutcome::ViewToggled(
                self.toggle_column_hidden(&table, &column)?,
            )),
            GridAction::ToggleColumnProtected { table, column } => Ok(
                ActionOutcome::ViewToggled(self.toggle_column_protected(&table, &column)?),
            ),
            GridAction::ToggleFocus { set, cells } => {
                Ok(ActionOutcome::FocusToggled(self.toggle_focus(set, &cells)))
            }
            GridAction::ClearFocus { set } => {
                self.clear_focus(set);
                Ok(ActionOutcome::FocusCleared)
            }
        }
    }
}
