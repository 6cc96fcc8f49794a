use snapgrid_core::{BulkOperation, Record, TableId, View};

use crate::error::PersistError;
use crate::suggest::CellRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    Accept,
    Reject,
}

impl ReconcileDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

/// Seam to the external persistence API. The engine applies every mutation
/// optimistically in memory first, then calls out through this trait; on
/// success the authoritative response replaces the local snapshot, on
/// failure the optimistic state stays in place and the error is surfaced.
/// No retry happens inside the engine.
pub trait Persistence {
    /// Submit a bulk batch for one table. Returns the authoritative record
    /// set for that table.
    fn submit_operations(
        &mut self,
        table_id: &TableId,
        ops: &[BulkOperation],
    ) -> Result<Vec<Record>, PersistError>;

    /// Report accepted/rejected suggestion cells.
    fn submit_reconcile(
        &mut self,
        table_id: &TableId,
        decision: ReconcileDecision,
        items: &[CellRef],
    ) -> Result<(), PersistError>;

    /// Create or update a view. Returns the persisted view with its id.
    fn upsert_view(&mut self, view: &View) -> Result<View, PersistError>;
}
