use snapgrid_core::{ColumnId, CoreError, RecordId, TableId};
use thiserror::Error;

/// Synchronous rejection of a whole bulk batch. Raised before any mutation
/// is observable.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{op} targets unknown record: {id}")]
    UnknownRecord { op: &'static str, id: RecordId },

    #[error("create id already exists: {id}")]
    DuplicateRecordId { id: RecordId },
}

/// Failure from the external persistence layer. The optimistic local
/// mutation stays applied; retry is caller-initiated.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("network error: {0}")]
    Network(String),

    #[error("persistence rejected the submission: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("table not found: {0}")]
    TableNotFound(TableId),
}
