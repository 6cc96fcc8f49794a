pub mod error;
pub mod field_value;
pub mod ids;
pub mod operations;
pub mod record;
pub mod schema;
pub mod view;

pub use error::CoreError;
pub use field_value::FieldValue;
pub use ids::*;
pub use operations::BulkOperation;
pub use record::{EditOverlay, Record, SuggestionOverlay};
pub use schema::{Column, ColumnType, Table};
pub use view::{ColumnOverride, TableOverride, View};
