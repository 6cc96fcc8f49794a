pub mod persistence;
pub mod workbook;

pub use persistence::{FailingPersistence, MemoryPersistence};
pub use workbook::{contacts_table, TestWorkbook};
