//! Flat-file persistence for orders and the audit trail.
//!
//! Orders are stored one partition file per order date inside a single
//! directory. See [`FileOrderStore`] for the repository and [`RecordFormat`]
//! for the record layout.

pub mod audit_log;
pub mod file_store;
pub mod format;
pub mod partition;
mod record;

pub use audit_log::FileAuditLog;
pub use file_store::FileOrderStore;
pub use format::{EXPORT_DATE_COLUMN, ORDER_COLUMNS, RecordFormat};
pub use partition::{DEFAULT_EXTENSION, DEFAULT_PREFIX, PartitionLayout};
