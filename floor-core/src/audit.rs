use std::path::PathBuf;

use thiserror::Error;

use crate::models::AuditEntry;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("could not write audit entry to '{}': {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audit entry rejected: {0}")]
    Rejected(String),
}

/// Append-only destination for lifecycle events. Never read back.
pub trait AuditSink {
    fn record(
        &mut self,
        entry: &AuditEntry,
    ) -> Result<(), AuditError>;
}
