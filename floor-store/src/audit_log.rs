use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use floor_core::{AuditEntry, AuditError, AuditSink};

/// Audit trail kept as one line per entry in a plain text file.
///
/// The file is opened in append mode for every entry so nothing is held open
/// between mutations.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(
        &mut self,
        entry: &AuditEntry,
    ) -> Result<(), AuditError> {
        let unavailable = |source| AuditError::Unavailable {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(unavailable)?;
        writeln!(file, "{entry}").map_err(unavailable)
    }
}
