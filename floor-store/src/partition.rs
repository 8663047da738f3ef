//! Mapping between an order date and its partition file name.
//!
//! Partition files are named `<prefix>_<MMDDYYYY>.<extension>`, e.g.
//! `Orders_06012013.txt`. This is the only place a date is read from a path.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use floor_core::StoreError;
use regex::Regex;

const DATE_FORMAT: &str = "%m%d%Y";

pub const DEFAULT_PREFIX: &str = "Orders";
pub const DEFAULT_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct PartitionLayout {
    prefix: String,
    extension: String,
    pattern: Regex,
}

impl PartitionLayout {
    pub fn new(
        prefix: &str,
        extension: &str,
    ) -> Result<Self, StoreError> {
        if prefix.is_empty() || extension.is_empty() {
            return Err(StoreError::InvalidFormat(
                "partition prefix and extension must not be empty".to_string(),
            ));
        }
        let pattern = Regex::new(&format!(
            r"^{}_(\d{{8}})\.{}$",
            regex::escape(prefix),
            regex::escape(extension)
        ))
        .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            extension: extension.to_string(),
            pattern,
        })
    }

    pub fn file_name(
        &self,
        date: NaiveDate,
    ) -> String {
        format!(
            "{}_{}.{}",
            self.prefix,
            date.format(DATE_FORMAT),
            self.extension
        )
    }

    pub fn path_for(
        &self,
        dir: &Path,
        date: NaiveDate,
    ) -> PathBuf {
        dir.join(self.file_name(date))
    }

    /// Date encoded in a partition file name, or `None` when the name does
    /// not follow the layout or names an impossible date.
    pub fn date_of(
        &self,
        path: &Path,
    ) -> Option<NaiveDate> {
        let name = path.file_name()?.to_str()?;
        let digits = self.pattern.captures(name)?.get(1)?.as_str();
        NaiveDate::parse_from_str(digits, DATE_FORMAT).ok()
    }
}
