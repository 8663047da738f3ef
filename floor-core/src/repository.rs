use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Order;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order store unavailable at '{}': {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no order {order_number} found for {date}")]
    OrderNotFound {
        date: NaiveDate,
        order_number: u32,
    },

    #[error("malformed record in '{}' at line {line}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("field {field} cannot be stored: {value:?}")]
    UnsafeField { field: &'static str, value: String },

    #[error("invalid record format: {0}")]
    InvalidFormat(String),
}

impl StoreError {
    pub fn unavailable(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Unavailable {
            path: path.into(),
            source,
        }
    }
}

/// Owner of the order collection.
///
/// Implementations keep every order in memory, keyed by order number, and
/// persist them in per-date partitions. Single writer: nothing here locks.
pub trait OrderRepository {
    /// Replace the in-memory collection with what is persisted.
    fn load(&mut self) -> Result<(), StoreError>;

    /// Rewrite the partition of every date that has at least one order.
    /// Partitions of dates with no in-memory orders are left alone.
    fn save(&mut self) -> Result<(), StoreError>;

    /// Rewrite the partition for one date, even if it has no orders left.
    fn save_partition(
        &mut self,
        date: NaiveDate,
    ) -> Result<(), StoreError>;

    /// The order with `order_number`, provided it belongs to `date`.
    fn get(
        &self,
        date: NaiveDate,
        order_number: u32,
    ) -> Result<Order, StoreError>;

    fn all_for_date(
        &self,
        date: NaiveDate,
    ) -> Vec<Order>;

    fn all(&self) -> Vec<Order>;

    /// Insert or overwrite under the order's number. Returns the replaced
    /// order, if any.
    fn put(
        &mut self,
        order: Order,
    ) -> Option<Order>;

    fn remove(
        &mut self,
        order: &Order,
    ) -> Result<Order, StoreError>;

    /// Write every order, across all dates, to one file. Returns the number
    /// of orders written.
    fn export_all(
        &self,
        destination: &Path,
    ) -> Result<usize, StoreError>;

    fn max_order_number(&self) -> Option<u32> {
        self.all().iter().map(|o| o.order_number).max()
    }

    /// Whether a customer name survives a save/load round trip unchanged.
    fn accepts_customer_name(
        &self,
        _name: &str,
    ) -> bool {
        true
    }
}
