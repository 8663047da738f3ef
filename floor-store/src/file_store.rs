use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use floor_core::{Order, OrderRepository, StoreError};
use tracing::{debug, info, warn};

use crate::format::{EXPORT_DATE_COLUMN, ORDER_COLUMNS, RecordFormat};
use crate::partition::PartitionLayout;
use crate::record::OrderRow;

/// Order repository backed by one delimited text file per order date.
///
/// All orders live in memory between [`OrderRepository::load`] and
/// [`OrderRepository::save`]. Files are replaced whole: each write goes to a
/// sibling temp file that is then renamed over the partition.
#[derive(Debug)]
pub struct FileOrderStore {
    dir: PathBuf,
    format: RecordFormat,
    layout: PartitionLayout,
    orders: BTreeMap<u32, Order>,
    /// Files seen at load or written since, by date.
    partitions: BTreeMap<NaiveDate, PathBuf>,
}

impl FileOrderStore {
    pub fn new(
        dir: impl Into<PathBuf>,
        format: RecordFormat,
        layout: PartitionLayout,
    ) -> Self {
        Self {
            dir: dir.into(),
            format,
            layout,
            orders: BTreeMap::new(),
            partitions: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> &RecordFormat {
        &self.format
    }

    /// File holding the orders for `date`, whether or not it exists yet.
    pub fn partition_path(
        &self,
        date: NaiveDate,
    ) -> PathBuf {
        self.partitions
            .get(&date)
            .cloned()
            .unwrap_or_else(|| self.layout.path_for(&self.dir, date))
    }

    /// Dates with a known partition file.
    pub fn partition_dates(&self) -> Vec<NaiveDate> {
        self.partitions.keys().copied().collect()
    }

    fn read_partition(
        &self,
        path: &Path,
        date: NaiveDate,
    ) -> Result<Vec<Order>, StoreError> {
        let file = File::open(path).map_err(|e| StoreError::unavailable(path, e))?;
        let mut reader = self.format.reader(file);

        let headers = reader.headers().map_err(|e| read_error(path, e))?;
        if !headers.is_empty() && !headers.iter().eq(ORDER_COLUMNS) {
            let delimiter = self.format.delimiter().to_string();
            return Err(StoreError::MalformedRecord {
                path: path.to_path_buf(),
                line: 1,
                reason: format!(
                    "expected header '{}', found '{}'",
                    ORDER_COLUMNS.join(&delimiter),
                    headers.iter().collect::<Vec<_>>().join(&delimiter)
                ),
            });
        }

        let mut orders = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| read_error(path, e))?;
            let line = record.position().map_or(0, |p| p.line());
            let malformed = |reason: String| StoreError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason,
            };

            let row: OrderRow = record
                .deserialize(None)
                .map_err(|e| malformed(e.to_string()))?;
            orders.push(row.into_order(date, &self.format).map_err(malformed)?);
        }
        Ok(orders)
    }

    /// Write `header` and `rows` to `path` through a temp file. The temp file
    /// is removed again if anything fails.
    fn write_records<'a>(
        &self,
        path: &Path,
        header: &[&str],
        rows: impl IntoIterator<Item = Vec<&'a str>>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(parent, e))?;
        }
        let tmp = temp_path(path);
        let written = self
            .write_temp(&tmp, header, rows)
            .and_then(|()| fs::rename(&tmp, path).map_err(|e| StoreError::unavailable(path, e)));

        if written.is_err() && tmp.exists() {
            if let Err(error) = fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), %error, "could not remove temp file");
            }
        }
        written
    }

    fn write_temp<'a>(
        &self,
        tmp: &Path,
        header: &[&str],
        rows: impl IntoIterator<Item = Vec<&'a str>>,
    ) -> Result<(), StoreError> {
        let file = File::create(tmp).map_err(|e| StoreError::unavailable(tmp, e))?;

        let mut writer = self.format.writer(file);
        writer
            .write_record(header)
            .map_err(|e| StoreError::unavailable(tmp, e.into()))?;
        for row in rows {
            writer
                .write_record(&row)
                .map_err(|e| StoreError::unavailable(tmp, e.into()))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::unavailable(tmp, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::unavailable(tmp, e))
    }

    fn stored_rows(
        &self,
        orders: &[&Order],
    ) -> Result<Vec<OrderRow>, StoreError> {
        orders
            .iter()
            .map(|order| OrderRow::from_order(order, &self.format))
            .collect()
    }
}

impl OrderRepository for FileOrderStore {
    fn load(&mut self) -> Result<(), StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::unavailable(&self.dir, e))?;

        let mut orders = BTreeMap::new();
        let mut partitions = BTreeMap::new();
        let mut origin: BTreeMap<u32, PathBuf> = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::unavailable(&self.dir, e))?;
            let path = entry.path();
            if !entry
                .file_type()
                .map_err(|e| StoreError::unavailable(&path, e))?
                .is_file()
            {
                continue;
            }
            let Some(date) = self.layout.date_of(&path) else {
                warn!(path = %path.display(), "skipping file that is not an order partition");
                continue;
            };

            let loaded = self.read_partition(&path, date)?;
            debug!(path = %path.display(), count = loaded.len(), "partition read");
            for order in loaded {
                if let Some(first) = origin.get(&order.order_number) {
                    return Err(StoreError::MalformedRecord {
                        path: path.clone(),
                        line: 0,
                        reason: format!(
                            "order number {} already loaded from '{}'",
                            order.order_number,
                            first.display()
                        ),
                    });
                }
                origin.insert(order.order_number, path.clone());
                orders.insert(order.order_number, order);
            }
            partitions.insert(date, path);
        }

        info!(
            dir = %self.dir.display(),
            orders = orders.len(),
            partitions = partitions.len(),
            "order store loaded"
        );
        self.orders = orders;
        self.partitions = partitions;
        Ok(())
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let dates: BTreeSet<NaiveDate> = self.orders.values().map(|o| o.order_date).collect();
        for date in dates {
            self.save_partition(date)?;
        }
        Ok(())
    }

    fn save_partition(
        &mut self,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        let path = self.partition_path(date);
        let on_date: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| o.order_date == date)
            .collect();
        let rows = self.stored_rows(&on_date)?;

        self.write_records(&path, &ORDER_COLUMNS, rows.iter().map(|r| r.fields().to_vec()))?;
        debug!(path = %path.display(), count = rows.len(), "partition written");

        self.partitions.insert(date, path);
        Ok(())
    }

    fn get(
        &self,
        date: NaiveDate,
        order_number: u32,
    ) -> Result<Order, StoreError> {
        self.orders
            .get(&order_number)
            .filter(|o| o.order_date == date)
            .cloned()
            .ok_or(StoreError::OrderNotFound { date, order_number })
    }

    fn all_for_date(
        &self,
        date: NaiveDate,
    ) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.order_date == date)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    fn put(
        &mut self,
        order: Order,
    ) -> Option<Order> {
        self.orders.insert(order.order_number, order)
    }

    fn remove(
        &mut self,
        order: &Order,
    ) -> Result<Order, StoreError> {
        self.get(order.order_date, order.order_number)?;
        self.orders
            .remove(&order.order_number)
            .ok_or(StoreError::OrderNotFound {
                date: order.order_date,
                order_number: order.order_number,
            })
    }

    fn export_all(
        &self,
        destination: &Path,
    ) -> Result<usize, StoreError> {
        let all: Vec<&Order> = self.orders.values().collect();
        let rows = self.stored_rows(&all)?;
        let dates: Vec<String> = all
            .iter()
            .map(|o| o.order_date.format("%Y-%m-%d").to_string())
            .collect();

        let header: Vec<&str> = ORDER_COLUMNS
            .iter()
            .copied()
            .chain([EXPORT_DATE_COLUMN])
            .collect();
        let records = rows.iter().zip(&dates).map(|(row, date)| {
            let mut fields = row.fields().to_vec();
            fields.push(date.as_str());
            fields
        });
        self.write_records(destination, &header, records)?;

        Ok(rows.len())
    }

    fn max_order_number(&self) -> Option<u32> {
        self.orders.keys().next_back().copied()
    }

    fn accepts_customer_name(
        &self,
        name: &str,
    ) -> bool {
        self.format.accepts_name(name)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_error(
    path: &Path,
    err: csv::Error,
) -> StoreError {
    if err.is_io_error() {
        return StoreError::unavailable(path, err.into());
    }
    StoreError::MalformedRecord {
        path: path.to_path_buf(),
        line: err.position().map_or(0, |p| p.line()),
        reason: err.to_string(),
    }
}
