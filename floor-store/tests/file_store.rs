//! Integration tests for the flat-file order store against real directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use floor_core::{AuditEntry, AuditEvent, AuditSink, Order, OrderRepository, StoreError};
use floor_store::{
    DEFAULT_EXTENSION, DEFAULT_PREFIX, FileAuditLog, FileOrderStore, PartitionLayout,
    RecordFormat,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::{TempDir, tempdir};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/orders");

// ── helpers ─────────────────────────────────────────────────────────────────

fn date(
    m: u32,
    d: u32,
    y: i32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn layout() -> PartitionLayout {
    PartitionLayout::new(DEFAULT_PREFIX, DEFAULT_EXTENSION).unwrap()
}

fn store_at(dir: &Path) -> FileOrderStore {
    FileOrderStore::new(dir, RecordFormat::default(), layout())
}

/// Fresh temp directory holding a copy of the fixture partitions.
fn fixture_copy() -> (TempDir, FileOrderStore) {
    let tmp = tempdir().unwrap();
    for entry in fs::read_dir(FIXTURES).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, tmp.path().join(path.file_name().unwrap())).unwrap();
    }
    let mut store = store_at(tmp.path());
    store.load().unwrap();
    (tmp, store)
}

fn partition_file(
    dir: &Path,
    name: &str,
) -> PathBuf {
    dir.join(name)
}

fn order(
    order_number: u32,
    order_date: NaiveDate,
    customer_name: &str,
) -> Order {
    Order {
        order_number,
        order_date,
        customer_name: customer_name.to_string(),
        state: "CA".to_string(),
        tax_rate: dec!(25.00),
        product_type: "Tile".to_string(),
        area: dec!(249.00),
        cost_per_square_foot: dec!(3.50),
        labor_cost_per_square_foot: dec!(4.15),
        material_cost: dec!(871.50),
        labor_cost: dec!(1033.35),
        tax: dec!(476.21),
        total: dec!(2381.06),
    }
}

const HEADER: &str = "OrderNumber,CustomerName,State,TaxRate,ProductType,Area,\
CostPerSquareFoot,LaborCostPerSquareFoot,MaterialCost,LaborCost,Tax,Total";

// ── load ────────────────────────────────────────────────────────────────────

#[test]
fn loads_every_fixture_partition() {
    let mut store = store_at(Path::new(FIXTURES));

    store.load().unwrap();

    let numbers: Vec<u32> = store.all().iter().map(|o| o.order_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(store.partition_dates(), vec![date(6, 1, 2013), date(6, 2, 2013)]);
}

#[test]
fn order_date_comes_from_file_name() {
    let mut store = store_at(Path::new(FIXTURES));
    store.load().unwrap();

    let ada = store.get(date(6, 1, 2013), 1).unwrap();

    assert_eq!(ada.customer_name, "Ada Lovelace");
    assert_eq!(ada.order_date, date(6, 1, 2013));
    assert_eq!(ada.material_cost, dec!(871.50));
    assert_eq!(ada.total, dec!(2381.06));
}

#[test]
fn substitute_in_name_is_read_back_as_delimiter() {
    let mut store = store_at(Path::new(FIXTURES));
    store.load().unwrap();

    let einstein = store.get(date(6, 2, 2013), 3).unwrap();

    assert_eq!(einstein.customer_name, "Einstein, Albert");
}

#[test]
fn get_with_wrong_date_is_not_found() {
    let mut store = store_at(Path::new(FIXTURES));
    store.load().unwrap();

    let err = store.get(date(6, 2, 2013), 1).unwrap_err();

    assert!(matches!(
        err,
        StoreError::OrderNotFound { order_number: 1, .. }
    ));
}

#[test]
fn all_for_date_is_ordered_by_number() {
    let mut store = store_at(Path::new(FIXTURES));
    store.load().unwrap();

    let numbers: Vec<u32> = store
        .all_for_date(date(6, 2, 2013))
        .iter()
        .map(|o| o.order_number)
        .collect();

    assert_eq!(numbers, vec![2, 3]);
    assert!(store.all_for_date(date(1, 1, 2020)).is_empty());
}

#[test]
fn missing_directory_is_unavailable() {
    let tmp = tempdir().unwrap();
    let mut store = store_at(&tmp.path().join("nope"));

    let err = store.load().unwrap_err();

    assert!(matches!(err, StoreError::Unavailable { .. }));
}

#[test]
fn empty_directory_loads_no_orders() {
    let tmp = tempdir().unwrap();
    let mut store = store_at(tmp.path());

    store.load().unwrap();

    assert!(store.all().is_empty());
    assert_eq!(store.max_order_number(), None);
}

#[test]
fn subdirectories_are_not_scanned() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("Orders_06012013.txt");
    fs::create_dir(&nested).unwrap();

    let mut store = store_at(tmp.path());
    store.load().unwrap();

    assert!(store.all().is_empty());
}

#[test]
fn header_only_partition_loads_empty() {
    let tmp = tempdir().unwrap();
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{HEADER}\n"),
    )
    .unwrap();

    let mut store = store_at(tmp.path());
    store.load().unwrap();

    assert!(store.all().is_empty());
    assert_eq!(store.partition_dates(), vec![date(1, 1, 2020)]);
}

#[test]
fn short_record_is_malformed_with_line() {
    let tmp = tempdir().unwrap();
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{HEADER}\n1,Ada,CA,25.00,Tile\n"),
    )
    .unwrap();

    let mut store = store_at(tmp.path());
    let err = store.load().unwrap_err();

    match err {
        StoreError::MalformedRecord { line, .. } => assert_eq!(line, 2),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn reordered_header_is_malformed_at_line_one() {
    let tmp = tempdir().unwrap();
    let swapped = HEADER.replace("MaterialCost,LaborCost", "LaborCost,MaterialCost");
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{swapped}
1,Ada,CA,25.00,Tile,249.00,3.50,4.15,1033.35,871.50,476.21,2381.06
"),
    )
    .unwrap();

    let mut store = store_at(tmp.path());
    let err = store.load().unwrap_err();

    match err {
        StoreError::MalformedRecord { line, ref reason, .. } => {
            assert_eq!(line, 1);
            assert!(reason.contains(HEADER), "{reason}");
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn misnamed_header_is_malformed() {
    let tmp = tempdir().unwrap();
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{}
", HEADER.replace("Total", "GrandTotal")),
    )
    .unwrap();

    let mut store = store_at(tmp.path());

    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::MalformedRecord { line: 1, .. }
    ));
}

#[test]
fn unparseable_decimal_is_malformed() {
    let tmp = tempdir().unwrap();
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{HEADER}\n1,Ada,CA,25.00,Tile,lots,3.50,4.15,871.50,1033.35,476.21,2381.06\n"),
    )
    .unwrap();

    let mut store = store_at(tmp.path());
    let err = store.load().unwrap_err();

    assert!(matches!(err, StoreError::MalformedRecord { .. }));
    assert!(err.to_string().contains("Area"), "{err}");
}

#[test]
fn duplicate_order_number_across_dates_is_rejected() {
    let tmp = tempdir().unwrap();
    let row = "7,Ada,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21,2381.06";
    for name in ["Orders_01012020.txt", "Orders_01022020.txt"] {
        fs::write(partition_file(tmp.path(), name), format!("{HEADER}\n{row}\n")).unwrap();
    }

    let mut store = store_at(tmp.path());
    let err = store.load().unwrap_err();

    assert!(err.to_string().contains("order number 7"), "{err}");
}

#[test]
fn failed_load_keeps_previous_contents() {
    let (tmp, mut store) = fixture_copy();
    fs::write(
        partition_file(tmp.path(), "Orders_01012020.txt"),
        format!("{HEADER}\nnot,enough\n"),
    )
    .unwrap();

    assert!(store.load().is_err());
    assert_eq!(store.all().len(), 3);
}

// ── save ────────────────────────────────────────────────────────────────────

#[test]
fn save_then_load_round_trips() {
    let (tmp, mut store) = fixture_copy();
    let before = store.all();

    store.save().unwrap();
    let mut reloaded = store_at(tmp.path());
    reloaded.load().unwrap();

    assert_eq!(reloaded.all(), before);
}

#[test]
fn saved_partition_matches_fixture_bytes() {
    let (tmp, mut store) = fixture_copy();

    store.save().unwrap();

    for name in ["Orders_06012013.txt", "Orders_06022013.txt"] {
        let written = fs::read_to_string(tmp.path().join(name)).unwrap();
        let fixture = fs::read_to_string(Path::new(FIXTURES).join(name)).unwrap();
        assert_eq!(written, fixture, "{name}");
    }
}

#[test]
fn put_creates_partition_for_new_date() {
    let (tmp, mut store) = fixture_copy();
    store.put(order(4, date(7, 4, 2013), "Smith, John"));

    store.save().unwrap();

    let written = fs::read_to_string(tmp.path().join("Orders_07042013.txt")).unwrap();
    assert_eq!(
        written,
        format!(
            "{HEADER}\n4,Smith/ John,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21,2381.06\n"
        )
    );
}

#[test]
fn save_leaves_emptied_date_untouched() {
    let (tmp, mut store) = fixture_copy();
    let ada = store.get(date(6, 1, 2013), 1).unwrap();
    store.remove(&ada).unwrap();

    store.save().unwrap();

    let still_there = fs::read_to_string(tmp.path().join("Orders_06012013.txt")).unwrap();
    assert!(still_there.contains("Ada Lovelace"));
}

#[test]
fn save_partition_rewrites_emptied_date_header_only() {
    let (tmp, mut store) = fixture_copy();
    let ada = store.get(date(6, 1, 2013), 1).unwrap();
    store.remove(&ada).unwrap();

    store.save_partition(date(6, 1, 2013)).unwrap();

    let written = fs::read_to_string(tmp.path().join("Orders_06012013.txt")).unwrap();
    assert_eq!(written, format!("{HEADER}\n"));
}

#[test]
fn save_leaves_no_temp_files() {
    let (tmp, mut store) = fixture_copy();

    store.save().unwrap();

    let leftovers: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn failed_rename_removes_temp_file() {
    let tmp = tempdir().unwrap();
    // A directory in the partition's place makes the final rename fail
    fs::create_dir(tmp.path().join("Orders_06012013.txt")).unwrap();
    let mut store = store_at(tmp.path());
    store.put(order(1, date(6, 1, 2013), "Ada"));

    let err = store.save_partition(date(6, 1, 2013)).unwrap_err();

    assert!(matches!(err, StoreError::Unavailable { .. }));
    assert!(!tmp.path().join("Orders_06012013.txt.tmp").exists());
}

#[test]
fn unsafe_product_is_refused_and_file_kept() {
    let (tmp, mut store) = fixture_copy();
    let mut bad = order(5, date(6, 1, 2013), "Grace");
    bad.product_type = "Tile,Grey".to_string();
    store.put(bad);

    let err = store.save_partition(date(6, 1, 2013)).unwrap_err();

    assert!(matches!(err, StoreError::UnsafeField { .. }));
    let unchanged = fs::read_to_string(tmp.path().join("Orders_06012013.txt")).unwrap();
    assert!(!unchanged.contains("Grace"));
}

#[test]
fn custom_delimiter_is_used_for_header_and_rows() {
    let tmp = tempdir().unwrap();
    let format = RecordFormat::new('|', '~').unwrap();
    let mut store = FileOrderStore::new(tmp.path(), format, layout());
    store.put(order(1, date(1, 2, 2020), "Pipe | Works"));

    store.save().unwrap();

    let written = fs::read_to_string(tmp.path().join("Orders_01022020.txt")).unwrap();
    assert!(written.starts_with("OrderNumber|CustomerName|"));
    assert!(written.contains("1|Pipe ~ Works|CA|"));

    let mut reloaded = FileOrderStore::new(tmp.path(), format, layout());
    reloaded.load().unwrap();
    assert_eq!(reloaded.get(date(1, 2, 2020), 1).unwrap().customer_name, "Pipe | Works");
}

// ── remove / numbering ──────────────────────────────────────────────────────

#[test]
fn remove_requires_matching_date() {
    let (_tmp, mut store) = fixture_copy();
    let mut ada = store.get(date(6, 1, 2013), 1).unwrap();
    ada.order_date = date(6, 2, 2013);

    let err = store.remove(&ada).unwrap_err();

    assert!(matches!(err, StoreError::OrderNotFound { .. }));
    assert_eq!(store.all().len(), 3);
}

#[test]
fn max_order_number_tracks_puts_and_removes() {
    let (_tmp, mut store) = fixture_copy();
    assert_eq!(store.max_order_number(), Some(3));

    store.put(order(10, date(6, 1, 2013), "Grace"));
    assert_eq!(store.max_order_number(), Some(10));

    let grace = store.get(date(6, 1, 2013), 10).unwrap();
    store.remove(&grace).unwrap();
    assert_eq!(store.max_order_number(), Some(3));
}

#[test]
fn put_replaces_same_number() {
    let (_tmp, mut store) = fixture_copy();
    let mut ada = store.get(date(6, 1, 2013), 1).unwrap();
    ada.customer_name = "Ada King".to_string();

    let replaced = store.put(ada).unwrap();

    assert_eq!(replaced.customer_name, "Ada Lovelace");
    assert_eq!(store.get(date(6, 1, 2013), 1).unwrap().customer_name, "Ada King");
}

// ── export ──────────────────────────────────────────────────────────────────

#[test]
fn export_writes_every_order_with_iso_date() {
    let (tmp, store) = fixture_copy();
    let destination = tmp.path().join("Backup").join("DataExport.txt");

    let count = store.export_all(&destination).unwrap();

    assert_eq!(count, 3);
    let exported = fs::read_to_string(&destination).unwrap();
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines[0], format!("{HEADER},OrderDate"));
    assert_eq!(
        lines[1],
        "1,Ada Lovelace,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21,2381.06,2013-06-01"
    );
    assert_eq!(
        lines[3],
        "3,Einstein/ Albert,KY,6.00,Carpet,217.00,2.25,2.10,488.25,455.70,56.64,1000.59,2013-06-02"
    );
    assert_eq!(lines.len(), 4);
}

#[test]
fn export_of_empty_store_is_header_only() {
    let tmp = tempdir().unwrap();
    let mut store = store_at(tmp.path());
    store.load().unwrap();
    let destination = tmp.path().join("export.txt");

    assert_eq!(store.export_all(&destination).unwrap(), 0);
    assert_eq!(
        fs::read_to_string(&destination).unwrap(),
        format!("{HEADER},OrderDate\n")
    );
}

#[test]
fn export_does_not_create_partitions() {
    let (tmp, store) = fixture_copy();

    store.export_all(&tmp.path().join("export.txt")).unwrap();

    assert_eq!(store.partition_dates(), vec![date(6, 1, 2013), date(6, 2, 2013)]);
}

// ── audit log ───────────────────────────────────────────────────────────────

#[test]
fn audit_log_appends_one_line_per_entry() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("logs").join("audit.txt");
    let mut log = FileAuditLog::new(&path);
    let at = date(6, 1, 2013).and_hms_milli_opt(9, 30, 0, 125).unwrap();

    log.record(&AuditEntry::new(at, AuditEvent::Created { order_number: 1 }))
        .unwrap();
    log.record(&AuditEntry::new(at, AuditEvent::Removed { order_number: 1 }))
        .unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "2013-06-01T09:30:00.125 : Order Number 1, CREATED\n\
         2013-06-01T09:30:00.125 : Order Number 1, REMOVED\n"
    );
}

#[test]
fn audit_log_in_unwritable_place_reports_unavailable() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("file");
    fs::write(&blocker, "").unwrap();
    let mut log = FileAuditLog::new(blocker.join("audit.txt"));
    let at = date(6, 1, 2013).and_hms_opt(9, 30, 0).unwrap();

    let err = log
        .record(&AuditEntry::new(at, AuditEvent::Exported { order_count: 0 }))
        .unwrap_err();

    assert!(matches!(err, floor_core::AuditError::Unavailable { .. }));
}

// ── properties ──────────────────────────────────────────────────────────────

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn saved_orders_reload_unchanged(
        name in "[A-Za-z ,.']{1,24}",
        area in money(),
        total in money(),
        day in 1u32..=28,
    ) {
        let format = RecordFormat::default();
        prop_assume!(format.accepts_name(&name));
        let tmp = tempdir().unwrap();
        let mut store = store_at(tmp.path());
        let mut original = order(1, date(3, day, 2021), &name);
        original.area = area;
        original.total = total;
        store.put(original.clone());

        store.save().unwrap();
        let mut reloaded = store_at(tmp.path());
        reloaded.load().unwrap();

        prop_assert_eq!(reloaded.all(), vec![original]);
    }
}
