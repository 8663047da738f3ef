use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use floor_core::{Committed, OrderDraft, OrderEdit, OrderService};
use floor_data::CatalogLoader;
use floor_store::{
    DEFAULT_EXTENSION, DEFAULT_PREFIX, FileAuditLog, FileOrderStore, PartitionLayout,
};
use tracing::{debug, warn};

use crate::cli::Command;
use crate::config::AppConfig;
use crate::display;

/// The lifecycle service over the file store and file audit log.
pub type FileService = OrderService<FileOrderStore, FileAuditLog>;

/// Load reference data and orders as configured.
pub fn open_service(config: &AppConfig) -> Result<FileService> {
    let format = config.record_format().context("invalid [format] settings")?;
    let layout = PartitionLayout::new(DEFAULT_PREFIX, DEFAULT_EXTENSION)?;

    let catalog = CatalogLoader::new(format.delimiter() as u8)
        .load(&config.paths.products_file, &config.paths.states_file)
        .context("Failed to load reference data")?;
    if catalog.products().is_empty() || catalog.states().is_empty() {
        warn!("reference data has no products or no states; orders cannot be created");
    }

    let orders_dir = &config.paths.orders_dir;
    fs::create_dir_all(orders_dir)
        .with_context(|| format!("Failed to create orders directory '{}'", orders_dir.display()))?;

    let store = FileOrderStore::new(orders_dir, format, layout);
    let audit = FileAuditLog::new(&config.paths.audit_file);
    debug!(dir = %orders_dir.display(), "opening order store");

    OrderService::open(store, audit, catalog, config.service_options())
        .with_context(|| format!("Failed to load orders from '{}'", orders_dir.display()))
}

/// Run one command as a whole session: open, execute, save on change.
pub fn run<W: Write>(
    command: Command,
    config: &AppConfig,
    out: &mut W,
) -> Result<()> {
    let mut service = open_service(config)?;
    let changed = execute(&mut service, command, out)?;
    if changed {
        service.shutdown().context("Failed to save orders")?;
    }
    Ok(())
}

/// Execute `command` against an open service. Returns whether anything was
/// changed that needs saving.
pub fn execute<W: Write>(
    service: &mut FileService,
    command: Command,
    out: &mut W,
) -> Result<bool> {
    match command {
        Command::Products => {
            write!(out, "{}", display::product_table(&service.products()))?;
            Ok(false)
        }
        Command::States => {
            write!(out, "{}", display::state_table(&service.catalog().states()))?;
            Ok(false)
        }
        Command::List { date } => {
            let orders = service.list_for_date(date)?;
            writeln!(out, "Orders for {}", display::us_date(date))?;
            write!(out, "{}", display::order_table(&orders))?;
            Ok(false)
        }
        Command::Show { date, number } => {
            let order = service.get(date, number)?;
            write!(out, "{}", display::order_details(&order))?;
            Ok(false)
        }
        Command::Add {
            date,
            name,
            state,
            product,
            area,
            dry_run,
        } => {
            let draft = OrderDraft {
                order_date: date,
                customer_name: name,
                state,
                product_type: product,
                area,
            };
            let order = service.calculate(&draft)?;
            write!(out, "{}", display::order_details(&order))?;
            if dry_run {
                writeln!(out, "Dry run: order not saved.")?;
                return Ok(false);
            }
            let committed = service.add(order)?;
            report(out, &committed, |o| format!("Order #{} saved.", o.order_number))?;
            Ok(true)
        }
        Command::Edit {
            date,
            number,
            name,
            state,
            product,
            area,
            dry_run,
        } => {
            let original = service.get(date, number)?;
            let current = OrderEdit::from(&original);
            let candidate = OrderEdit {
                customer_name: name.unwrap_or(current.customer_name),
                state: state.unwrap_or(current.state),
                product_type: product.unwrap_or(current.product_type),
                area: area.unwrap_or(current.area),
            };
            let edited = service.edit(&original, &candidate)?;
            write!(out, "{}", display::order_details(&edited))?;
            if dry_run {
                writeln!(out, "Dry run: changes not saved.")?;
                return Ok(false);
            }
            let committed = service.confirm_edit(edited)?;
            report(out, &committed, |o| format!("Order #{} updated.", o.order_number))?;
            Ok(true)
        }
        Command::Remove { date, number } => {
            let committed = service.remove(date, number)?;
            report(out, &committed, |o| format!("Order #{} removed.", o.order_number))?;
            Ok(true)
        }
        Command::Export => {
            let committed = service.export_all()?;
            report(out, &committed, |count| format!("Exported {count} orders."))?;
            Ok(false)
        }
    }
}

fn report<W: Write, T>(
    out: &mut W,
    committed: &Committed<T>,
    message: impl FnOnce(&T) -> String,
) -> Result<()> {
    writeln!(out, "{}", message(&committed.value))?;
    if let Some(warning) = &committed.audit_warning {
        writeln!(out, "Warning: the change was kept but not audited: {warning}")?;
    }
    Ok(())
}
