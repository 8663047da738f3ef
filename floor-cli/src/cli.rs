use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::input::parse_date;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Flooring order management.
///
/// Each invocation loads the order files, runs one command and writes any
/// change back. Dates are entered as MM-DD-YYYY.
#[derive(Debug, Parser)]
#[command(name = "flooring", version, about)]
pub struct Cli {
    /// TOML configuration file. Defaults to ./flooring.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the per-date order files.
    #[arg(long, global = true)]
    pub orders_dir: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `floor_store=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the products that can be ordered.
    Products,

    /// List the states orders can be placed in.
    States,

    /// Show every order placed on a date.
    List {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Show one order.
    Show {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        number: u32,
    },

    /// Create an order.
    Add {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        name: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        product: String,
        /// Square feet, at least 100.
        #[arg(long)]
        area: Decimal,
        /// Print the calculated order without saving it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Change an order. Omitted fields keep their current value.
    Edit {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        area: Option<Decimal>,
        /// Print the recalculated order without saving it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete an order.
    Remove {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        number: u32,
    },

    /// Write every order to the export file.
    Export,
}
