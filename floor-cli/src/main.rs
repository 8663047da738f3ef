use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use floor_cli::app;
use floor_cli::cli::Cli;
use floor_cli::config::AppConfig;
use floor_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = AppConfig::discover(cli.config.as_deref(), &cwd)?
        .with_overrides(cli.orders_dir, cli.log_level);

    logging::init(&config.logging.level, config.logging.file.as_deref())?;
    debug!(?config, "configuration resolved");

    let mut stdout = io::stdout().lock();
    app::run(cli.command, &config, &mut stdout)
}
