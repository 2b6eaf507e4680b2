//! Command-line interface definitions (spec.md §9 ambient addition: a thin
//! `clap`-derived surface over the library's `app`/`core` wiring).

pub mod banner;
pub mod check;
pub mod output;
pub mod run;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// arbiscan -- cross-venue spot-market arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "arbiscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan pipeline (foreground, long-lived).
    Run(RunArgs),

    /// Show the latest published snapshot/opportunities from the status file.
    Status,

    /// Validate configuration or local health, without scanning.
    #[command(subcommand)]
    Check(CheckCommands),
}

#[derive(Subcommand, Debug)]
pub enum CheckCommands {
    /// Load and validate the configuration file.
    Config,
    /// Run local (non-network) health checks.
    Health,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Skip the startup banner.
    #[arg(long)]
    pub no_banner: bool,

    /// Use JSON log format instead of pretty.
    #[arg(long)]
    pub json_logs: bool,

    /// Override the configured trade size (USDT).
    #[arg(long)]
    pub trade_size_usdt: Option<Decimal>,

    /// Override the minimum spread threshold (percent).
    #[arg(long)]
    pub min_raw_spread_pct: Option<Decimal>,

    /// Override the minimum notional floor (USDT).
    #[arg(long)]
    pub min_trade_usdt: Option<Decimal>,

    /// Override the tick cadence (milliseconds).
    #[arg(long)]
    pub scan_interval_ms: Option<u64>,

    /// Override the per-tick batch size.
    #[arg(long)]
    pub scan_batch_size: Option<usize>,

    /// Enable debug counters (`ARB_DEBUG`).
    #[arg(long)]
    pub debug: bool,

    /// Override where the operator status file is written.
    #[arg(long)]
    pub status_file: Option<PathBuf>,
}
