//! Status file for external monitoring.
//!
//! Writes a JSON status file that external tools can poll to monitor the
//! health and activity of a running scanner instance.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;

use tabled::Tabled;

use crate::core::domain::{Opportunity, VenueId};
use crate::error::Result;

const STATUS_VERSION: &str = "1";
/// How many ranked opportunities to carry into the status file for the
/// `cli status` table -- the full list is already available to a live
/// subscriber via `Distribution::subscribe`, so the file only needs enough
/// to give an operator a glance at the board.
const TOP_OPPORTUNITIES_LIMIT: usize = 10;

/// Top-level status file structure.
#[derive(Debug, Clone, Serialize)]
pub struct StatusFile {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub pid: u32,
    pub config: StatusConfig,
    pub runtime: StatusRuntime,
    pub today: StatusToday,
    pub top_opportunities: Vec<OpportunityRow>,
    pub updated_at: DateTime<Utc>,
}

/// Compact, tabled-friendly projection of an `Opportunity`, persisted so the
/// `cli status` subcommand -- a separate process invocation with no handle
/// to the running scanner's `Distribution` -- can still render the same
/// ranked board spec.md §4.8 describes as `opportunityUpdate`'s payload.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct OpportunityRow {
    #[tabled(rename = "symbol")]
    pub symbol: String,
    #[tabled(rename = "buy")]
    pub buy_venue: String,
    #[tabled(rename = "sell")]
    pub sell_venue: String,
    #[tabled(rename = "spread %")]
    pub spread_pct: Decimal,
    #[tabled(rename = "net profit %")]
    pub net_profit_pct: Decimal,
}

impl From<&Opportunity> for OpportunityRow {
    fn from(opp: &Opportunity) -> Self {
        Self {
            symbol: opp.symbol.clone().into(),
            buy_venue: opp.buy_venue.as_str().to_string(),
            sell_venue: opp.sell_venue.as_str().to_string(),
            spread_pct: opp.spread_pct,
            net_profit_pct: opp.net_profit_pct,
        }
    }
}

/// Static configuration snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatusConfig {
    pub scan_interval_ms: u64,
    pub scan_batch_size: usize,
    pub scan_venues: Vec<String>,
    pub trade_size_usdt: Decimal,
    pub debug: bool,
}

/// Runtime state information.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusRuntime {
    pub symbols_in_universe: usize,
    pub last_tick_duration_ms: u128,
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Today's activity counters (reset daily).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusToday {
    pub ticks_completed: u64,
    pub opportunities_published: u64,
    pub pairs_checked: u64,
}

/// Writer for the status file.
///
/// Thread-safe wrapper that manages atomic updates to the status file.
pub struct StatusWriter {
    path: PathBuf,
    status: Mutex<StatusFile>,
}

impl StatusWriter {
    #[must_use]
    pub fn new(path: PathBuf, config: StatusConfig) -> Self {
        let now = Utc::now();
        let status = StatusFile {
            version: STATUS_VERSION.to_string(),
            started_at: now,
            pid: std::process::id(),
            config,
            runtime: StatusRuntime::default(),
            today: StatusToday::default(),
            top_opportunities: Vec::new(),
            updated_at: now,
        };

        Self { path, status: Mutex::new(status) }
    }

    /// Write the current status to the file atomically (write-temp-then-rename).
    pub fn write(&self) -> Result<()> {
        let json = {
            let mut status = self.status.lock();
            status.updated_at = Utc::now();
            serde_json::to_string_pretty(&*status)?
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    /// Record one completed tick's runtime facts, carrying forward the
    /// top-ranked opportunities (already sorted by `compute_opportunities`)
    /// for `cli status` to render.
    pub fn record_tick(
        &self,
        symbols_in_universe: usize,
        duration_ms: u128,
        pairs_checked: u64,
        opportunities: &[Opportunity],
    ) {
        let mut status = self.status.lock();
        status.runtime.symbols_in_universe = symbols_in_universe;
        status.runtime.last_tick_duration_ms = duration_ms;
        status.runtime.last_tick_at = Some(Utc::now());
        status.today.ticks_completed += 1;
        status.today.pairs_checked += pairs_checked;
        status.today.opportunities_published += opportunities.len() as u64;
        status.top_opportunities =
            opportunities.iter().take(TOP_OPPORTUNITIES_LIMIT).map(OpportunityRow::from).collect();
    }
}

pub fn venue_names(venues: &[VenueId]) -> Vec<String> {
    venues.iter().map(|v| v.as_str().to_string()).collect()
}
