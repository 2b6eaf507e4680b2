//! The long-lived tick loop (spec.md §4.5, §5): drives the Scan Scheduler at
//! a fixed-rate cadence, persists operator status after each tick, and exits
//! cooperatively on a shutdown signal that is only ever checked *between*
//! ticks, never mid-tick (spec.md §5: "a tick has no global deadline").

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::app::config::Config;
use crate::app::state::AppState;

/// Drives `AppState::scheduler` until told to stop.
pub struct Orchestrator {
    state: Arc<AppState>,
}

impl Orchestrator {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs ticks until `shutdown` carries `true`. The first tick fires
    /// immediately (spec.md §4.5: "Initial tick is executed immediately on
    /// start"); each subsequent tick is spaced by `scan_interval_ms` measured
    /// from the previous tick's completion, so a slow tick never overlaps
    /// the next one (spec.md §4.5, fixed-rate-without-overlap scheduling).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = Duration::from_millis(self.state.config.scan_interval_ms);
        let engine_config = self.state.config.engine_config();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let report = self.state.scheduler.tick(&engine_config, &self.state.distribution).await;
            let opportunities = self.state.distribution.get_latest_opportunities();

            self.state.status_writer.record_tick(
                report.symbols_in_universe,
                report.duration_ms,
                report.counters.pairs_checked,
                &opportunities.items,
            );
            if let Err(err) = self.state.status_writer.write() {
                warn!(error = %err, "failed to persist status file");
            }

            if self.state.config.debug {
                debug!(
                    tick = report.tick,
                    pairs_checked = report.counters.pairs_checked,
                    pairs_missing_ob = report.counters.pairs_missing_ob,
                    pairs_insufficient_fill = report.counters.pairs_insufficient_fill,
                    pairs_below_spread = report.counters.pairs_below_spread,
                    pairs_below_notional = report.counters.pairs_below_notional,
                    pairs_limits_fail = report.counters.pairs_limits_fail,
                    "tick counters"
                );
            }

            info!(
                tick = report.tick,
                symbols_in_universe = report.symbols_in_universe,
                batch_len = report.batch_len,
                opportunities = report.opportunities_found,
                duration_ms = report.duration_ms,
                "tick complete"
            );

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("orchestrator shutting down");
    }
}

/// Pass/fail status of one startup health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: &'static str,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn is_healthy(&self) -> bool {
        self.checks.iter().filter(|check| check.critical()).all(HealthCheck::is_healthy)
    }
}

/// Cheap, local checks on a loaded `Config` -- no network I/O, since the real
/// per-venue adapters are out of this crate's scope (spec.md §1). Mirrors
/// spec.md §7's "fatal at startup only" validation, surfaced for the `check
/// health` subcommand rather than aborting `Config::load` itself.
pub fn health_check(config: &Config) -> HealthReport {
    let mut checks = Vec::new();

    checks.push(HealthCheck {
        name: "venue_registry",
        critical: true,
        status: if config.scan_venues.is_empty() {
            HealthStatus::Unhealthy("no venues configured".to_string())
        } else {
            HealthStatus::Healthy
        },
    });

    checks.push(HealthCheck {
        name: "trade_size",
        critical: true,
        status: if config.trade_size_usdt <= rust_decimal::Decimal::ZERO {
            HealthStatus::Unhealthy("trade_size_usdt must be > 0".to_string())
        } else {
            HealthStatus::Healthy
        },
    });

    checks.push(HealthCheck {
        name: "scan_cadence",
        critical: true,
        status: if config.scan_interval_ms == 0 || config.scan_batch_size == 0 {
            HealthStatus::Unhealthy("scan_interval_ms and scan_batch_size must be > 0".to_string())
        } else {
            HealthStatus::Healthy
        },
    });

    checks.push(HealthCheck {
        name: "status_file_dir",
        critical: false,
        status: match config.status_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                if std::fs::create_dir_all(parent).is_ok() {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Unhealthy(format!("cannot create {}", parent.display()))
                }
            }
            _ => HealthStatus::Healthy,
        },
    });

    HealthReport { checks }
}
