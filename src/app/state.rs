use std::sync::Arc;

use crate::app::config::Config;
use crate::app::status_file::{venue_names, StatusConfig, StatusWriter};
use crate::core::{Distribution, ExchangeRegistry, MarketsCache, ScanScheduler, SnapshotStore};

/// Everything the orchestrator and the CLI subcommands need a handle to,
/// wired once at startup (spec.md §2: "Configuration is injected at
/// startup; no component mutates global state other than the Markets Cache
/// ... and the Snapshot Store").
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ExchangeRegistry>,
    pub markets: Arc<MarketsCache>,
    pub scheduler: Arc<ScanScheduler>,
    pub distribution: Arc<Distribution>,
    pub status_writer: Arc<StatusWriter>,
}

impl AppState {
    /// Wires every component named in spec.md §2 from a validated `Config`
    /// and a pre-built venue registry. The status-file path is read from
    /// `config.status_file` so callers (the CLI, tests) only ever construct
    /// one `Config`.
    pub fn bootstrap(config: Config, registry: ExchangeRegistry) -> Self {
        let registry = Arc::new(registry);
        let markets = Arc::new(MarketsCache::new());
        let scheduler = Arc::new(ScanScheduler::new(registry.clone(), markets.clone(), config.scheduler_config()));
        let store = Arc::new(SnapshotStore::new());
        let distribution = Arc::new(Distribution::new(store));

        let status_config = StatusConfig {
            scan_interval_ms: config.scan_interval_ms,
            scan_batch_size: config.scan_batch_size,
            scan_venues: venue_names(&config.scan_venues),
            trade_size_usdt: config.trade_size_usdt,
            debug: config.debug,
        };
        let status_writer = Arc::new(StatusWriter::new(config.status_file.clone(), status_config));

        Self { config, registry, markets, scheduler, distribution, status_writer }
    }
}
