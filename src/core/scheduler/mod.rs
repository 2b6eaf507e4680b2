use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info_span, Instrument};

use crate::core::distribution::Distribution;
use crate::core::domain::{AllData, OpportunitiesSet, Snapshot, Symbol, VenueId};
use crate::core::engine::{compute_opportunities, EngineConfig, EngineCounters};
use crate::core::exchange::ExchangeRegistry;
use crate::core::fetch::PairFetcher;
use crate::core::markets::MarketsCache;
use crate::core::universe::common_usdt_symbols;

/// Scheduling knobs (spec.md §4.5). `per_venue_concurrency` is an ambient
/// addition (spec.md §5 names the bound, not its size): it caps how many
/// Pair Fetches run concurrently against a single venue within one tick, so
/// a `batch × venues` fan-out never overwhelms one adapter's own rate
/// limiter even when the batch is large.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub scan_interval_ms: u64,
    pub batch_size: usize,
    pub scan_venues: Vec<VenueId>,
    pub per_venue_concurrency: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 3000,
            batch_size: 30,
            scan_venues: VenueId::ALL.to_vec(),
            per_venue_concurrency: 4,
        }
    }
}

/// Outcome of one tick, carried for logging and the orchestrator's own
/// bookkeeping; not part of the published `Snapshot`/`OpportunitiesSet`.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub symbols_in_universe: usize,
    pub batch_len: usize,
    pub duration_ms: u128,
    pub counters: EngineCounters,
    pub opportunities_found: usize,
}

/// Round-robin batch driver over the symbol universe (spec.md §4.5): computes
/// the universe once, fans out `batch × venues` Pair Fetches bounded by a
/// per-venue semaphore, runs the Opportunity Engine, and publishes through a
/// `Distribution`.
pub struct ScanScheduler {
    registry: Arc<ExchangeRegistry>,
    markets: Arc<MarketsCache>,
    config: SchedulerConfig,
    universe: RwLock<Option<Vec<Symbol>>>,
    cursor: AtomicUsize,
    tick_counter: AtomicU64,
    semaphores: BTreeMap<VenueId, Arc<Semaphore>>,
}

impl ScanScheduler {
    pub fn new(registry: Arc<ExchangeRegistry>, markets: Arc<MarketsCache>, config: SchedulerConfig) -> Self {
        let semaphores = config
            .scan_venues
            .iter()
            .map(|&venue| (venue, Arc::new(Semaphore::new(config.per_venue_concurrency))))
            .collect();
        Self {
            registry,
            markets,
            config,
            universe: RwLock::new(None),
            cursor: AtomicUsize::new(0),
            tick_counter: AtomicU64::new(0),
            semaphores,
        }
    }

    /// Runs one tick and publishes its results to `distribution`. Step 5 of
    /// spec.md §4.5 ("the tick must complete regardless of partial
    /// failures") holds because every Pair Fetch failure is absorbed into
    /// `AllData` simply by omission -- nothing here propagates a fetch error.
    pub async fn tick(&self, engine_config: &EngineConfig, distribution: &Distribution) -> TickReport {
        let started = Instant::now();
        let tick_id = self.tick_counter.fetch_add(1, Ordering::SeqCst);

        let universe = self.ensure_universe().await;
        if universe.is_empty() {
            return TickReport { tick: tick_id, ..Default::default() };
        }

        let batch = self.next_batch(&universe);
        let span = info_span!("scan_tick", tick = tick_id, batch_len = batch.len(), symbols_in_universe = universe.len());

        async move {
            let all_data = self.fetch_batch(&batch).await;
            let now = Utc::now();
            let (opportunities, counters) = compute_opportunities(&all_data, engine_config, now);

            let pairs_ok = counters.pairs_ok;
            let opportunities_found = opportunities.len();

            distribution.publish(
                Snapshot { timestamp: now, data: all_data },
                OpportunitiesSet { timestamp: now, items: opportunities },
            );

            debug!(
                pairs_checked = counters.pairs_checked,
                pairs_ok,
                pairs_missing_ob = counters.pairs_missing_ob,
                pairs_insufficient_fill = counters.pairs_insufficient_fill,
                pairs_below_spread = counters.pairs_below_spread,
                pairs_below_notional = counters.pairs_below_notional,
                pairs_limits_fail = counters.pairs_limits_fail,
                "tick counters"
            );

            TickReport {
                tick: tick_id,
                symbols_in_universe: universe.len(),
                batch_len: batch.len(),
                duration_ms: started.elapsed().as_millis(),
                counters,
                opportunities_found,
            }
        }
        .instrument(span)
        .await
    }

    /// Computes the universe once, on first call; later ticks reuse it
    /// (spec.md §4.5 step 1, "if the universe is unknown, compute it once").
    async fn ensure_universe(&self) -> Vec<Symbol> {
        {
            let cached = self.universe.read().await;
            if let Some(universe) = cached.as_ref() {
                return universe.clone();
            }
        }

        let mut guard = self.universe.write().await;
        if let Some(universe) = guard.as_ref() {
            return universe.clone();
        }

        let mut per_venue = BTreeMap::new();
        for &venue in &self.config.scan_venues {
            if let Some(adapter) = self.registry.get(venue) {
                let markets = self.markets.get_or_load(venue, adapter.as_ref()).await;
                per_venue.insert(venue, markets);
            }
        }
        let universe: Vec<Symbol> = common_usdt_symbols(&per_venue).into_iter().collect();
        *guard = Some(universe.clone());
        universe
    }

    fn next_batch(&self, universe: &[Symbol]) -> Vec<Symbol> {
        let len = universe.len();
        let start = self.cursor.load(Ordering::SeqCst).min(len);
        let end = (start + self.config.batch_size).min(len);
        let next = if end >= len { 0 } else { end };
        self.cursor.store(next, Ordering::SeqCst);
        universe[start..end].to_vec()
    }

    /// Fans out `batch × scan_venues` Pair Fetches, each bounded by its
    /// venue's semaphore, and aggregates successes into `AllData`. A symbol
    /// with no successful venue is dropped entirely (spec.md §4.5 step 3).
    async fn fetch_batch(&self, batch: &[Symbol]) -> AllData {
        let mut joins = JoinSet::new();

        for symbol in batch {
            for &venue in &self.config.scan_venues {
                let registry = self.registry.clone();
                let markets = self.markets.clone();
                let semaphore = self.semaphores.get(&venue).cloned();
                let symbol = symbol.clone();

                joins.spawn(async move {
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let fetcher = PairFetcher::new(&registry, &markets);
                    let result = fetcher.fetch(venue, &symbol).await;
                    (symbol, venue, result)
                });
            }
        }

        let mut data: AllData = BTreeMap::new();
        while let Some(joined) = joins.join_next().await {
            let Ok((symbol, venue, result)) = joined else { continue };
            if let Ok(snapshot) = result {
                if snapshot.is_well_formed() {
                    data.entry(symbol).or_default().insert(venue, snapshot);
                }
            }
        }

        data.retain(|_, venues| !venues.is_empty());
        data
    }
}
