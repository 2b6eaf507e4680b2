use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::core::domain::{MarketMeta, Symbol, VenueId};
use crate::core::exchange::ExchangeAdapter;

/// Process-wide `(venue) -> (symbol -> MarketMeta)`, populated lazily from
/// the adapter and cached for the process lifetime; no TTL, a process
/// restart is the only refresh (spec.md §4.2). Concurrent first callers for
/// the *same* venue are serialized by a per-venue `OnceCell` so the first
/// successful `loadMarkets` wins without a lock across unrelated venues
/// (spec.md §5).
#[derive(Default)]
pub struct MarketsCache {
    entries: DashMap<VenueId, Arc<OnceCell<BTreeMap<Symbol, MarketMeta>>>>,
}

impl MarketsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached markets for `venue`, loading them via `adapter` on
    /// first access. A failed load is cached as an empty map, matching
    /// spec.md §4.2's "possibly empty on failure".
    pub async fn get_or_load(
        &self,
        venue: VenueId,
        adapter: &dyn ExchangeAdapter,
    ) -> BTreeMap<Symbol, MarketMeta> {
        let cell = self
            .entries
            .entry(venue)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        cell.get_or_init(|| async {
            adapter.load_markets().await.unwrap_or_default()
        })
        .await
        .clone()
    }

    /// Returns the cached markets for `venue` without triggering a load.
    pub fn peek(&self, venue: VenueId) -> Option<BTreeMap<Symbol, MarketMeta>> {
        self.entries.get(&venue).and_then(|cell| cell.get().cloned())
    }

    pub fn is_loaded(&self, venue: VenueId) -> bool {
        self.entries.get(&venue).map(|cell| cell.initialized()).unwrap_or(false)
    }
}
