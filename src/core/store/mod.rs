use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::core::domain::{OpportunitiesSet, Snapshot};

/// Single-writer, many-reader holder of the latest `Snapshot` and
/// `OpportunitiesSet` (spec.md §4.7). Each publish swaps an `Arc` under its
/// own lock, so a reader observes either the old or the new value in full --
/// never a half-written one (spec.md §8 Testable Property 8,
/// "publication-atomic"). No history is retained.
pub struct SnapshotStore {
    snapshot: RwLock<Arc<Snapshot>>,
    opportunities: RwLock<Arc<OpportunitiesSet>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty(now))),
            opportunities: RwLock::new(Arc::new(OpportunitiesSet::empty(now))),
        }
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_snapshot(&self, snapshot: Snapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }

    pub fn publish_opportunities(&self, opportunities: OpportunitiesSet) {
        *self.opportunities.write() = Arc::new(opportunities);
    }

    pub fn latest_snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn latest_opportunities(&self) -> Arc<OpportunitiesSet> {
        self.opportunities.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Symbol;
    use std::collections::BTreeMap;

    #[test]
    fn starts_with_sentinel_empty_state() {
        let store = SnapshotStore::new();
        assert!(store.latest_snapshot().data.is_empty());
        assert!(store.latest_opportunities().items.is_empty());
    }

    #[test]
    fn publish_replaces_whole_object() {
        let store = SnapshotStore::new();
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.data.insert(Symbol::new("BTC/USDT").unwrap(), BTreeMap::new());
        store.publish_snapshot(snapshot);
        assert_eq!(store.latest_snapshot().data.len(), 1);

        let fresh = Snapshot::empty(Utc::now());
        store.publish_snapshot(fresh);
        assert!(store.latest_snapshot().data.is_empty());
    }
}
