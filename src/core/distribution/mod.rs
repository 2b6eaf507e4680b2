use std::sync::Arc;

use tokio::sync::broadcast;

use crate::core::domain::{OpportunitiesSet, Snapshot};
use crate::core::store::SnapshotStore;

/// Default channel capacity for the opportunity-update broadcast. Sized
/// generously above one tick's worth so a briefly-lagging subscriber still
/// sees the next few ticks rather than an immediate `Lagged` error.
const BROADCAST_CAPACITY: usize = 16;

/// Wraps a `SnapshotStore` with the two pull reads named in spec.md §4.8 plus
/// a push `broadcast` channel for `opportunityUpdate`. A slow or absent
/// subscriber never blocks the scanner: `tokio::sync::broadcast` drops the
/// oldest buffered message for a lagging receiver rather than stalling the
/// sender (spec.md §5, "Backpressure").
pub struct Distribution {
    store: Arc<SnapshotStore>,
    sender: broadcast::Sender<Arc<OpportunitiesSet>>,
}

impl Distribution {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { store, sender }
    }

    pub fn get_latest_snapshot(&self) -> Arc<Snapshot> {
        self.store.latest_snapshot()
    }

    pub fn get_latest_opportunities(&self) -> Arc<OpportunitiesSet> {
        self.store.latest_opportunities()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<OpportunitiesSet>> {
        self.sender.subscribe()
    }

    /// Publishes a freshly-computed tick's results: updates the store, then
    /// notifies subscribers with the whole ranked list (not a diff), per
    /// spec.md §4.8. Called by the scheduler after each tick.
    pub fn publish(&self, snapshot: Snapshot, opportunities: OpportunitiesSet) {
        self.store.publish_snapshot(snapshot);
        let published = Arc::new(opportunities);
        self.store.publish_opportunities((*published).clone());
        // A send error only means there are currently no subscribers; that is
        // not a failure the scanner needs to react to.
        let _ = self.sender.send(published);
    }
}
