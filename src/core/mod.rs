//! The scan pipeline: symbol-universe discovery, fan-out market-data
//! acquisition, the opportunity engine, and the snapshot store/distribution
//! surface (spec.md §2). Everything here is venue-agnostic; `domain` and
//! `exchange` define the seams the rest builds on.

pub mod distribution;
pub mod domain;
pub mod engine;
pub mod exchange;
pub mod fetch;
pub mod markets;
pub mod scheduler;
pub mod store;
pub mod universe;

pub use distribution::Distribution;
pub use engine::{compute_opportunities, EngineConfig, EngineCounters};
pub use exchange::ExchangeRegistry;
pub use fetch::{PairFetchError, PairFetcher};
pub use markets::MarketsCache;
pub use scheduler::{ScanScheduler, SchedulerConfig, TickReport};
pub use store::SnapshotStore;
