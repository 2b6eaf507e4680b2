//! The Exchange Adapter contract (spec.md §4.1): a per-venue facade plus a
//! rate-limit/timeout/retry decorator, a registry keyed by `VenueId`, and an
//! in-memory test double. Real venue HTTP clients are out of scope.

pub mod limiter;
pub mod registry;
pub mod simulated;
pub mod traits;

pub use limiter::RateLimited;
pub use registry::ExchangeRegistry;
pub use simulated::SimulatedAdapter;
pub use traits::{AdapterFail, AdapterOutcome, ExchangeAdapter, RawOrderBook, Ticker};
