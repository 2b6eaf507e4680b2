//! Pure domain types shared across the scan pipeline: venues, symbols,
//! market metadata, order-book levels, per-pair snapshots and the final
//! opportunity record. Nothing in this module performs I/O.

pub mod level;
pub mod market;
pub mod opportunity;
pub mod published;
pub mod snapshot;
pub mod symbol;
pub mod venue;

pub use level::{Level, OrderBookSide};
pub use market::{Limits, MarketMeta, Precision};
pub use opportunity::{Estimates, Opportunity, OpportunityFees, OpportunityLimits, Risk, SideLimits, Slippage};
pub use published::{OpportunitiesSet, Snapshot};
pub use snapshot::{AllData, FeesBlock, OrderBookBlock, PairSnapshot, PriceBlock};
pub use symbol::Symbol;
pub use venue::VenueId;
