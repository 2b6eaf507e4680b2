use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::domain::{Level, MarketMeta, Symbol};

/// Why an adapter call failed to produce a value. All three are `Transient`
/// in the taxonomy of spec.md §7: the adapter never signals failure to its
/// caller except through this sum, and the caller (the rate-limit wrapper,
/// then the Pair Fetcher) decides what, if anything, to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterFail {
    RateLimited,
    Timeout,
    Network(String),
}

impl fmt::Display for AdapterFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterFail::RateLimited => write!(f, "rate limited"),
            AdapterFail::Timeout => write!(f, "timed out"),
            AdapterFail::Network(detail) => write!(f, "network error: {detail}"),
        }
    }
}

impl std::error::Error for AdapterFail {}

pub type AdapterOutcome<T> = Result<T, AdapterFail>;

/// A normalized ticker reading (spec.md §4.1, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub base_volume: Decimal,
    /// The ticker's raw `percentage` field; treated as an opaque magnitude
    /// (spec.md §9).
    pub percentage: Decimal,
}

/// Raw, unfiltered order-book levels as returned by the venue (spec.md §4.1).
/// The Pair Fetcher is responsible for truncation/validation into an
/// `OrderBookSide`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOrderBook {
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

/// The per-venue facade named but not designed by spec.md §4.1: `loadMarkets`,
/// `fetchTicker`, `fetchOrderBook`. A real implementation wraps a venue's
/// HTTP SDK; that wrapping is out of this crate's scope (spec.md §1). This
/// trait is the seam a production build plugs venue clients into.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    async fn load_markets(&self) -> AdapterOutcome<BTreeMap<Symbol, MarketMeta>>;
    async fn fetch_ticker(&self, symbol: &Symbol) -> AdapterOutcome<Ticker>;
    async fn fetch_order_book(&self, symbol: &Symbol, depth: usize) -> AdapterOutcome<RawOrderBook>;
}
