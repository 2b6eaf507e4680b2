use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{AdapterFail, AdapterOutcome, ExchangeAdapter, RawOrderBook, Ticker};
use crate::core::domain::{MarketMeta, Symbol};

/// An in-memory, programmable `ExchangeAdapter` double. Used by this crate's
/// own test suite, and available under the `testkit` feature for anyone
/// exercising the scheduler/engine without a real venue HTTP client --
/// wiring a real client behind `ExchangeAdapter` is out of scope (spec.md §1).
#[derive(Default)]
pub struct SimulatedAdapter {
    markets: RwLock<BTreeMap<Symbol, MarketMeta>>,
    tickers: RwLock<BTreeMap<Symbol, Ticker>>,
    order_books: RwLock<BTreeMap<Symbol, RawOrderBook>>,
    forced_failures: RwLock<BTreeMap<Symbol, AdapterFail>>,
}

impl SimulatedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_market(&mut self, symbol: Symbol, meta: MarketMeta) {
        self.markets.write().insert(symbol, meta);
    }

    pub fn set_ticker(&mut self, symbol: Symbol, ticker: Ticker) {
        self.tickers.write().insert(symbol, ticker);
    }

    pub fn set_order_book(&mut self, symbol: Symbol, book: RawOrderBook) {
        self.order_books.write().insert(symbol, book);
    }

    /// Make the next call for `symbol` (ticker or order book) fail with
    /// `fail`, simulating a transient adapter error for that one pair.
    pub fn force_failure(&mut self, symbol: Symbol, fail: AdapterFail) {
        self.forced_failures.write().insert(symbol, fail);
    }
}

#[async_trait]
impl ExchangeAdapter for SimulatedAdapter {
    async fn load_markets(&self) -> AdapterOutcome<BTreeMap<Symbol, MarketMeta>> {
        Ok(self.markets.read().clone())
    }

    async fn fetch_ticker(&self, symbol: &Symbol) -> AdapterOutcome<Ticker> {
        if let Some(fail) = self.forced_failures.read().get(symbol) {
            return Err(fail.clone());
        }
        self.tickers
            .read()
            .get(symbol)
            .copied()
            .ok_or_else(|| AdapterFail::Network(format!("no ticker fixture for {symbol}")))
    }

    async fn fetch_order_book(&self, symbol: &Symbol, depth: usize) -> AdapterOutcome<RawOrderBook> {
        if let Some(fail) = self.forced_failures.read().get(symbol) {
            return Err(fail.clone());
        }
        let mut book = self
            .order_books
            .read()
            .get(symbol)
            .cloned()
            .ok_or_else(|| AdapterFail::Network(format!("no order book fixture for {symbol}")))?;
        book.bids.truncate(depth);
        book.asks.truncate(depth);
        Ok(book)
    }
}
