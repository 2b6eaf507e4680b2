use std::fmt;

use rust_decimal::Decimal;

use crate::core::domain::{FeesBlock, Level, OrderBookBlock, OrderBookSide, PairSnapshot, PriceBlock, Symbol, VenueId};
use crate::core::exchange::{ExchangeAdapter, ExchangeRegistry};
use crate::core::markets::MarketsCache;

/// One error kind per sequenced step of spec.md §4.4. `Semantic` failures
/// (`UnknownSymbol`, `Inactive`, `NotSpot`) and `DataIntegrity` are excluded
/// from a tick without retry; `Configurational` (`UnsupportedVenue`) is
/// fatal only at startup, a runtime occurrence just skips the venue
/// (spec.md §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairFetchError {
    UnsupportedVenue,
    MarketsUnavailable,
    UnknownSymbol,
    Inactive,
    NotSpot,
    TickerUnavailable,
    OrderBookUnavailable,
    DataIntegrity(&'static str),
}

impl fmt::Display for PairFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairFetchError::UnsupportedVenue => write!(f, "unsupported venue"),
            PairFetchError::MarketsUnavailable => write!(f, "markets unavailable"),
            PairFetchError::UnknownSymbol => write!(f, "unknown symbol"),
            PairFetchError::Inactive => write!(f, "market inactive"),
            PairFetchError::NotSpot => write!(f, "not a spot market"),
            PairFetchError::TickerUnavailable => write!(f, "ticker unavailable"),
            PairFetchError::OrderBookUnavailable => write!(f, "order book unavailable"),
            PairFetchError::DataIntegrity(reason) => write!(f, "data integrity: {reason}"),
        }
    }
}

impl std::error::Error for PairFetchError {}

/// Depth requested per side of the order book (spec.md §3: up to N=20 levels).
pub const ORDER_BOOK_DEPTH: usize = 20;

/// Produces a `PairSnapshot` for one `(venue, symbol)`, or a typed error for
/// every way that can fail (spec.md §4.4).
pub struct PairFetcher<'a> {
    pub registry: &'a ExchangeRegistry,
    pub markets: &'a MarketsCache,
}

impl<'a> PairFetcher<'a> {
    pub fn new(registry: &'a ExchangeRegistry, markets: &'a MarketsCache) -> Self {
        Self { registry, markets }
    }

    pub async fn fetch(&self, venue: VenueId, symbol: &Symbol) -> Result<PairSnapshot, PairFetchError> {
        let adapter = self.registry.get(venue).ok_or(PairFetchError::UnsupportedVenue)?;

        let markets = self.markets.get_or_load(venue, adapter.as_ref()).await;
        if markets.is_empty() {
            return Err(PairFetchError::MarketsUnavailable);
        }
        let meta = markets.get(symbol).ok_or(PairFetchError::UnknownSymbol)?;
        if !meta.active {
            return Err(PairFetchError::Inactive);
        }
        if !meta.spot {
            return Err(PairFetchError::NotSpot);
        }

        let ticker = adapter
            .fetch_ticker(symbol)
            .await
            .map_err(|_| PairFetchError::TickerUnavailable)?;
        let raw_book = adapter
            .fetch_order_book(symbol, ORDER_BOOK_DEPTH)
            .await
            .map_err(|_| PairFetchError::OrderBookUnavailable)?;

        if ticker.bid <= Decimal::ZERO || ticker.ask <= Decimal::ZERO {
            return Err(PairFetchError::DataIntegrity("non-positive ticker price"));
        }

        let bids = sorted_side(raw_book.bids, false);
        let asks = sorted_side(raw_book.asks, true);
        let best_bid = bids.top().map(|l| l.price);
        let best_ask = asks.top().map(|l| l.price);

        if bids.is_empty() || asks.is_empty() {
            return Err(PairFetchError::DataIntegrity("empty order-book side"));
        }
        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            if ask < bid {
                return Err(PairFetchError::DataIntegrity("crossed book"));
            }
        }

        Ok(PairSnapshot {
            symbol: symbol.clone(),
            venue,
            price: PriceBlock {
                last: ticker.last,
                bid: ticker.bid,
                ask: ticker.ask,
                spread: ticker.ask - ticker.bid,
                volume: ticker.base_volume,
                change_pct: ticker.percentage,
            },
            orderbook: OrderBookBlock { best_bid, best_ask, bids, asks },
            fees: FeesBlock {
                maker: meta.maker_fee,
                taker: meta.taker_fee,
                withdrawal: None,
                deposit: Decimal::ZERO,
                network: Decimal::ZERO,
            },
            limits: meta.limits,
            precision: meta.precision,
        })
    }
}

/// Sorts raw levels into book order (asks ascending, bids descending) before
/// handing them to `OrderBookSide::from_levels`, which applies the
/// validation/truncation invariants of spec.md §3.
fn sorted_side(mut levels: Vec<Level>, ascending: bool) -> OrderBookSide {
    if ascending {
        levels.sort_by(|a, b| a.price.cmp(&b.price));
    } else {
        levels.sort_by(|a, b| b.price.cmp(&a.price));
    }
    OrderBookSide::from_levels(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Limits, MarketMeta, Precision};
    use crate::core::exchange::{AdapterFail, SimulatedAdapter, Ticker};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn meta(active: bool, spot: bool) -> MarketMeta {
        MarketMeta {
            active,
            spot,
            maker_fee: dec!(0.001),
            taker_fee: dec!(0.001),
            limits: Limits::default(),
            precision: Precision::default(),
        }
    }

    fn ticker(bid: Decimal, ask: Decimal) -> Ticker {
        Ticker { last: ask, bid, ask, base_volume: dec!(100), percentage: dec!(0) }
    }

    fn book(bids: Vec<Level>, asks: Vec<Level>) -> crate::core::exchange::RawOrderBook {
        crate::core::exchange::RawOrderBook { bids, asks }
    }

    async fn fetch_for(adapter: SimulatedAdapter, symbol: &Symbol) -> Result<PairSnapshot, PairFetchError> {
        let mut registry = ExchangeRegistry::new();
        registry.register(VenueId::Binance, Arc::new(adapter));
        let markets = MarketsCache::new();
        PairFetcher::new(&registry, &markets).fetch(VenueId::Binance, symbol).await
    }

    #[tokio::test]
    async fn unsupported_venue_when_registry_empty() {
        let registry = ExchangeRegistry::new();
        let markets = MarketsCache::new();
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let result = PairFetcher::new(&registry, &markets).fetch(VenueId::Binance, &symbol).await;
        assert_eq!(result, Err(PairFetchError::UnsupportedVenue));
    }

    #[tokio::test]
    async fn markets_unavailable_when_no_markets_loaded() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let result = fetch_for(SimulatedAdapter::new(), &symbol).await;
        assert_eq!(result, Err(PairFetchError::MarketsUnavailable));
    }

    #[tokio::test]
    async fn unknown_symbol_when_not_in_markets() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(Symbol::new("ETH/USDT").unwrap(), meta(true, true));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::UnknownSymbol));
    }

    #[tokio::test]
    async fn inactive_market_is_excluded() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(false, true));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::Inactive));
    }

    #[tokio::test]
    async fn not_spot_market_is_excluded() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, false));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::NotSpot));
    }

    #[tokio::test]
    async fn ticker_unavailable_when_no_fixture() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, true));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::TickerUnavailable));
    }

    #[tokio::test]
    async fn order_book_unavailable_when_no_fixture() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, true));
        adapter.set_ticker(symbol.clone(), ticker(dec!(99), dec!(100)));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::OrderBookUnavailable));
    }

    #[tokio::test]
    async fn data_integrity_when_book_side_empty() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, true));
        adapter.set_ticker(symbol.clone(), ticker(dec!(99), dec!(100)));
        adapter.set_order_book(symbol.clone(), book(vec![], vec![Level { price: dec!(100), amount: dec!(1) }]));
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::DataIntegrity("empty order-book side")));
    }

    #[tokio::test]
    async fn successful_fetch_produces_well_formed_snapshot() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, true));
        adapter.set_ticker(symbol.clone(), ticker(dec!(99), dec!(100)));
        adapter.set_order_book(
            symbol.clone(),
            book(
                vec![Level { price: dec!(99), amount: dec!(1) }],
                vec![Level { price: dec!(100), amount: dec!(1) }],
            ),
        );
        let snapshot = fetch_for(adapter, &symbol).await.unwrap();
        assert!(snapshot.is_well_formed());
        assert_eq!(snapshot.orderbook.best_bid, Some(dec!(99)));
        assert_eq!(snapshot.orderbook.best_ask, Some(dec!(100)));
    }

    #[tokio::test]
    async fn rate_limited_ticker_maps_to_ticker_unavailable() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut adapter = SimulatedAdapter::new();
        adapter.set_market(symbol.clone(), meta(true, true));
        adapter.force_failure(symbol.clone(), AdapterFail::RateLimited);
        let result = fetch_for(adapter, &symbol).await;
        assert_eq!(result, Err(PairFetchError::TickerUnavailable));
    }
}
