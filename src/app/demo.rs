//! Builds a demo `ExchangeRegistry` backed by `SimulatedAdapter` instances.
//!
//! Real per-venue HTTP clients are out of this crate's scope (spec.md §1):
//! "the HTTP exchange SDK ... providing `loadMarkets`, `fetchTicker`,
//! `fetchOrderBook`" is named but not designed here. `cli run`/`cli status`
//! still need *something* behind the `ExchangeAdapter` trait to be
//! exercisable out of the box, so this module seeds one `SimulatedAdapter`
//! per configured venue with a small deterministic order book, wrapped in
//! the same `RateLimited` decorator a real adapter would get. Wiring an
//! actual venue client means swapping this function's body for one that
//! constructs real adapters and registers them the same way.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{Level, Limits, MarketMeta, Precision, Symbol, VenueId};
use crate::core::exchange::{ExchangeRegistry, RateLimited, RawOrderBook, SimulatedAdapter, Ticker};

const ADAPTER_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-venue price offsets (in USDT) layered onto a common mid price so
/// different venues disagree slightly on top-of-book -- enough for the
/// Opportunity Engine to find something on a fresh `cli run`.
fn venue_offset(venue: VenueId) -> Decimal {
    match venue {
        VenueId::Binance => dec!(0),
        VenueId::Kucoin => dec!(15),
        VenueId::Gate => dec!(-10),
        VenueId::Bitget => dec!(8),
        VenueId::Mexc => dec!(-5),
        VenueId::Bybit => dec!(20),
    }
}

fn demo_market() -> MarketMeta {
    MarketMeta {
        active: true,
        spot: true,
        maker_fee: dec!(0.001),
        taker_fee: dec!(0.001),
        limits: Limits { min_cost: Some(dec!(5)), ..Limits::default() },
        precision: Precision { price: 2, amount: 6 },
    }
}

fn seed_symbol(adapter: &mut SimulatedAdapter, symbol: Symbol, mid: Decimal, offset: Decimal) {
    let bid = mid + offset - dec!(0.5);
    let ask = mid + offset + dec!(0.5);
    adapter.set_market(symbol.clone(), demo_market());
    adapter.set_ticker(
        symbol.clone(),
        Ticker { last: mid + offset, bid, ask, base_volume: dec!(1000), percentage: dec!(0) },
    );
    adapter.set_order_book(
        symbol,
        RawOrderBook {
            bids: vec![Level { price: bid, amount: dec!(2) }, Level { price: bid - dec!(1), amount: dec!(5) }],
            asks: vec![Level { price: ask, amount: dec!(2) }, Level { price: ask + dec!(1), amount: dec!(5) }],
        },
    );
}

/// Builds one `RateLimited<SimulatedAdapter>` per venue in `venues`, seeded
/// with a small BTC/USDT + ETH/USDT book.
pub fn build_registry(venues: &[VenueId]) -> ExchangeRegistry {
    let mut registry = ExchangeRegistry::new();
    for &venue in venues {
        let offset = venue_offset(venue);
        let mut adapter = SimulatedAdapter::new();
        seed_symbol(&mut adapter, Symbol::new("BTC/USDT").unwrap(), dec!(50000), offset);
        seed_symbol(&mut adapter, Symbol::new("ETH/USDT").unwrap(), dec!(3000), offset / dec!(10));
        registry.register(venue, Arc::new(RateLimited::new(adapter, venue.as_str(), ADAPTER_TIMEOUT)));
    }
    registry
}
