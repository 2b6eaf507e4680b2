use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::level::OrderBookSide;
use super::market::{Limits, Precision};
use super::symbol::Symbol;
use super::venue::VenueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBlock {
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub spread: Decimal,
    pub volume: Decimal,
    /// Opaque magnitude from the ticker's `percentage` field; exchanges
    /// differ on whether this is 24h or since-open (spec.md §9, Open Question).
    /// Used only inside `marketVolatility`.
    pub change_pct: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBookBlock {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub bids: OrderBookSide,
    pub asks: OrderBookSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeesBlock {
    pub maker: Decimal,
    pub taker: Decimal,
    /// Excluded from the real-time calculation by design (spec.md §4.4, §9):
    /// a pre-funded-balances model is assumed, so transfer costs are fixed
    /// at 0/unknown rather than fetched.
    pub withdrawal: Option<Decimal>,
    pub deposit: Decimal,
    pub network: Decimal,
}

/// One venue's view of one symbol at fetch time. `best_ask >= best_bid`
/// whenever both are present (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub symbol: Symbol,
    pub venue: VenueId,
    pub price: PriceBlock,
    pub orderbook: OrderBookBlock,
    pub fees: FeesBlock,
    pub limits: Limits,
    pub precision: Precision,
}

impl PairSnapshot {
    pub fn is_well_formed(&self) -> bool {
        match (self.orderbook.best_bid, self.orderbook.best_ask) {
            (Some(bid), Some(ask)) => ask >= bid,
            _ => false,
        }
    }
}

/// `Symbol -> (VenueId -> PairSnapshot)`, restricted to successful fetches
/// with non-empty top-of-book on both sides (spec.md §3). `BTreeMap` keeps
/// iteration alphabetical over symbols without a separate sort step,
/// matching the stable-iteration requirement in spec.md §5.
pub type AllData = BTreeMap<Symbol, BTreeMap<VenueId, PairSnapshot>>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(bid: Decimal, ask: Decimal) -> PairSnapshot {
        PairSnapshot {
            symbol: Symbol::new("BTC/USDT").unwrap(),
            venue: VenueId::Binance,
            price: PriceBlock {
                last: ask,
                bid,
                ask,
                spread: ask - bid,
                volume: Decimal::ZERO,
                change_pct: Decimal::ZERO,
            },
            orderbook: OrderBookBlock {
                best_bid: Some(bid),
                best_ask: Some(ask),
                bids: OrderBookSide::default(),
                asks: OrderBookSide::default(),
            },
            fees: FeesBlock::default(),
            limits: Limits::default(),
            precision: Precision::default(),
        }
    }

    #[test]
    fn well_formed_requires_ask_at_least_bid() {
        assert!(snapshot(dec!(100), dec!(101)).is_well_formed());
        assert!(!snapshot(dec!(101), dec!(100)).is_well_formed());
    }

    #[test]
    fn missing_top_of_book_is_not_well_formed() {
        let mut s = snapshot(dec!(100), dec!(101));
        s.orderbook.best_bid = None;
        assert!(!s.is_well_formed());
    }
}
