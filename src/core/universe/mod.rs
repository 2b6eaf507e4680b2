use std::collections::{BTreeMap, BTreeSet};

use crate::core::domain::{MarketMeta, Symbol, VenueId};

/// Every key of a venue's cached markets satisfying `endsWith("/USDT") AND
/// active AND spot` (spec.md §4.3).
pub fn usdt_spot_symbols(markets: &BTreeMap<Symbol, MarketMeta>) -> BTreeSet<Symbol> {
    markets
        .iter()
        .filter(|(symbol, meta)| symbol.is_usdt_quoted() && meta.active && meta.spot)
        .map(|(symbol, _)| symbol.clone())
        .collect()
}

/// Symbols with a `/USDT` active spot market count >= 2 across venues
/// (spec.md §4.3). An empty universe is a valid, terminal result -- callers
/// must not fabricate symbols when this returns empty.
pub fn common_usdt_symbols(per_venue: &BTreeMap<VenueId, BTreeMap<Symbol, MarketMeta>>) -> BTreeSet<Symbol> {
    let mut counts: BTreeMap<Symbol, usize> = BTreeMap::new();
    for markets in per_venue.values() {
        for symbol in usdt_spot_symbols(markets) {
            *counts.entry(symbol).or_insert(0) += 1;
        }
    }
    counts.into_iter().filter(|(_, count)| *count >= 2).map(|(symbol, _)| symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Limits;
    use crate::core::domain::Precision;
    use rust_decimal_macros::dec;

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

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    /// spec.md §6, scenario S6: A has {BTC/USDT active spot, ETH/USDT
    /// inactive}; B has {BTC/USDT active spot}; C has {ETH/USDT active spot}.
    /// Expected common set is {BTC/USDT} -- ETH/USDT only has one active
    /// spot venue.
    #[test]
    fn scenario_s6_universe_intersection() {
        let mut a = BTreeMap::new();
        a.insert(sym("BTC/USDT"), meta(true, true));
        a.insert(sym("ETH/USDT"), meta(false, true));

        let mut b = BTreeMap::new();
        b.insert(sym("BTC/USDT"), meta(true, true));

        let mut c = BTreeMap::new();
        c.insert(sym("ETH/USDT"), meta(true, true));

        let mut per_venue = BTreeMap::new();
        per_venue.insert(VenueId::Binance, a);
        per_venue.insert(VenueId::Kucoin, b);
        per_venue.insert(VenueId::Gate, c);

        let common = common_usdt_symbols(&per_venue);
        assert_eq!(common, BTreeSet::from([sym("BTC/USDT")]));
    }

    #[test]
    fn excludes_non_usdt_and_non_spot_and_inactive() {
        let mut markets = BTreeMap::new();
        markets.insert(sym("BTC/USDT"), meta(true, true));
        markets.insert(sym("BTC/ETH"), meta(true, true));
        markets.insert(sym("ETH/USDT"), meta(false, true));
        markets.insert(sym("SOL/USDT"), meta(true, false));

        let result = usdt_spot_symbols(&markets);
        assert_eq!(result, BTreeSet::from([sym("BTC/USDT")]));
    }

    #[test]
    fn empty_universe_is_valid() {
        let per_venue: BTreeMap<VenueId, BTreeMap<Symbol, MarketMeta>> = BTreeMap::new();
        assert!(common_usdt_symbols(&per_venue).is_empty());
    }
}
