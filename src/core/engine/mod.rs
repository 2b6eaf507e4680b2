use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{
    AllData, Estimates, Limits, Opportunity, OpportunityFees, OpportunityLimits, PairSnapshot,
    Risk, SideLimits, Slippage, Symbol, VenueId,
};

/// Thresholds the engine gates on (spec.md §4.6). `trade_size_usdt` sizes
/// the intended quantity on the buy side; the other two are admission gates.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub trade_size_usdt: Decimal,
    pub min_raw_spread_pct: Decimal,
    pub min_trade_usdt: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trade_size_usdt: dec!(1000),
            min_raw_spread_pct: Decimal::ZERO,
            min_trade_usdt: Decimal::ZERO,
        }
    }
}

/// Debug counters over every ordered `(symbol, buy, sell)` pair considered in
/// one run, tallied in rejection order (spec.md §4.6). `pairs_ok` is an
/// ambient addition: the spec names only the rejection counters, but a
/// checked/ok split is the natural complement for the scheduler's tick span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounters {
    pub pairs_checked: u64,
    pub pairs_missing_ob: u64,
    pub pairs_insufficient_fill: u64,
    pub pairs_below_spread: u64,
    pub pairs_below_notional: u64,
    pub pairs_limits_fail: u64,
    pub pairs_ok: u64,
}

const LIQUIDITY_RISK_MULTIPLIER: Decimal = dec!(5);
const CONFIDENCE_LIQUIDITY_MULTIPLIER: Decimal = dec!(10);
const SLIP_SCORE_CAP: Decimal = dec!(0.02);
const FEE_SCORE_CAP: Decimal = dec!(0.9);
const GROSS_FLOOR: Decimal = dec!(0.000000001);

/// Pure function from `AllData` and `config` to a ranked `[Opportunity]`
/// (spec.md §4.6). Iterates symbols alphabetically and venues in registry
/// order (both already guaranteed by `AllData`'s `BTreeMap` nesting), so
/// output is deterministic given identical inputs and `now` (spec.md §5,
/// §8 Testable Property 1).
pub fn compute_opportunities(
    data: &AllData,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> (Vec<Opportunity>, EngineCounters) {
    let mut opportunities = Vec::new();
    let mut counters = EngineCounters::default();

    for venues in data.values() {
        for (&buy_venue, buy_snapshot) in venues {
            for (&sell_venue, sell_snapshot) in venues {
                if buy_venue == sell_venue {
                    continue;
                }
                counters.pairs_checked += 1;
                match evaluate_pair(buy_snapshot, sell_snapshot, config, now, &mut counters) {
                    Some(opportunity) => {
                        counters.pairs_ok += 1;
                        opportunities.push(opportunity);
                    }
                    None => {}
                }
            }
        }
    }

    opportunities.sort_by(|a, b| {
        b.spread_pct
            .cmp(&a.spread_pct)
            .then_with(|| a.symbol.cmp(&b.symbol))
            .then_with(|| a.buy_venue.cmp(&b.buy_venue))
            .then_with(|| a.sell_venue.cmp(&b.sell_venue))
    });

    (opportunities, counters)
}

fn evaluate_pair(
    buy: &PairSnapshot,
    sell: &PairSnapshot,
    config: &EngineConfig,
    now: DateTime<Utc>,
    counters: &mut EngineCounters,
) -> Option<Opportunity> {
    let (buy_ask, sell_bid) = match (buy.orderbook.best_ask, sell.orderbook.best_bid) {
        (Some(buy_ask), Some(sell_bid)) => (buy_ask, sell_bid),
        _ => {
            counters.pairs_missing_ob += 1;
            return None;
        }
    };
    if buy_ask <= Decimal::ZERO {
        counters.pairs_missing_ob += 1;
        return None;
    }

    let intended_qty = config.trade_size_usdt / buy_ask;

    let (filled_buy, cost_buy) = buy.orderbook.asks.walk(intended_qty);
    let (filled_sell, cost_sell) = sell.orderbook.bids.walk(intended_qty);
    if filled_buy <= Decimal::ZERO || filled_sell <= Decimal::ZERO {
        counters.pairs_missing_ob += 1;
        return None;
    }

    let buy_effective = cost_buy / filled_buy;
    let sell_effective = cost_sell / filled_sell;
    let slippage_buy_abs = (buy_effective - buy_ask).abs();
    let slippage_sell_abs = (sell_effective - sell_bid).abs();

    let effective_qty = filled_buy.min(filled_sell);
    if effective_qty <= Decimal::ZERO {
        counters.pairs_insufficient_fill += 1;
        return None;
    }

    let spread_abs = sell_effective - buy_effective;
    let spread_pct = spread_abs / buy_effective * dec!(100);
    let raw_spread_pct = (sell_bid - buy_ask) / buy_ask * dec!(100);
    if spread_pct <= config.min_raw_spread_pct {
        counters.pairs_below_spread += 1;
        return None;
    }

    let notional_buy = buy_effective * effective_qty;
    if notional_buy < config.min_trade_usdt {
        counters.pairs_below_notional += 1;
        return None;
    }

    let fees_abs = effective_qty * buy_effective * buy.fees.taker + effective_qty * sell_effective * sell.fees.taker;
    let gross = spread_abs * effective_qty;
    let net_profit_abs = gross - fees_abs;
    let net_profit_pct = net_profit_abs / (buy_effective * effective_qty) * dec!(100);

    let buy_liquidity = buy.orderbook.asks.total_amount();
    let sell_liquidity = sell.orderbook.bids.total_amount();
    let available = buy_liquidity.min(sell_liquidity);

    let notional_sell = sell_effective * effective_qty;
    if !admits_limits(buy, sell, effective_qty, notional_buy, notional_sell) {
        counters.pairs_limits_fail += 1;
        return None;
    }

    let market_volatility = (buy.price.change_pct - sell.price.change_pct).abs();
    let execution_risk = (slippage_buy_abs + slippage_sell_abs).round_dp(8);
    let liquidity_risk = if effective_qty > available {
        Decimal::ONE
    } else {
        (Decimal::ONE - available / (effective_qty * LIQUIDITY_RISK_MULTIPLIER)).max(Decimal::ZERO)
    };
    let fee_risk = fees_abs / gross.max(GROSS_FLOOR);

    let slip_score = (Decimal::ONE
        - ((slippage_buy_abs + slippage_sell_abs) / buy_effective).min(SLIP_SCORE_CAP))
    .max(Decimal::ZERO);
    let liq_score = (available / (effective_qty * CONFIDENCE_LIQUIDITY_MULTIPLIER)).min(Decimal::ONE);
    let fee_score = (Decimal::ONE - (fees_abs / gross).min(FEE_SCORE_CAP)).max(Decimal::ZERO);
    let confidence = (dec!(0.5) * slip_score + dec!(0.3) * liq_score + dec!(0.2) * fee_score).round_dp(3);

    Some(Opportunity {
        symbol: buy.symbol.clone(),
        buy_venue: buy.venue,
        sell_venue: sell.venue,
        buy_price: buy_ask,
        sell_price: sell_bid,
        buy_effective,
        sell_effective,
        quantity: effective_qty,
        volume24h: buy.price.volume.min(sell.price.volume),
        spread_abs,
        spread_pct,
        raw_spread_pct,
        fees: OpportunityFees {
            trading_abs: fees_abs,
            network_abs: Decimal::ZERO,
            taker_buy: buy.fees.taker,
            taker_sell: sell.fees.taker,
        },
        slippage: Slippage { buy_abs: slippage_buy_abs, sell_abs: slippage_sell_abs },
        net_profit_abs,
        net_profit_pct,
        liquidity: available,
        buy_liquidity,
        sell_liquidity,
        limits: OpportunityLimits {
            buy: SideLimits {
                min_amount: buy.limits.min_amount,
                max_amount: buy.limits.max_amount,
                min_cost: buy.limits.min_cost,
                max_cost: buy.limits.max_cost,
            },
            sell: SideLimits {
                min_amount: sell.limits.min_amount,
                max_amount: sell.limits.max_amount,
                min_cost: sell.limits.min_cost,
                max_cost: sell.limits.max_cost,
            },
        },
        estimates: Estimates { confidence_score: confidence },
        risk: Risk {
            market_volatility,
            execution_risk,
            liquidity_risk,
            fee_risk,
        },
        ts: now,
    })
}

fn admits_limits(
    buy: &PairSnapshot,
    sell: &PairSnapshot,
    qty: Decimal,
    notional_buy: Decimal,
    notional_sell: Decimal,
) -> bool {
    Limits::admits(qty, buy.limits.min_amount, buy.limits.max_amount)
        && Limits::admits(qty, sell.limits.min_amount, sell.limits.max_amount)
        && Limits::admits(notional_buy, buy.limits.min_cost, buy.limits.max_cost)
        && Limits::admits(notional_sell, sell.limits.min_cost, sell.limits.max_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{FeesBlock, Level, Limits, OrderBookBlock, OrderBookSide, Precision, PriceBlock};
    use std::collections::BTreeMap;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn snapshot(symbol: &str, venue: VenueId, ask: Decimal, bid: Decimal, taker: Decimal, change_pct: Decimal) -> PairSnapshot {
        PairSnapshot {
            symbol: Symbol::new(symbol).unwrap(),
            venue,
            price: PriceBlock {
                last: ask,
                bid,
                ask,
                spread: ask - bid,
                volume: dec!(1000),
                change_pct,
            },
            orderbook: OrderBookBlock {
                best_bid: Some(bid),
                best_ask: Some(ask),
                bids: OrderBookSide::from_levels([Level { price: bid, amount: dec!(10) }]),
                asks: OrderBookSide::from_levels([Level { price: ask, amount: dec!(10) }]),
            },
            fees: FeesBlock { maker: taker, taker, withdrawal: None, deposit: Decimal::ZERO, network: Decimal::ZERO },
            limits: Limits::default(),
            precision: Precision::default(),
        }
    }

    fn all_data(entries: Vec<PairSnapshot>) -> AllData {
        let mut data: AllData = BTreeMap::new();
        for snapshot in entries {
            data.entry(snapshot.symbol.clone()).or_default().insert(snapshot.venue, snapshot);
        }
        data
    }

    /// spec.md scenario S1: BTC/USDT, venue A ask 50000/bid 49990, venue B ask
    /// 50100/bid 50050, taker fee 0.001 both sides, trade size 25 USDT. A->B
    /// should be emitted (spreadPct ~0.1% > minRawSpreadPct=0) even though its
    /// net profit is negative; B->A must not appear (crossed: ask 50100 > bid
    /// 49990 loses money on the raw top-of-book already).
    #[test]
    fn scenario_s1_basic_profit_with_fees() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(50000), dec!(49990), dec!(0.001), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(50100), dec!(50050), dec!(0.001), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: Decimal::ZERO };
        let (opportunities, counters) = compute_opportunities(&data, &config, fixed_now());

        assert_eq!(opportunities.len(), 1);
        let opp = &opportunities[0];
        assert_eq!(opp.buy_venue, VenueId::Binance);
        assert_eq!(opp.sell_venue, VenueId::Kucoin);
        assert_eq!(opp.buy_effective, dec!(50000));
        assert_eq!(opp.sell_effective, dec!(50050));
        assert!(opp.net_profit_pct < Decimal::ZERO);
        assert_eq!(counters.pairs_checked, 2);
        assert_eq!(counters.pairs_ok, 1);
    }

    /// spec.md scenario S5: three venues, expect only C->B and A->B to
    /// survive (C->A is a loss, B->C/B->A/A->C are excluded by crossed
    /// books), sorted descending by spreadPct: [C->B, A->B].
    #[test]
    fn scenario_s5_ordered_pairing() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(101), dec!(100.5), dec!(0), dec!(0)),
            snapshot("BTC/USDT", VenueId::Gate, dec!(99.5), dec!(99.2), dec!(0), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: Decimal::ZERO };
        let (opportunities, _) = compute_opportunities(&data, &config, fixed_now());

        assert_eq!(opportunities.len(), 2);
        assert_eq!(opportunities[0].buy_venue, VenueId::Gate);
        assert_eq!(opportunities[0].sell_venue, VenueId::Kucoin);
        assert_eq!(opportunities[1].buy_venue, VenueId::Binance);
        assert_eq!(opportunities[1].sell_venue, VenueId::Kucoin);
        assert!(opportunities[0].spread_pct >= opportunities[1].spread_pct);
    }

    #[test]
    fn skips_pair_when_order_book_side_empty() {
        let mut a = snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0.001), dec!(0));
        a.orderbook.asks = OrderBookSide::default();
        a.orderbook.best_ask = None;
        let b = snapshot("BTC/USDT", VenueId::Kucoin, dec!(101), dec!(100), dec!(0.001), dec!(0));
        let data = all_data(vec![a, b]);
        let config = EngineConfig::default();
        let (opportunities, counters) = compute_opportunities(&data, &config, fixed_now());
        assert!(opportunities.is_empty());
        assert_eq!(counters.pairs_missing_ob, 1);
    }

    #[test]
    fn below_spread_threshold_is_excluded() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(100.01), dec!(99.99), dec!(0), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: dec!(5), min_trade_usdt: Decimal::ZERO };
        let (opportunities, counters) = compute_opportunities(&data, &config, fixed_now());
        assert!(opportunities.is_empty());
        assert!(counters.pairs_below_spread >= 1);
    }

    #[test]
    fn below_notional_floor_is_excluded() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(110), dec!(109), dec!(0), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: dec!(1_000_000) };
        let (opportunities, counters) = compute_opportunities(&data, &config, fixed_now());
        assert!(opportunities.is_empty());
        assert_eq!(counters.pairs_below_notional, 1);
    }

    #[test]
    fn limits_violation_is_excluded() {
        let mut buy = snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0), dec!(0));
        buy.limits.max_cost = Some(dec!(1));
        let sell = snapshot("BTC/USDT", VenueId::Kucoin, dec!(110), dec!(109), dec!(0), dec!(0));
        let data = all_data(vec![buy, sell]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: Decimal::ZERO };
        let (opportunities, counters) = compute_opportunities(&data, &config, fixed_now());
        assert!(opportunities.is_empty());
        assert_eq!(counters.pairs_limits_fail, 1);
    }

    #[test]
    fn determinism_same_inputs_same_output() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0.001), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(105), dec!(104), dec!(0.001), dec!(0)),
            snapshot("ETH/USDT", VenueId::Binance, dec!(10), dec!(9.9), dec!(0.001), dec!(0)),
            snapshot("ETH/USDT", VenueId::Kucoin, dec!(11), dec!(10.9), dec!(0.001), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: Decimal::ZERO };
        let now = fixed_now();
        let (first, _) = compute_opportunities(&data, &config, now);
        let (second, _) = compute_opportunities(&data, &config, now);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.symbol, b.symbol);
            assert_eq!(a.buy_venue, b.buy_venue);
            assert_eq!(a.sell_venue, b.sell_venue);
            assert_eq!(a.spread_pct, b.spread_pct);
        }
    }

    #[test]
    fn confidence_score_is_within_unit_interval() {
        let data = all_data(vec![
            snapshot("BTC/USDT", VenueId::Binance, dec!(100), dec!(99), dec!(0.001), dec!(0)),
            snapshot("BTC/USDT", VenueId::Kucoin, dec!(110), dec!(109), dec!(0.001), dec!(0)),
        ]);
        let config = EngineConfig { trade_size_usdt: dec!(25), min_raw_spread_pct: Decimal::ZERO, min_trade_usdt: Decimal::ZERO };
        let (opportunities, _) = compute_opportunities(&data, &config, fixed_now());
        let confidence = opportunities[0].estimates.confidence_score;
        assert!(confidence >= Decimal::ZERO && confidence <= Decimal::ONE);
    }
}
