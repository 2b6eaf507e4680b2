use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-venue, per-symbol static metadata, populated once by `loadMarkets`
/// and cached for the process lifetime (spec.md §3, §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMeta {
    pub active: bool,
    pub spot: bool,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
    pub limits: Limits,
    pub precision: Precision,
}

/// Exchange-imposed min/max bounds on amount, price and cost (notional).
/// `min <= max` whenever both are present (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limits {
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_cost: Option<Decimal>,
    pub max_cost: Option<Decimal>,
}

impl Limits {
    /// `value` admitted iff it falls within whichever of `min`/`max` are present.
    pub fn admits(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
        min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Precision {
    pub price: u32,
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn limits_admit_within_bounds_only() {
        let limits = Limits {
            min_cost: Some(dec!(10)),
            max_cost: Some(dec!(1000)),
            ..Default::default()
        };
        assert!(Limits::admits(dec!(50), limits.min_cost, limits.max_cost));
        assert!(!Limits::admits(dec!(5), limits.min_cost, limits.max_cost));
        assert!(!Limits::admits(dec!(5000), limits.min_cost, limits.max_cost));
    }

    #[test]
    fn limits_admit_everything_when_absent() {
        let limits = Limits::default();
        assert!(Limits::admits(dec!(1_000_000), limits.min_cost, limits.max_cost));
    }
}
