use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;
use super::venue::VenueId;

/// A directed `(buyVenue -> sellVenue)` pairing on a symbol that passed every
/// threshold and limit check, with its computed economics (spec.md §3, §6).
///
/// Field names mirror the wire format in spec.md §6 exactly, including its
/// `buyExchange`/`sellExchange` naming (inconsistent with the data model's
/// `buyVenue`/`sellVenue`, but preserved for compatibility) and its
/// `spreadPct`/`minRawSpreadPct` naming, which the spec documents as a
/// misnomer: the gate compares the *effective*-price spread, not a raw
/// top-of-book spread (spec.md §9, Open Question). `rawSpreadPct` is carried
/// alongside it for interpretability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub symbol: Symbol,
    #[serde(rename = "buyExchange")]
    pub buy_venue: VenueId,
    #[serde(rename = "sellExchange")]
    pub sell_venue: VenueId,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub buy_effective: Decimal,
    pub sell_effective: Decimal,
    pub quantity: Decimal,
    pub volume24h: Decimal,
    pub spread_abs: Decimal,
    pub spread_pct: Decimal,
    pub raw_spread_pct: Decimal,
    pub fees: OpportunityFees,
    pub slippage: Slippage,
    pub net_profit_abs: Decimal,
    pub net_profit_pct: Decimal,
    pub liquidity: Decimal,
    pub buy_liquidity: Decimal,
    pub sell_liquidity: Decimal,
    pub limits: OpportunityLimits,
    pub estimates: Estimates,
    pub risk: Risk,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFees {
    pub trading_abs: Decimal,
    pub network_abs: Decimal,
    pub taker_buy: Decimal,
    pub taker_sell: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slippage {
    pub buy_abs: Decimal,
    pub sell_abs: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideLimits {
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub min_cost: Option<Decimal>,
    pub max_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityLimits {
    pub buy: SideLimits,
    pub sell: SideLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimates {
    pub confidence_score: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub market_volatility: Decimal,
    pub execution_risk: Decimal,
    pub liquidity_risk: Decimal,
    pub fee_risk: Decimal,
}
