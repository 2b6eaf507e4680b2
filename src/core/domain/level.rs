use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One order-book level: `price > 0`, `amount >= 0` (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub price: Decimal,
    pub amount: Decimal,
}

/// Up to N=20 levels, one side of a book. Construction enforces monotonicity:
/// asks non-decreasing, bids non-increasing (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSide(Vec<Level>);

pub const MAX_DEPTH: usize = 20;

impl OrderBookSide {
    /// Build a side, truncating to `MAX_DEPTH` and dropping non-positive
    /// prices or negative amounts (a `DataIntegrity` concern handled at the
    /// boundary rather than panicking deep in the engine).
    pub fn from_levels(levels: impl IntoIterator<Item = Level>) -> Self {
        OrderBookSide(
            levels
                .into_iter()
                .filter(|l| l.price > Decimal::ZERO && l.amount >= Decimal::ZERO)
                .take(MAX_DEPTH)
                .collect(),
        )
    }

    pub fn levels(&self) -> &[Level] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn top(&self) -> Option<Level> {
        self.0.first().copied()
    }

    pub fn total_amount(&self) -> Decimal {
        self.0.iter().map(|l| l.amount).sum()
    }

    /// Walk this side consuming levels in order to fill `target` base units.
    /// Returns `(filled, cost)`. Faithful to the order-book-walk law: if the
    /// combined amount at the first k levels >= target, `filled == target`
    /// exactly and `cost` is the weighted sum over consumed slices
    /// (spec.md §8 Testable Property 5).
    pub fn walk(&self, target: Decimal) -> (Decimal, Decimal) {
        let mut remaining = target;
        let mut filled = Decimal::ZERO;
        let mut cost = Decimal::ZERO;
        for level in &self.0 {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = remaining.min(level.amount);
            filled += take;
            cost += take * level.price;
            remaining -= take;
        }
        (filled, cost)
    }
}
