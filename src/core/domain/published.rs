use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::opportunity::Opportunity;
use super::snapshot::AllData;

/// `{timestamp, AllData}`, last-write-wins, timestamp monotone non-decreasing
/// (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub data: AllData,
}

impl Snapshot {
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Snapshot { timestamp, data: AllData::new() }
    }
}

/// `{timestamp, [Opportunity] sorted desc by spreadPct}` (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunitiesSet {
    pub timestamp: DateTime<Utc>,
    pub items: Vec<Opportunity>,
}

impl OpportunitiesSet {
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        OpportunitiesSet { timestamp, items: Vec::new() }
    }
}
