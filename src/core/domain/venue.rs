use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed registry of supported venues (spec.md §6). Adding a venue means
/// extending this enum and providing an `ExchangeAdapter` implementation --
/// nothing in the core pipeline branches on venue identity otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueId {
    Binance,
    Kucoin,
    Gate,
    Bitget,
    Mexc,
    Bybit,
}

impl VenueId {
    /// Registry order, used wherever the spec requires stable iteration
    /// (spec.md §5: "registry order over venues").
    pub const ALL: [VenueId; 6] = [
        VenueId::Binance,
        VenueId::Kucoin,
        VenueId::Gate,
        VenueId::Bitget,
        VenueId::Mexc,
        VenueId::Bybit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VenueId::Binance => "binance",
            VenueId::Kucoin => "kucoin",
            VenueId::Gate => "gate",
            VenueId::Bitget => "bitget",
            VenueId::Mexc => "mexc",
            VenueId::Bybit => "bybit",
        }
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedVenue;

impl fmt::Display for UnsupportedVenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported venue")
    }
}

impl std::error::Error for UnsupportedVenue {}

impl FromStr for VenueId {
    type Err = UnsupportedVenue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binance" => Ok(VenueId::Binance),
            "kucoin" => Ok(VenueId::Kucoin),
            "gate" => Ok(VenueId::Gate),
            "bitget" => Ok(VenueId::Bitget),
            "mexc" => Ok(VenueId::Mexc),
            "bybit" => Ok(VenueId::Bybit),
            _ => Err(UnsupportedVenue),
        }
    }
}
