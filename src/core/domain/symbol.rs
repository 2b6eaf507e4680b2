use std::fmt;

use serde::{Deserialize, Serialize};

/// A `BASE/QUOTE` spot pair, normalized uppercase. `BASE != QUOTE` is enforced
/// at construction (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSymbol(pub String);

impl fmt::Display for InvalidSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid symbol: {}", self.0)
    }
}

impl std::error::Error for InvalidSymbol {}

impl Symbol {
    pub fn new(raw: &str) -> Result<Self, InvalidSymbol> {
        let upper = raw.to_ascii_uppercase();
        let (base, quote) = upper
            .split_once('/')
            .ok_or_else(|| InvalidSymbol(raw.to_string()))?;
        if base.is_empty() || quote.is_empty() || base == quote {
            return Err(InvalidSymbol(raw.to_string()));
        }
        Ok(Symbol(upper))
    }

    pub fn base(&self) -> &str {
        self.0.split_once('/').expect("validated at construction").0
    }

    pub fn quote(&self) -> &str {
        self.0.split_once('/').expect("validated at construction").1
    }

    pub fn is_usdt_quoted(&self) -> bool {
        self.0.ends_with("/USDT")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = InvalidSymbol;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
