//! Market codes and the static lot-size rules table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Supported equity markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// Bursa Malaysia (KLSE)
    #[default]
    My,
    /// Singapore Exchange (SGX)
    Sg,
    /// China A-shares
    Cn,
    /// Hong Kong Exchange (HKEX)
    Hk,
    /// NYSE / NASDAQ
    Us,
}

impl Market {
    pub const ALL: [Market; 5] = [Market::My, Market::Sg, Market::Cn, Market::Hk, Market::Us];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::My => "MY",
            Market::Sg => "SG",
            Market::Cn => "CN",
            Market::Hk => "HK",
            Market::Us => "US",
        }
    }

    /// Parse a market code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "MY" => Some(Market::My),
            "SG" => Some(Market::Sg),
            "CN" => Some(Market::Cn),
            "HK" => Some(Market::Hk),
            "US" => Some(Market::Us),
            _ => None,
        }
    }

    /// Trading rule for this market.
    pub fn rule(&self) -> &'static MarketRule {
        MarketRules::lookup(*self)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown market code '{}'", s.trim()))
    }
}

/// Lot sizing and display currency for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRule {
    pub market: Market,

    /// Exchange display name
    pub name: &'static str,

    /// Shares per board lot (1 when lots are not enforced)
    pub lot_size: u32,

    /// Whether positions must be whole multiples of `lot_size`
    pub uses_lots: bool,

    /// Display symbol, e.g. "RM" or "HK$"
    pub currency_symbol: &'static str,

    /// ISO 4217 code
    pub currency_code: &'static str,

    /// Short note on the exchange's lot convention
    pub lot_note: &'static str,
}

static RULES: [MarketRule; 5] = [
    MarketRule {
        market: Market::My,
        name: "Malaysia (KLSE)",
        lot_size: 100,
        uses_lots: true,
        currency_symbol: "RM",
        currency_code: "MYR",
        lot_note: "100 shares per lot, standard for all stocks",
    },
    MarketRule {
        market: Market::Sg,
        name: "Singapore (SGX)",
        lot_size: 100,
        uses_lots: true,
        currency_symbol: "S$",
        currency_code: "SGD",
        lot_note: "100 shares per lot, odd lots available",
    },
    MarketRule {
        market: Market::Cn,
        name: "China A-Shares",
        lot_size: 100,
        uses_lots: true,
        currency_symbol: "¥",
        currency_code: "CNY",
        lot_note: "100 shares per lot, A-shares standard",
    },
    MarketRule {
        market: Market::Hk,
        name: "Hong Kong (HKEX)",
        lot_size: 100,
        uses_lots: true,
        currency_symbol: "HK$",
        currency_code: "HKD",
        lot_note: "Variable lot sizes, check individual stocks",
    },
    MarketRule {
        market: Market::Us,
        name: "United States (NYSE/NASDAQ)",
        lot_size: 1,
        uses_lots: false,
        currency_symbol: "$",
        currency_code: "USD",
        lot_note: "Any number of shares",
    },
];

/// Read-only lookup over the fixed rules table.
pub struct MarketRules;

impl MarketRules {
    /// All rules in display order.
    pub fn all() -> &'static [MarketRule] {
        &RULES
    }

    pub fn lookup(market: Market) -> &'static MarketRule {
        // Table order matches `Market::ALL`.
        &RULES[market as usize]
    }

    /// Look up by raw code. Unknown codes fall back to the MY rule.
    pub fn lookup_code(code: &str) -> &'static MarketRule {
        match Market::from_code(code) {
            Some(market) => Self::lookup(market),
            None => {
                warn!(code = %code, fallback = %Market::My, "Unknown market code, using fallback rule");
                Self::lookup(Market::My)
            }
        }
    }
}
