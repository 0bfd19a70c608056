//! Sizing result and advisory warnings.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Advisory message attached to a result. Never blocks display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskWarning {
    /// Risk per trade above the configured threshold
    HighRiskPerTrade,
    /// Stop loss too close to the entry price
    TightStopLoss,
    /// Not even one share (or one lot) fits the constraints
    CannotAffordShares { lot_size: Option<u32> },
}

impl fmt::Display for RiskWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskWarning::HighRiskPerTrade => {
                f.write_str("High risk: Consider risking no more than 2-5% per trade")
            }
            RiskWarning::TightStopLoss => f.write_str(
                "Very tight stop loss: Consider if this allows enough room for normal price fluctuation",
            ),
            RiskWarning::CannotAffordShares { lot_size: Some(lot) } => write!(
                f,
                "Cannot afford a single lot of {} shares with current capital or inputs. \
                 Consider increasing capital or adjusting stop loss",
                lot
            ),
            RiskWarning::CannotAffordShares { lot_size: None } => f.write_str(
                "Cannot afford any shares with current capital or inputs. \
                 Consider increasing capital or adjusting stop loss",
            ),
        }
    }
}

impl Serialize for RiskWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Output of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Capital the trader is willing to lose
    pub risk_amount: Decimal,

    /// Loss per share if the stop is hit
    pub risk_per_share: Decimal,

    /// Shares allowed by the risk budget alone
    pub risk_based_shares: u64,

    /// Shares the capital can buy outright
    pub capital_based_shares: u64,

    /// Tighter of the two checks, before lot rounding
    pub final_share_count_pre_lot: u64,

    /// Whole lots, `None` for markets without lots
    pub max_lots: Option<u64>,

    pub max_shares: u64,

    pub position_value: Decimal,

    /// Position value as a percentage of principal
    pub position_size_percentage: Decimal,

    /// Loss if stopped out with `max_shares`
    pub actual_risk_amount: Decimal,

    pub actual_risk_percentage: Decimal,

    pub warnings: Vec<RiskWarning>,

    pub is_valid: bool,
}

impl CalculationResult {
    /// Attach warnings in evaluation order.
    pub fn with_warnings(mut self, warnings: Vec<RiskWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// True when lot rounding or the capital check trimmed the risk-based count.
    pub fn is_capped(&self) -> bool {
        self.max_shares < self.risk_based_shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_serializes_as_message() {
        let json = serde_json::to_string(&vec![
            RiskWarning::HighRiskPerTrade,
            RiskWarning::CannotAffordShares { lot_size: Some(100) },
        ])
        .unwrap();
        assert!(json.starts_with("[\"High risk:"));
        assert!(json.contains("a single lot of 100 shares"));
    }

    #[test]
    fn test_cannot_afford_wording_without_lots() {
        let msg = RiskWarning::CannotAffordShares { lot_size: None }.to_string();
        assert!(msg.starts_with("Cannot afford any shares"));
    }
}
