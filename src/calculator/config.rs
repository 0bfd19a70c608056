//! Calculator configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds and policy knobs for the calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Risk per trade (percent) above which a high-risk warning is raised
    pub high_risk_threshold_pct: Decimal,

    /// Minimum (buy - stop) / buy before the stop is considered too tight
    pub tight_stop_ratio: Decimal,

    /// Reject unknown market codes instead of falling back to MY
    pub strict_markets: bool,

    /// Page name reported with analytics events
    pub page: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold_pct: dec!(5),  // 2-5% is the usual ceiling
            tight_stop_ratio: dec!(0.015),     // 1.5% below entry
            strict_markets: false,
            page: "/risk-calculator".to_string(),
        }
    }
}
