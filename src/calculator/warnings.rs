//! Advisory warnings derived from a sized position.

use rust_decimal::Decimal;

use crate::models::{CalculationResult, CalculatorInput, MarketRule, RiskWarning};

use super::CalculatorConfig;

/// Evaluates warning rules in a fixed order.
pub struct WarningGenerator {
    high_risk_threshold_pct: Decimal,
    tight_stop_ratio: Decimal,
}

impl WarningGenerator {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            high_risk_threshold_pct: config.high_risk_threshold_pct,
            tight_stop_ratio: config.tight_stop_ratio,
        }
    }

    /// Warnings for one result, in evaluation order:
    /// high risk, tight stop, then zero shares.
    pub fn warnings(
        &self,
        input: &CalculatorInput,
        rule: &MarketRule,
        result: &CalculationResult,
    ) -> Vec<RiskWarning> {
        let mut warnings = Vec::new();

        if input.risk_percentage > self.high_risk_threshold_pct {
            warnings.push(RiskWarning::HighRiskPerTrade);
        }

        let stop_distance = result
            .risk_per_share
            .checked_div(input.buy_price)
            .unwrap_or(Decimal::ZERO);
        if stop_distance < self.tight_stop_ratio {
            warnings.push(RiskWarning::TightStopLoss);
        }

        if result.max_shares == 0 {
            warnings.push(RiskWarning::CannotAffordShares {
                lot_size: rule.uses_lots.then_some(rule.lot_size),
            });
        }

        warnings
    }
}

impl Default for WarningGenerator {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}
