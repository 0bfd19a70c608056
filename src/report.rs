//! Human-readable calculation report for the terminal.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationErrors;
use crate::format::CurrencyFormatter;
use crate::models::{CalculationResult, CalculatorInput, MarketRule};

/// Breakdown, results, warnings and trading plan for one calculation.
pub struct CalculationReport<'a> {
    pub input: &'a CalculatorInput,
    pub rule: &'a MarketRule,
    pub result: &'a CalculationResult,
    pub formatter: &'a dyn CurrencyFormatter,
}

impl CalculationReport<'_> {
    fn money(&self, amount: Decimal) -> String {
        self.formatter.format(amount, self.input.market)
    }

    /// One-paragraph plan, only meaningful when the result is valid.
    pub fn trading_plan(&self) -> String {
        let r = self.result;
        let buy = match r.max_lots {
            Some(lots) => format!("Buy {} lots ({} shares)", lots, r.max_shares),
            None => format!("Buy {} shares", r.max_shares),
        };
        format!(
            "{} at {} per share. Set stop loss at {}. If stopped out, your actual loss will be {} \
             (which is {:.2}% of your capital).",
            buy,
            self.money(self.input.buy_price),
            self.money(self.input.stop_loss),
            self.money(r.actual_risk_amount),
            percent(r.actual_risk_percentage, 2)
        )
    }
}

/// Round half away from zero before display; `{:.N}` alone truncates.
fn percent(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for CalculationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;

        writeln!(f, "\n{:=^60}", format!(" {} ", self.rule.name))?;
        writeln!(f)?;
        writeln!(f, "--- How Your Shares Are Calculated ---")?;
        writeln!(
            f,
            "Risk Check ({}% risk):   {:>10} shares",
            self.input.risk_percentage, r.risk_based_shares
        )?;
        writeln!(f, "Wallet Check (capital): {:>10} shares", r.capital_based_shares)?;
        writeln!(f, "Smaller of the two:     {:>10} shares", r.final_share_count_pre_lot)?;
        writeln!(f)?;
        writeln!(f, "--- Results ---")?;
        if let Some(lots) = r.max_lots {
            writeln!(f, "Maximum Lots:    {} lots of {}", lots, self.rule.lot_size)?;
            writeln!(f, "Total Shares:    {}", r.max_shares)?;
        } else {
            writeln!(f, "Maximum Shares:  {}", r.max_shares)?;
        }
        writeln!(f, "Position Value:  {}", self.money(r.position_value))?;
        writeln!(
            f,
            "Position Size:   {:.1}% of capital",
            percent(r.position_size_percentage, 1)
        )?;
        writeln!(
            f,
            "Actual Risk:     {} ({:.2}% of capital)",
            self.money(r.actual_risk_amount),
            percent(r.actual_risk_percentage, 2)
        )?;
        if r.is_valid && r.is_capped() {
            writeln!(
                f,
                "Intended Risk:   {} (capped by capital or lot size)",
                self.money(r.risk_amount)
            )?;
        }

        if !r.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Warnings ---")?;
            for warning in &r.warnings {
                writeln!(f, "  * {}", warning)?;
            }
        }

        if r.is_valid {
            writeln!(f)?;
            writeln!(f, "--- Trading Plan ---")?;
            writeln!(f, "{}", self.trading_plan())?;
        }

        writeln!(f, "{:=^60}", "")?;
        Ok(())
    }
}

/// Field errors as an indented list.
pub struct ErrorReport<'a>(pub &'a ValidationErrors);

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invalid input:")?;
        for (field, error) in self.0.iter() {
            writeln!(f, "  {:<16} {}", field.as_str(), error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{CalculationOutcome, CalculatorConfig, RiskCalculator};
    use crate::format::MarketCurrencyFormatter;
    use crate::models::RawInput;

    fn render(raw: RawInput) -> (String, String) {
        let calc = RiskCalculator::without_analytics(CalculatorConfig::default());
        let CalculationOutcome::Calculated { input, rule, result } = calc.calculate(&raw).unwrap() else {
            panic!("expected a result");
        };
        let report = CalculationReport {
            input: &input,
            rule,
            result: &result,
            formatter: &MarketCurrencyFormatter,
        };
        (report.to_string(), report.trading_plan())
    }

    #[test]
    fn test_lot_market_report() {
        let (text, plan) = render(RawInput::new("10000", "2", "2.50", "2.25", "MY"));

        assert!(text.contains("Malaysia (KLSE)"));
        assert!(text.contains("Maximum Lots:    8 lots of 100"));
        assert!(text.contains("Position Value:  RM 2,000.00"));
        assert!(text.contains("Position Size:   20.0% of capital"));
        assert!(!text.contains("--- Warnings ---"));
        assert_eq!(
            plan,
            "Buy 8 lots (800 shares) at RM 2.50 per share. Set stop loss at RM 2.25. \
             If stopped out, your actual loss will be RM 200.00 (which is 2.00% of your capital)."
        );
    }

    #[test]
    fn test_us_report_shows_cap_and_warning() {
        let (text, plan) = render(RawInput::new("1000", "10", "50", "49", "US"));

        assert!(text.contains("Maximum Shares:  20"));
        assert!(text.contains("Intended Risk:   $100.00"));
        assert!(text.contains("High risk"));
        assert!(plan.starts_with("Buy 20 shares at $50.00"));
    }

    #[test]
    fn test_percentages_are_rounded() {
        // 2 / 3 of capital deployed, 0.02 / 3 at risk
        let (text, plan) = render(RawInput::new("3", "1", "2", "1.98", "US"));

        assert!(text.contains("Position Size:   66.7% of capital"));
        assert!(text.contains("Actual Risk:     $0.02 (0.67% of capital)"));
        assert!(plan.ends_with("(which is 0.67% of your capital)."));
    }

    #[test]
    fn test_invalid_result_has_no_plan() {
        let (text, _) = render(RawInput::new("50", "2", "100", "90", "SG"));
        assert!(text.contains("Cannot afford"));
        assert!(!text.contains("--- Trading Plan ---"));
    }

    #[test]
    fn test_error_report() {
        let calc = RiskCalculator::without_analytics(CalculatorConfig::default());
        let outcome = calc.calculate(&RawInput::new("", "2", "10", "10", "MY")).unwrap();
        let text = ErrorReport(outcome.errors().unwrap()).to_string();
        assert!(text.contains("principal        Principal must be greater than 0"));
        assert!(text.contains("stopLoss         Stop loss must be lower than buy price"));
    }
}
