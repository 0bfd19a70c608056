//! Position sizing with the dual check: risk budget vs. available capital.
//!
//! shares = min(floor(risk_amount / risk_per_share), floor(principal / buy_price))
//!
//! then truncated to whole lots where the market trades in lots. The result
//! never tells the trader to buy more than the capital allows, even when the
//! risk budget alone would permit it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::SizingError;
use crate::models::{CalculationResult, CalculatorInput, MarketRule};

/// Calculator for the maximum safe position.
pub struct PositionSizer;

impl PositionSizer {
    /// Size a position for validated input under the given market rule.
    ///
    /// Warnings are left empty; the engine attaches them.
    pub fn compute(
        input: &CalculatorInput,
        rule: &MarketRule,
    ) -> Result<CalculationResult, SizingError> {
        if input.principal <= Decimal::ZERO {
            return Err(SizingError::DegenerateInput(format!(
                "principal must be positive, got {}",
                input.principal
            )));
        }
        if input.buy_price <= Decimal::ZERO {
            return Err(SizingError::DegenerateInput(format!(
                "buy price must be positive, got {}",
                input.buy_price
            )));
        }

        let risk_amount = input
            .principal
            .checked_mul(input.risk_percentage)
            .and_then(|v| v.checked_div(dec!(100)))
            .ok_or(SizingError::Overflow("risk amount"))?;

        let risk_per_share = input
            .buy_price
            .checked_sub(input.stop_loss)
            .ok_or(SizingError::Overflow("risk per share"))?;
        if risk_per_share <= Decimal::ZERO {
            return Err(SizingError::DegenerateInput(format!(
                "risk per share must be positive, got {} (buy {} / stop {})",
                risk_per_share, input.buy_price, input.stop_loss
            )));
        }

        // Check #1: risk budget
        let risk_based_shares = floor_shares(risk_amount, risk_per_share, "risk-based shares")?;

        // Check #2: wallet
        let capital_based_shares =
            floor_shares(input.principal, input.buy_price, "capital-based shares")?;

        let final_share_count_pre_lot = risk_based_shares.min(capital_based_shares);

        let (max_lots, max_shares) = if rule.uses_lots {
            let lot = u64::from(rule.lot_size.max(1));
            let lots = final_share_count_pre_lot / lot;
            (Some(lots), lots * lot)
        } else {
            (None, final_share_count_pre_lot)
        };

        let shares = Decimal::from(max_shares);
        let position_value = shares
            .checked_mul(input.buy_price)
            .ok_or(SizingError::Overflow("position value"))?;
        let position_size_percentage = percent_of(position_value, input.principal)
            .ok_or(SizingError::Overflow("position size percentage"))?;
        let actual_risk_amount = shares
            .checked_mul(risk_per_share)
            .ok_or(SizingError::Overflow("actual risk amount"))?;
        let actual_risk_percentage = percent_of(actual_risk_amount, input.principal)
            .ok_or(SizingError::Overflow("actual risk percentage"))?;

        debug!(
            market = %rule.market,
            risk_based = risk_based_shares,
            capital_based = capital_based_shares,
            lots = ?max_lots,
            shares = max_shares,
            "Position sized"
        );

        Ok(CalculationResult {
            risk_amount,
            risk_per_share,
            risk_based_shares,
            capital_based_shares,
            final_share_count_pre_lot,
            max_lots,
            max_shares,
            position_value,
            position_size_percentage,
            actual_risk_amount,
            actual_risk_percentage,
            warnings: Vec::new(),
            is_valid: max_shares > 0,
        })
    }
}

/// floor(numerator / denominator) as a share count.
fn floor_shares(
    numerator: Decimal,
    denominator: Decimal,
    what: &'static str,
) -> Result<u64, SizingError> {
    numerator
        .checked_div(denominator)
        .and_then(|v| v.floor().to_u64())
        .ok_or(SizingError::Overflow(what))
}

fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(dec!(100))
}
