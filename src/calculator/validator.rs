//! Input validation: raw form strings to a `CalculatorInput`.
//!
//! Every field is checked on each pass so the caller can show all
//! problems at once.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::{FieldError, SizingError, ValidationErrors};
use crate::models::{CalculatorInput, Field, Market, MarketRules, RawInput};

use super::{CalculatorConfig, PositionSizer};

const PRINCIPAL_RANGE: &str = "Principal must be greater than 0";
const RISK_RANGE: &str = "Risk percentage must be greater than 0% and at most 100%";
const BUY_PRICE_RANGE: &str = "Buy price must be greater than 0";
const STOP_LOSS_RANGE: &str = "Stop loss must be greater than 0";
const PRINCIPAL_SCALE: &str = "Principal is too large for these prices";

/// Parse a locale-invariant decimal. Empty or non-numeric text yields `None`.
///
/// Only digits, one leading sign and a decimal point are accepted; digit
/// separators such as `_` or `,` are rejected.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Validate raw form input.
pub fn validate(
    raw: &RawInput,
    config: &CalculatorConfig,
) -> Result<CalculatorInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let principal = parse_decimal(&raw.principal);
    let risk_percentage = parse_decimal(&raw.risk_percentage);
    let buy_price = parse_decimal(&raw.buy_price);
    let stop_loss = parse_decimal(&raw.stop_loss);

    if !principal.is_some_and(|v| v > Decimal::ZERO) {
        errors.insert(Field::Principal, FieldError::OutOfRange(PRINCIPAL_RANGE));
    }

    if !risk_percentage.is_some_and(|v| v > Decimal::ZERO && v <= dec!(100)) {
        errors.insert(Field::RiskPercentage, FieldError::OutOfRange(RISK_RANGE));
    }

    if !buy_price.is_some_and(|v| v > Decimal::ZERO) {
        errors.insert(Field::BuyPrice, FieldError::OutOfRange(BUY_PRICE_RANGE));
    }

    if !stop_loss.is_some_and(|v| v > Decimal::ZERO) {
        errors.insert(Field::StopLoss, FieldError::OutOfRange(STOP_LOSS_RANGE));
    }

    // Ordering replaces the range error on stopLoss.
    if let (Some(buy), Some(stop)) = (buy_price, stop_loss) {
        if stop >= buy {
            errors.insert(Field::StopLoss, FieldError::InvalidOrdering);
        }
    }

    let market = Market::from_code(&raw.market);
    if market.is_none() && config.strict_markets {
        errors.insert(Field::Market, FieldError::UnknownMarket(raw.market.trim().to_string()));
    }

    let input = match (principal, risk_percentage, buy_price, stop_loss) {
        (Some(principal), Some(risk_percentage), Some(buy_price), Some(stop_loss))
            if errors.is_empty() =>
        {
            CalculatorInput {
                principal,
                risk_percentage,
                buy_price,
                stop_loss,
                market: market.unwrap_or_else(|| MarketRules::lookup_code(&raw.market).market),
            }
        }
        _ => return Err(rejected(raw, errors)),
    };

    // Share counts must stay representable for every accepted input.
    if let Err(SizingError::Overflow(what)) =
        PositionSizer::compute(&input, MarketRules::lookup(input.market))
    {
        debug!(quantity = what, "Sizing out of range");
        errors.insert(Field::Principal, FieldError::OutOfRange(PRINCIPAL_SCALE));
        return Err(rejected(raw, errors));
    }

    Ok(input)
}

fn rejected(raw: &RawInput, errors: ValidationErrors) -> ValidationErrors {
    for (field, error) in errors.iter() {
        debug!(field = %field, value = %raw.get(*field), error = %error, "Field rejected");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(principal: &str, risk: &str, buy: &str, stop: &str, market: &str) -> RawInput {
        RawInput::new(principal, risk, buy, stop, market)
    }

    fn check(input: &RawInput) -> Result<CalculatorInput, ValidationErrors> {
        validate(input, &CalculatorConfig::default())
    }

    #[test]
    fn test_valid_input() {
        let input = check(&raw("10000", "2", "2.50", "2.25", "MY")).unwrap();
        assert_eq!(input.principal, dec!(10000));
        assert_eq!(input.risk_percentage, dec!(2));
        assert_eq!(input.buy_price, dec!(2.50));
        assert_eq!(input.stop_loss, dec!(2.25));
        assert_eq!(input.market, Market::My);
    }

    #[test]
    fn test_trims_whitespace() {
        let input = check(&raw(" 5000 ", "1.5\n", "\t10", "9", " us")).unwrap();
        assert_eq!(input.principal, dec!(5000));
        assert_eq!(input.market, Market::Us);
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = check(&raw("", "abc", "-1", "0", "MY")).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::Principal),
            Some(&FieldError::OutOfRange(PRINCIPAL_RANGE))
        );
        assert_eq!(
            errors.get(Field::RiskPercentage),
            Some(&FieldError::OutOfRange(RISK_RANGE))
        );
        assert_eq!(
            errors.get(Field::BuyPrice),
            Some(&FieldError::OutOfRange(BUY_PRICE_RANGE))
        );
        // 0 >= -1 parses on both sides, so the ordering error wins.
        assert_eq!(errors.get(Field::StopLoss), Some(&FieldError::InvalidOrdering));
    }

    #[test]
    fn test_risk_percentage_bounds() {
        assert!(check(&raw("1000", "100", "10", "9", "MY")).is_ok());
        assert!(check(&raw("1000", "0.01", "10", "9", "MY")).is_ok());

        for bad in ["0", "100.01", "-2", "NaN", "inf"] {
            let errors = check(&raw("1000", bad, "10", "9", "MY")).unwrap_err();
            assert!(errors.get(Field::RiskPercentage).is_some(), "accepted {}", bad);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_stop_equal_to_buy_is_invalid_ordering() {
        let errors = check(&raw("1000", "2", "10", "10", "MY")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::StopLoss), Some(&FieldError::InvalidOrdering));
    }

    #[test]
    fn test_stop_above_buy_is_invalid_ordering() {
        let errors = check(&raw("1000", "2", "10", "12", "MY")).unwrap_err();
        assert_eq!(errors.get(Field::StopLoss), Some(&FieldError::InvalidOrdering));
    }

    #[test]
    fn test_ordering_skipped_when_buy_unparseable() {
        let errors = check(&raw("1000", "2", "", "12", "MY")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(Field::BuyPrice).is_some());
        assert!(errors.get(Field::StopLoss).is_none());
    }

    #[test]
    fn test_rejects_digit_separators() {
        for bad in ["1_000", "1,000", "1e3", "++5", "-"] {
            let errors = check(&raw(bad, "2", "10", "9", "MY")).unwrap_err();
            assert!(errors.get(Field::Principal).is_some(), "accepted {}", bad);
        }
        let input = check(&raw("1000.50", "2", "10", "9", "MY")).unwrap();
        assert_eq!(input.principal, dec!(1000.50));
    }

    #[test]
    fn test_principal_too_large_to_size() {
        let errors = check(&raw("100000000000000000000", "1", "1", "0.5", "US")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Principal),
            Some(&FieldError::OutOfRange(PRINCIPAL_SCALE))
        );

        let max = Decimal::MAX.to_string();
        let errors = check(&raw(&max, "1", "1", "0.5", "US")).unwrap_err();
        assert!(errors.get(Field::Principal).is_some());
    }

    #[test]
    fn test_unknown_market_permissive_falls_back() {
        let input = check(&raw("1000", "2", "10", "9", "JP")).unwrap();
        assert_eq!(input.market, Market::My);
    }

    #[test]
    fn test_unknown_market_strict_rejected() {
        let config = CalculatorConfig {
            strict_markets: true,
            ..Default::default()
        };
        let errors = validate(&raw("1000", "2", "10", "9", "JP"), &config).unwrap_err();
        assert_eq!(
            errors.get(Field::Market),
            Some(&FieldError::UnknownMarket("JP".to_string()))
        );
    }
}
