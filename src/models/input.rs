//! Calculator input, both as entered and after validation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Market;

/// Form fields of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Principal,
    RiskPercentage,
    BuyPrice,
    StopLoss,
    Market,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Principal => "principal",
            Field::RiskPercentage => "riskPercentage",
            Field::BuyPrice => "buyPrice",
            Field::StopLoss => "stopLoss",
            Field::Market => "market",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_market_code() -> String {
    Market::My.as_str().to_string()
}

/// Form state exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    #[serde(default)]
    pub principal: String,

    #[serde(default)]
    pub risk_percentage: String,

    #[serde(default)]
    pub buy_price: String,

    #[serde(default)]
    pub stop_loss: String,

    #[serde(default = "default_market_code")]
    pub market: String,
}

impl RawInput {
    pub fn new(
        principal: impl Into<String>,
        risk_percentage: impl Into<String>,
        buy_price: impl Into<String>,
        stop_loss: impl Into<String>,
        market: impl Into<String>,
    ) -> Self {
        Self {
            principal: principal.into(),
            risk_percentage: risk_percentage.into(),
            buy_price: buy_price.into(),
            stop_loss: stop_loss.into(),
            market: market.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Principal => &self.principal,
            Field::RiskPercentage => &self.risk_percentage,
            Field::BuyPrice => &self.buy_price,
            Field::StopLoss => &self.stop_loss,
            Field::Market => &self.market,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Principal => self.principal = value,
            Field::RiskPercentage => self.risk_percentage = value,
            Field::BuyPrice => self.buy_price = value,
            Field::StopLoss => self.stop_loss = value,
            Field::Market => self.market = value,
        }
    }
}

impl Default for RawInput {
    fn default() -> Self {
        Self::new("", "", "", "", default_market_code())
    }
}

/// Validated calculator input.
///
/// Produced by the validator; the sizer still re-checks the values it divides by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInput {
    /// Total capital available
    pub principal: Decimal,

    /// Share of capital the trader accepts to lose, in percent (0, 100]
    pub risk_percentage: Decimal,

    /// Intended entry price per share
    pub buy_price: Decimal,

    /// Exit price that caps the loss, below `buy_price`
    pub stop_loss: Decimal,

    pub market: Market,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_input_from_json_defaults() {
        let raw: RawInput =
            serde_json::from_str(r#"{"principal": "10000", "buyPrice": "2.5"}"#).unwrap();
        assert_eq!(raw.principal, "10000");
        assert_eq!(raw.buy_price, "2.5");
        assert_eq!(raw.risk_percentage, "");
        assert_eq!(raw.market, "MY");
    }

    #[test]
    fn test_field_access() {
        let mut raw = RawInput::default();
        raw.set(Field::StopLoss, "2.25");
        raw.set(Field::Market, "US");
        assert_eq!(raw.get(Field::StopLoss), "2.25");
        assert_eq!(raw.get(Field::Market), "US");
        assert_eq!(Field::RiskPercentage.to_string(), "riskPercentage");
    }
}
