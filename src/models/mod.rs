//! Data models for calculator input, market rules, and results.

mod input;
mod market;
mod result;

pub use input::{CalculatorInput, Field, RawInput};
pub use market::{Market, MarketRule, MarketRules};
pub use result::{CalculationResult, RiskWarning};
