//! Position-sizing risk calculator.
//!
//! Validates raw form input, sizes a position as the smaller of the
//! risk-based and capital-based share counts, rounds down to whole lots
//! where the market trades in lots, and attaches advisory warnings.

pub mod analytics;
pub mod calculator;
pub mod error;
pub mod format;
pub mod models;
pub mod report;
pub mod session;

pub use calculator::{CalculationOutcome, CalculatorConfig, RiskCalculator};
pub use error::{FieldError, SizingError, ValidationErrors};
pub use models::{CalculationResult, CalculatorInput, Market, MarketRule, MarketRules, RawInput};
