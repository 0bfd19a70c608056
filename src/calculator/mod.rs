//! Risk calculator: validation, position sizing, warnings.

mod config;
mod engine;
mod position_sizer;
mod validator;
mod warnings;

pub use config::CalculatorConfig;
pub use engine::{CalculationOutcome, CalculationResponse, RiskCalculator, ELEMENT_ID};
pub use position_sizer::PositionSizer;
pub use validator::validate;
pub use warnings::WarningGenerator;
