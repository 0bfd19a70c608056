//! Calculator engine: validate, size, warn, then report usage.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analytics::{track_quietly, ClickEvent, EventSink, NoopSink};
use crate::error::{SizingError, ValidationErrors};
use crate::models::{CalculationResult, CalculatorInput, Field, MarketRule, MarketRules, RawInput};

use super::{validate, CalculatorConfig, PositionSizer, WarningGenerator};

pub const ELEMENT_ID: &str = "risk_calculator";

/// Outcome of one Calculate action.
#[derive(Debug, Clone)]
pub enum CalculationOutcome {
    Calculated {
        input: CalculatorInput,
        rule: &'static MarketRule,
        result: CalculationResult,
    },
    Invalid(ValidationErrors),
}

impl CalculationOutcome {
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Self::Calculated { result, .. } => Some(result),
            Self::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Calculated { .. } => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// Wire shape: result plus field messages, one of them empty.
    pub fn to_response(&self) -> CalculationResponse {
        match self {
            Self::Calculated { result, .. } => CalculationResponse {
                result: Some(result.clone()),
                validation_errors: BTreeMap::new(),
            },
            Self::Invalid(errors) => CalculationResponse {
                result: None,
                validation_errors: errors
                    .iter()
                    .map(|(field, error)| (*field, error.to_string()))
                    .collect(),
            },
        }
    }
}

/// Serializable calculation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub result: Option<CalculationResult>,
    pub validation_errors: BTreeMap<Field, String>,
}

/// Stateless calculator. Safe to share across threads.
pub struct RiskCalculator {
    config: CalculatorConfig,
    warnings: WarningGenerator,
    sink: Arc<dyn EventSink>,
}

impl RiskCalculator {
    pub fn new(config: CalculatorConfig, sink: Arc<dyn EventSink>) -> Self {
        let warnings = WarningGenerator::new(&config);
        Self {
            config,
            warnings,
            sink,
        }
    }

    /// Calculator that does not report usage.
    pub fn without_analytics(config: CalculatorConfig) -> Self {
        Self::new(config, Arc::new(NoopSink))
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    /// Run one calculation from raw form input.
    pub fn calculate(&self, raw: &RawInput) -> Result<CalculationOutcome, SizingError> {
        self.calculate_in_session(raw, None)
    }

    /// Same as `calculate`, tagging the usage event with a session.
    pub fn calculate_in_session(
        &self,
        raw: &RawInput,
        session_id: Option<Uuid>,
    ) -> Result<CalculationOutcome, SizingError> {
        let input = match validate(raw, &self.config) {
            Ok(input) => input,
            Err(errors) => return Ok(CalculationOutcome::Invalid(errors)),
        };

        let rule = MarketRules::lookup(input.market);
        let sized = PositionSizer::compute(&input, rule)?;
        let warnings = self.warnings.warnings(&input, rule, &sized);
        let result = sized.with_warnings(warnings);

        info!(
            market = %input.market,
            shares = result.max_shares,
            lots = ?result.max_lots,
            position_value = %result.position_value,
            warnings = result.warnings.len(),
            "Position calculated"
        );

        let event = ClickEvent::new(ELEMENT_ID, "calculate_risk", &self.config.page)
            .with_session(session_id)
            .with_meta("principal", raw.principal.clone())
            .with_meta("riskPercentage", raw.risk_percentage.clone())
            .with_meta("market", raw.market.clone());
        track_quietly(self.sink.as_ref(), &event);

        Ok(CalculationOutcome::Calculated {
            input,
            rule,
            result,
        })
    }
}
