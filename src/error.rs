//! Validation and sizing error types.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::Field;

/// Problem with a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Value missing, unparseable, or outside its domain.
    #[error("{0}")]
    OutOfRange(&'static str),

    /// Stop loss not below the buy price.
    #[error("Stop loss must be lower than buy price")]
    InvalidOrdering,

    #[error("Unknown market '{0}', expected one of MY, SG, CN, HK, US")]
    UnknownMarket(String),
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every field error found in one validation pass, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any earlier one on the same field.
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldError)> {
        self.0.iter()
    }
}

/// Internal fault in the sizer. Unreachable with validated input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_field_error() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::StopLoss, FieldError::OutOfRange("Stop loss must be greater than 0"));
        errors.insert(Field::StopLoss, FieldError::InvalidOrdering);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::StopLoss), Some(&FieldError::InvalidOrdering));
    }

    #[test]
    fn test_serializes_as_field_message_map() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::Principal, FieldError::OutOfRange("Principal must be greater than 0"));
        errors.insert(Field::StopLoss, FieldError::InvalidOrdering);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["principal"], "Principal must be greater than 0");
        assert_eq!(json["stopLoss"], "Stop loss must be lower than buy price");
        assert_eq!(errors.to_string(), "2 field(s) failed validation");
    }
}
