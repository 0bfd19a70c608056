//! Usage event logging.
//!
//! The calculator reports through an injected `EventSink`. Sink failures are
//! logged and swallowed; they never change a calculation outcome.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// A user interaction worth recording.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub element_id: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    /// Interactive session the event came from, if any
    pub session_id: Option<Uuid>,
    pub page: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ClickEvent {
    pub fn new(element_id: impl Into<String>, action: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            action: action.into(),
            timestamp: Utc::now(),
            session_id: None,
            page: page.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_session(mut self, session_id: Option<Uuid>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Destination for usage events.
pub trait EventSink: Send + Sync {
    fn track(&self, event: &ClickEvent) -> Result<()>;
}

/// Writes events as structured log lines.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn track(&self, event: &ClickEvent) -> Result<()> {
        let metadata = serde_json::to_string(&event.metadata)?;
        info!(
            element = %event.element_id,
            action = %event.action,
            page = %event.page,
            session = ?event.session_id,
            metadata = %metadata,
            "Click tracked"
        );
        Ok(())
    }
}

/// Discards events.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn track(&self, _event: &ClickEvent) -> Result<()> {
        Ok(())
    }
}

/// Send an event, logging and dropping any failure.
pub fn track_quietly(sink: &dyn EventSink, event: &ClickEvent) {
    if let Err(e) = sink.track(event) {
        warn!(action = %event.action, error = %e, "Failed to track event");
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingSink, RecordingSink};
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ClickEvent::new("risk_calculator", "calculate_risk", "/risk-calculator")
            .with_meta("market", "MY")
            .with_meta("principal", "10000");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["elementId"], "risk_calculator");
        assert_eq!(json["action"], "calculate_risk");
        assert_eq!(json["metadata"]["market"], "MY");
        assert!(json["sessionId"].is_null());
    }

    #[test]
    fn test_empty_metadata_omitted() {
        let event = ClickEvent::new("risk_calculator", "reset_calculator", "cli");
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_track_quietly_swallows_failures() {
        let event = ClickEvent::new("risk_calculator", "calculate_risk", "cli");
        track_quietly(&FailingSink, &event);
        track_quietly(&NoopSink, &event);
        track_quietly(&TracingSink, &event);

        let recorder = RecordingSink::default();
        track_quietly(&recorder, &event);
        assert_eq!(recorder.actions(), vec!["calculate_risk".to_string()]);
    }
}
