//! Failed item -> error event for the configured error stream.

use serde::Serialize;
use serde_json::Value;

use eventgate_core::{Event, FailureCause, ResultItem};

/// `emitter_id` stamped on every error event.
pub const EMITTER_ID: &str = "eventbus";

/// Where error events go and which schema they claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEventConfig {
    pub schema_uri: String,
    pub error_stream: String,
}

impl ErrorEventConfig {
    pub fn new(schema_uri: impl Into<String>, error_stream: impl Into<String>) -> Self {
        Self {
            schema_uri: schema_uri.into(),
            error_stream: error_stream.into(),
        }
    }
}

/// `meta` of an error event. Everything but `topic` is copied from the
/// failed event verbatim (`null` when it had none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEventMeta {
    pub topic: String,
    pub id: Value,
    pub uri: Value,
    pub dt: Value,
    pub domain: Value,
}

/// A record describing why one event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEvent {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub meta: ErrorEventMeta,
    pub emitter_id: String,
    pub raw_event: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEvent {
    /// Re-wrap as an ordinary event so it can go through the bus.
    pub fn into_event(self) -> Result<Event, serde_json::Error> {
        serde_json::to_value(&self).map(Event::new)
    }
}

/// Builds error events; pure, no IO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEventMapper {
    config: ErrorEventConfig,
}

impl ErrorEventMapper {
    pub fn new(config: ErrorEventConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ErrorEventConfig {
        &self.config
    }

    pub fn to_error_event(&self, event: &Event, cause: &FailureCause) -> ErrorEvent {
        let copied = |field: &str| event.meta_field(field).cloned().unwrap_or(Value::Null);
        let (message, stack) = describe(cause);

        ErrorEvent {
            schema: self.config.schema_uri.clone(),
            meta: ErrorEventMeta {
                topic: self.config.error_stream.clone(),
                id: copied("id"),
                uri: copied("uri"),
                dt: copied("dt"),
                domain: copied("domain"),
            },
            emitter_id: EMITTER_ID.to_string(),
            raw_event: event.to_raw_string(),
            message,
            stack,
        }
    }

    pub fn map_item(&self, item: &ResultItem) -> ErrorEvent {
        self.to_error_event(&item.event, &item.cause)
    }
}

fn describe(cause: &FailureCause) -> (String, Option<String>) {
    match cause {
        FailureCause::ValidationFailure { text } => (text.clone(), None),
        FailureCause::OperationalFailure { message, stack } => (message.clone(), stack.clone()),
        FailureCause::OpaqueFailure { value: Value::String(s) } => (s.clone(), None),
        FailureCause::OpaqueFailure { value } => (value.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapper() -> ErrorEventMapper {
        ErrorEventMapper::new(ErrorEventConfig::new("/error/0.0.3", "eventgate.error"))
    }

    fn event() -> Event {
        Event::new(json!({
            "meta": {
                "id": "b0a1",
                "uri": "https://example.org/wiki/Main",
                "dt": "2026-10-14T09:00:00Z",
                "domain": "example.org",
                "topic": "page.edit",
            },
            "rev": 42,
        }))
    }

    #[test]
    fn validation_failure_maps_text_to_message() {
        let err = mapper().to_error_event(&event(), &FailureCause::validation("meta.dt must be an RFC 3339 timestamp"));

        assert_eq!(err.schema, "/error/0.0.3");
        assert_eq!(err.emitter_id, "eventbus");
        assert_eq!(err.message, "meta.dt must be an RFC 3339 timestamp");
        assert_eq!(err.stack, None);
        assert_eq!(
            err.meta,
            ErrorEventMeta {
                topic: "eventgate.error".to_string(),
                id: json!("b0a1"),
                uri: json!("https://example.org/wiki/Main"),
                dt: json!("2026-10-14T09:00:00Z"),
                domain: json!("example.org"),
            }
        );
        assert_eq!(err.raw_event, event().as_value().to_string());
    }

    #[test]
    fn operational_failure_keeps_stack() {
        let cause = FailureCause::operational_with_stack("broker timeout", "at produce");
        let err = mapper().to_error_event(&event(), &cause);
        assert_eq!(err.message, "broker timeout");
        assert_eq!(err.stack.as_deref(), Some("at produce"));
    }

    #[test]
    fn opaque_failure_is_stringified() {
        let m = mapper();
        assert_eq!(m.to_error_event(&event(), &FailureCause::opaque("nope")).message, "nope");
        assert_eq!(
            m.to_error_event(&event(), &FailureCause::opaque(json!({ "code": 7 }))).message,
            r#"{"code":7}"#
        );
    }

    #[test]
    fn missing_meta_is_copied_as_null_and_strings_kept_raw() {
        let err = mapper().to_error_event(&Event::new(json!("not json at all")), &FailureCause::validation("x"));
        assert_eq!(err.meta.id, Value::Null);
        assert_eq!(err.meta.topic, "eventgate.error");
        assert_eq!(err.raw_event, "not json at all");
    }

    #[test]
    fn mapping_is_idempotent() {
        let m = mapper();
        let item = ResultItem::new(event(), FailureCause::operational("timeout"));
        assert_eq!(m.map_item(&item), m.map_item(&item));
    }

    #[test]
    fn into_event_matches_serialized_form() {
        let with_stack = mapper().to_error_event(&event(), &FailureCause::operational_with_stack("m", "s"));
        let without = mapper().to_error_event(&event(), &FailureCause::validation("v"));

        for err in [with_stack, without] {
            let serialized = serde_json::to_value(&err).unwrap();
            let ev = err.into_event().unwrap();
            assert_eq!(ev.as_value(), &serialized);
            assert_eq!(ev.topic(), Some("eventgate.error"));
        }
        assert!(serde_json::to_value(mapper().to_error_event(&event(), &FailureCause::validation("v")))
            .unwrap()
            .get("stack")
            .is_none());
    }
}
