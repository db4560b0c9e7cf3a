use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata fields every event is expected to carry under `meta`.
pub const META_FIELDS: [&str; 5] = ["id", "uri", "dt", "domain", "topic"];

/// An inbound domain record.
///
/// Events are opaque to the gateway: the only structure it reads is the
/// `meta` block (`id`, `uri`, `dt`, `domain`, `topic`). Schema correctness is
/// the bus's responsibility, so an `Event` may hold any JSON value, including
/// one that turns out to be invalid.
///
/// Events are never mutated; failures re-wrap them into new records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Value);

impl Event {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `meta` block, if the event is an object that has one.
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.0.get("meta").and_then(Value::as_object)
    }

    /// A single `meta` field, verbatim.
    pub fn meta_field(&self, name: &str) -> Option<&Value> {
        self.meta().and_then(|meta| meta.get(name))
    }

    /// Destination topic (`meta.topic`) when it is a string.
    pub fn topic(&self) -> Option<&str> {
        self.meta_field("topic").and_then(Value::as_str)
    }

    /// Canonical string form of the event.
    ///
    /// An event that already is a JSON string is returned as-is; anything
    /// else is serialized as compact JSON.
    pub fn to_raw_string(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Self {
        event.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        Event::new(json!({
            "meta": {
                "id": "5a7d0b6e-0000-7000-8000-000000000001",
                "uri": "https://example.org/page/1",
                "dt": "2026-10-14T12:00:00Z",
                "domain": "example.org",
                "topic": "page.create",
            },
            "page_title": "Main Page",
        }))
    }

    #[test]
    fn meta_fields_are_read_verbatim() {
        let ev = sample();
        assert_eq!(ev.topic(), Some("page.create"));
        assert_eq!(ev.meta_field("domain"), Some(&json!("example.org")));
        assert_eq!(ev.meta_field("missing"), None);
    }

    #[test]
    fn events_without_meta_have_no_topic() {
        assert!(Event::new(json!({"page_title": "x"})).meta().is_none());
        assert!(Event::new(json!("just a string")).topic().is_none());
        assert!(Event::new(json!({"meta": "not an object"})).meta().is_none());
    }

    #[test]
    fn raw_string_keeps_strings_and_serializes_the_rest() {
        assert_eq!(Event::new(json!("raw text")).to_raw_string(), "raw text");
        assert_eq!(Event::new(json!({"a": 1})).to_raw_string(), r#"{"a":1}"#);
    }

    #[test]
    fn serializes_transparently() {
        let ev = sample();
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(&value, ev.as_value());
    }
}
