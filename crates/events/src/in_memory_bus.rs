//! In-memory event bus for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tracing::debug;

use eventgate_core::{Event, FailureCause, ProcessingResult, ResultItem, META_FIELDS};

use crate::bus::{BusError, EventBus};

/// In-memory validating bus.
///
/// - Checks the `meta` block of every event (see [`validate`])
/// - Appends valid events to a per-topic log
/// - Topics marked unavailable fail their events operationally
/// - No IO; the lock is never held across an await
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    topics: Mutex<HashMap<String, Vec<Event>>>,
    unavailable: Mutex<HashSet<String>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every event for `topic` fail with an operational error.
    pub fn mark_unavailable(&self, topic: impl Into<String>) {
        if let Ok(mut set) = self.unavailable.lock() {
            set.insert(topic.into());
        }
    }

    pub fn mark_available(&self, topic: &str) {
        if let Ok(mut set) = self.unavailable.lock() {
            set.remove(topic);
        }
    }

    /// Events produced to `topic` so far, in production order.
    pub fn produced(&self, topic: &str) -> Vec<Event> {
        self.topics
            .lock()
            .map(|topics| topics.get(topic).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn produced_count(&self) -> usize {
        self.topics
            .lock()
            .map(|topics| topics.values().map(Vec::len).sum())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn process(&self, events: Vec<Event>) -> Result<ProcessingResult, BusError> {
        let unavailable = self
            .unavailable
            .lock()
            .map_err(|_| BusError::unavailable("in-memory bus lock poisoned"))?
            .clone();
        let mut topics = self
            .topics
            .lock()
            .map_err(|_| BusError::unavailable("in-memory bus lock poisoned"))?;

        let mut result = ProcessingResult::new();
        for event in events {
            let topic = match validate(&event) {
                Ok(topic) => topic.to_string(),
                Err(text) => {
                    result.invalid.push(ResultItem::new(event, FailureCause::validation(text)));
                    continue;
                }
            };

            if unavailable.contains(&topic) {
                let cause = FailureCause::operational(format!("topic {topic} is unavailable"));
                result.error.push(ResultItem::new(event, cause));
                continue;
            }

            topics.entry(topic).or_default().push(event.clone());
            result.success.push(event);
        }

        debug!(
            success = result.success_count(),
            invalid = result.invalid_count(),
            error = result.error_count(),
            "in-memory bus processed batch"
        );

        Ok(result)
    }
}

/// Check the `meta` block of an event, returning its topic.
///
/// Every problem is reported, joined into one human-readable text.
pub fn validate(event: &Event) -> Result<&str, String> {
    let Some(obj) = event.as_value().as_object() else {
        return Err("event must be a JSON object".to_string());
    };
    let meta = match obj.get("meta") {
        None => return Err("meta is required".to_string()),
        Some(Value::Object(meta)) => meta,
        Some(_) => return Err("meta must be an object".to_string()),
    };

    let mut problems = Vec::new();
    for field in META_FIELDS {
        match meta.get(field) {
            None | Some(Value::Null) => problems.push(format!("meta.{field} is required")),
            Some(Value::String(s)) if field == "dt" => {
                if DateTime::parse_from_rfc3339(s).is_err() {
                    problems.push("meta.dt must be an RFC 3339 timestamp".to_string());
                }
            }
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(_) if field == "dt" => {
                problems.push("meta.dt must be an RFC 3339 timestamp".to_string());
            }
            Some(_) => problems.push(format!("meta.{field} must be a non-empty string")),
        }
    }

    match (problems.is_empty(), event.topic()) {
        (true, Some(topic)) => Ok(topic),
        _ => Err(problems.join(", ")),
    }
}
