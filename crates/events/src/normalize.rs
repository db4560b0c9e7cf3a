//! Inbound payload -> batch of events.

use serde_json::Value;
use thiserror::Error;

use eventgate_core::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Nothing to process; surfaced as 400 before the bus is touched.
    #[error("Must provide JSON encoded events in request body.")]
    EmptyBody,
}

/// Turn a decoded request body into a batch.
///
/// An array passes through in order; any other non-empty value becomes a
/// one-element batch. Schema checks are left to the bus.
pub fn normalize(raw: Value) -> Result<Vec<Event>, NormalizeError> {
    if is_empty(&raw) {
        return Err(NormalizeError::EmptyBody);
    }

    match raw {
        Value::Array(items) => Ok(items.into_iter().map(Event::new).collect()),
        single => Ok(vec![Event::new(single)]),
    }
}

// Scalars carry no events.
fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
