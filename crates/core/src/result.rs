//! Per-event outcomes returned by an event bus.

use serde::Serialize;
use serde_json::Value;

use crate::Event;

/// Why a single event was not accepted.
///
/// Built by the bus adapter, so downstream code matches on a tag instead of
/// probing the shape of whatever the transport produced.
///
/// Serialization is what callers see in HTTP response bodies: `stack` is
/// never serialized there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureCause {
    /// The event failed validation; `text` aggregates every problem found.
    ValidationFailure { text: String },

    /// A runtime failure while delivering the event (e.g. transport error).
    OperationalFailure {
        message: String,
        #[serde(skip_serializing)]
        stack: Option<String>,
    },

    /// Any other failure value with no structured fields.
    OpaqueFailure { value: Value },
}

impl FailureCause {
    pub fn validation(text: impl Into<String>) -> Self {
        Self::ValidationFailure { text: text.into() }
    }

    pub fn operational(message: impl Into<String>) -> Self {
        Self::OperationalFailure {
            message: message.into(),
            stack: None,
        }
    }

    pub fn operational_with_stack(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self::OperationalFailure {
            message: message.into(),
            stack: Some(stack.into()),
        }
    }

    pub fn opaque(value: impl Into<Value>) -> Self {
        Self::OpaqueFailure {
            value: value.into(),
        }
    }
}

/// A non-success outcome: which event failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub event: Event,
    pub cause: FailureCause,
}

impl ResultItem {
    pub fn new(event: Event, cause: FailureCause) -> Self {
        Self { event, cause }
    }
}

/// Categorized result of one `process` call.
///
/// Invariant (upheld by the bus, trusted here): every input event appears in
/// exactly one list, and input order is preserved within each list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResult {
    pub success: Vec<Event>,
    pub invalid: Vec<ResultItem>,
    pub error: Vec<ResultItem>,
}

impl ProcessingResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.success.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn error_count(&self) -> usize {
        self.error.len()
    }

    pub fn failure_count(&self) -> usize {
        self.invalid.len() + self.error.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Every failed item: `invalid` first, then `error`, each in input order.
    pub fn failures(&self) -> impl Iterator<Item = &ResultItem> {
        self.invalid.iter().chain(self.error.iter())
    }
}
