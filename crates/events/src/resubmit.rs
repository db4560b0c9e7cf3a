//! Second pass: failed events -> error events -> error stream.
//!
//! Runs after the primary response has been committed, detached from it.
//! The result of the second `process` call is logged and dropped. It is never
//! aggregated into a response and its failures are never mapped again, so a
//! broken error stream cannot feed back into itself.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use eventgate_core::{Event, ProcessingResult};

use crate::bus::{BusError, EventBus};
use crate::error_event::{ErrorEventConfig, ErrorEventMapper};

/// Counts from the error-stream submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResubmissionSummary {
    pub submitted: usize,
    pub success: usize,
    pub invalid: usize,
    pub error: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResubmissionOutcome {
    /// No error stream configured, or nothing failed.
    Skipped,
    Submitted(ResubmissionSummary),
    /// The second `process` call failed as a whole.
    Failed(BusError),
}

pub struct ErrorResubmitter {
    bus: Arc<dyn EventBus>,
    mapper: Option<ErrorEventMapper>,
}

impl std::fmt::Debug for ErrorResubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorResubmitter")
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

impl ErrorResubmitter {
    /// `config: None` disables error events entirely.
    pub fn new(bus: Arc<dyn EventBus>, config: Option<ErrorEventConfig>) -> Self {
        Self {
            bus,
            mapper: config.map(ErrorEventMapper::new),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mapper.is_some()
    }

    pub fn error_stream(&self) -> Option<&str> {
        self.mapper.as_ref().map(|m| m.config().error_stream.as_str())
    }

    /// Map every failure of `result` and submit them as one batch.
    pub async fn resubmit(&self, result: &ProcessingResult) -> ResubmissionOutcome {
        let Some(mapper) = &self.mapper else {
            return ResubmissionOutcome::Skipped;
        };
        if !result.has_failures() {
            return ResubmissionOutcome::Skipped;
        }

        let error_stream = &mapper.config().error_stream;
        let batch: Vec<Event> = result
            .failures()
            .filter_map(|item| match mapper.map_item(item).into_event() {
                Ok(event) => Some(event),
                Err(e) => {
                    error!(error_stream = %error_stream, "could not encode error event: {e}");
                    None
                }
            })
            .collect();
        if batch.is_empty() {
            return ResubmissionOutcome::Skipped;
        }
        let submitted = batch.len();

        info!(
            submitted,
            error_stream = %error_stream,
            "Producing {submitted} failed events to topic {error_stream}"
        );

        match self.bus.process(batch).await {
            Ok(second) => {
                let summary = ResubmissionSummary {
                    submitted,
                    success: second.success_count(),
                    invalid: second.invalid_count(),
                    error: second.error_count(),
                };
                info!(
                    submitted,
                    success = summary.success,
                    invalid = summary.invalid,
                    error = summary.error,
                    error_stream = %error_stream,
                    "error events submitted"
                );
                ResubmissionOutcome::Submitted(summary)
            }
            Err(e) => {
                error!(submitted, error_stream = %error_stream, "error event submission failed: {e}");
                ResubmissionOutcome::Failed(e)
            }
        }
    }

    /// Run [`resubmit`](Self::resubmit) as a detached task.
    ///
    /// The handle may be dropped; the task keeps running.
    pub fn spawn(self: &Arc<Self>, result: Arc<ProcessingResult>) -> JoinHandle<ResubmissionOutcome> {
        let resubmitter = Arc::clone(self);
        tokio::spawn(async move { resubmitter.resubmit(&result).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use eventgate_core::{FailureCause, ResultItem};

    use crate::InMemoryEventBus;

    /// Records every batch and answers with a fixed response.
    struct RecordingBus {
        calls: Mutex<Vec<Vec<Event>>>,
        reply: Result<ProcessingResult, BusError>,
    }

    impl RecordingBus {
        fn replying(reply: Result<ProcessingResult, BusError>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn calls(&self) -> Vec<Vec<Event>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventBus for RecordingBus {
        async fn process(&self, events: Vec<Event>) -> Result<ProcessingResult, BusError> {
            self.calls.lock().unwrap().push(events);
            self.reply.clone()
        }
    }

    fn config() -> Option<ErrorEventConfig> {
        Some(ErrorEventConfig::new("/error/0.0.3", "errors"))
    }

    fn ev(id: &str) -> Event {
        Event::new(json!({
            "meta": {
                "id": id,
                "uri": "https://example.org/x",
                "dt": "2026-10-14T10:00:00Z",
                "domain": "example.org",
                "topic": "page.edit",
            },
        }))
    }

    fn failed_result() -> ProcessingResult {
        ProcessingResult {
            success: vec![ev("ok")],
            invalid: vec![ResultItem::new(ev("inv"), FailureCause::validation("bad"))],
            error: vec![ResultItem::new(ev("err"), FailureCause::operational("timeout"))],
        }
    }

    #[tokio::test]
    async fn skipped_without_error_stream() {
        let bus = RecordingBus::replying(Ok(ProcessingResult::new()));
        let r = ErrorResubmitter::new(bus.clone(), None);

        assert!(!r.is_enabled());
        assert_eq!(r.resubmit(&failed_result()).await, ResubmissionOutcome::Skipped);
        assert!(bus.calls().is_empty());
    }

    #[tokio::test]
    async fn skipped_when_nothing_failed() {
        let bus = RecordingBus::replying(Ok(ProcessingResult::new()));
        let r = ErrorResubmitter::new(bus.clone(), config());

        let all_ok = ProcessingResult {
            success: vec![ev("a"), ev("b")],
            ..ProcessingResult::default()
        };
        assert_eq!(r.resubmit(&all_ok).await, ResubmissionOutcome::Skipped);
        assert!(bus.calls().is_empty());
    }

    #[tokio::test]
    async fn submits_invalid_then_error_as_one_batch() {
        let bus = RecordingBus::replying(Ok(ProcessingResult::new()));
        let r = ErrorResubmitter::new(bus.clone(), config());

        r.resubmit(&failed_result()).await;

        let calls = bus.calls();
        assert_eq!(calls.len(), 1);
        let ids: Vec<_> = calls[0].iter().map(|e| e.meta_field("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!("inv")), Some(json!("err"))]);
        assert!(calls[0].iter().all(|e| e.topic() == Some("errors")));
        assert_eq!(calls[0][0].as_value()["message"], json!("bad"));
        assert_eq!(calls[0][1].as_value()["message"], json!("timeout"));
    }

    #[tokio::test]
    async fn second_pass_failures_are_not_remapped() {
        // Every error event comes back as an error again.
        let rejecting = ProcessingResult {
            success: vec![],
            invalid: vec![],
            error: vec![
                ResultItem::new(ev("e1"), FailureCause::operational("down")),
                ResultItem::new(ev("e2"), FailureCause::operational("down")),
            ],
        };
        let bus = RecordingBus::replying(Ok(rejecting));
        let r = ErrorResubmitter::new(bus.clone(), config());

        let outcome = r.resubmit(&failed_result()).await;

        assert_eq!(
            outcome,
            ResubmissionOutcome::Submitted(ResubmissionSummary {
                submitted: 2,
                success: 0,
                invalid: 0,
                error: 2,
            })
        );
        assert_eq!(bus.calls().len(), 1);
    }

    #[tokio::test]
    async fn call_level_failure_is_reported_not_propagated() {
        let bus = RecordingBus::replying(Err(BusError::transport("connection reset")));
        let r = ErrorResubmitter::new(bus.clone(), config());

        assert_eq!(
            r.resubmit(&failed_result()).await,
            ResubmissionOutcome::Failed(BusError::transport("connection reset"))
        );
    }

    #[tokio::test]
    async fn spawned_task_reaches_in_memory_error_stream() {
        let bus = Arc::new(InMemoryEventBus::new());
        let r = Arc::new(ErrorResubmitter::new(bus.clone(), config()));

        let outcome = r.spawn(Arc::new(failed_result())).await.unwrap();

        assert!(matches!(outcome, ResubmissionOutcome::Submitted(s) if s.success == 2));
        let produced = bus.produced("errors");
        assert_eq!(produced.len(), 2);
        assert_eq!(produced[0].as_value()["emitter_id"], json!("eventbus"));
    }
}
