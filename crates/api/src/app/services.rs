//! Per-request processing: bus call, verdict, response, error-stream handoff.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{debug, error, warn};

use eventgate_core::{Event, ProcessingResult};
use eventgate_events::{
    aggregate, BusError, ErrorEventConfig, ErrorResubmitter, EventBus, LogLevel, Outcome, Verdict,
};

use crate::app::errors;
use crate::context::RequestContext;
use crate::response::ResponseSlot;

/// Collaborators shared by every request.
///
/// Built once at startup and passed to each request explicitly; nothing in
/// here is mutated afterwards.
pub struct GatewayServices {
    bus: Arc<dyn EventBus>,
    resubmitter: Arc<ErrorResubmitter>,
}

impl std::fmt::Debug for GatewayServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServices")
            .field("resubmitter", &self.resubmitter)
            .finish_non_exhaustive()
    }
}

impl GatewayServices {
    pub fn new(bus: Arc<dyn EventBus>, error_events: Option<ErrorEventConfig>) -> Self {
        let resubmitter = Arc::new(ErrorResubmitter::new(bus.clone(), error_events));
        Self { bus, resubmitter }
    }

    /// Run one normalized batch to completion.
    ///
    /// Commits exactly one response to `slot`: the hasty 204 if requested,
    /// otherwise the aggregated outcome. Only after that does the result move
    /// on to the detached error resubmission.
    pub async fn process_batch(&self, ctx: RequestContext, events: Vec<Event>, mut slot: ResponseSlot) {
        let total = events.len();

        if ctx.is_hasty() {
            debug!("{total} events hastily received.");
            slot.commit(StatusCode::NO_CONTENT.into_response());
        }

        let result = match self.bus.process(events).await {
            Ok(result) => result,
            Err(e) => {
                self.fail(&e, &mut slot);
                return;
            }
        };

        let outcome = aggregate(total, &result);
        log_outcome(&outcome);

        if slot.is_committed() {
            debug!(
                status = outcome.http_status(),
                "response already committed; outcome not written"
            );
        } else {
            slot.commit(outcome_to_response(outcome));
        }

        self.hand_off(result);
    }

    fn fail(&self, err: &BusError, slot: &mut ResponseSlot) {
        error!("event bus call failed: {err}");
        if !slot.commit(errors::bus_error_to_response(err)) {
            debug!("response already committed; bus failure not written");
        }
    }

    fn hand_off(&self, result: ProcessingResult) {
        if self.resubmitter.is_enabled() && result.has_failures() {
            // Detached: not awaited, and not cancelled with the request.
            drop(self.resubmitter.spawn(Arc::new(result)));
        }
    }
}

fn log_outcome(outcome: &Outcome) {
    let status = outcome.http_status();
    let message = &outcome.message;
    match outcome.log_level {
        LogLevel::Debug => debug!(status, "{message}"),
        LogLevel::Warn => warn!(status, body = ?outcome.body, "{message}"),
        LogLevel::Error => error!(status, body = ?outcome.body, "{message}"),
    }
}

pub fn outcome_to_response(outcome: Outcome) -> axum::response::Response {
    let status = match outcome.verdict {
        Verdict::Accepted => StatusCode::NO_CONTENT,
        Verdict::AllInvalid => StatusCode::BAD_REQUEST,
        Verdict::MultiStatus => StatusCode::MULTI_STATUS,
        Verdict::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    match outcome.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}
