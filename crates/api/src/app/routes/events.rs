//! Batch ingestion endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
};
use serde_json::Value;
use tracing::{info_span, warn, Instrument};

use eventgate_events::normalize;

use crate::app::{dto, errors, services::GatewayServices};
use crate::context::RequestContext;
use crate::response::ResponseSlot;

/// POST /v1/events?hasty
///
/// Body: one JSON event, or a JSON array of events.
///
/// - 204: every event accepted (or `hasty` was set)
/// - 400: empty body, malformed JSON, or every event invalid (`{invalid}`)
/// - 207: some accepted, some failed (`{invalid, error}`)
/// - 500: every event failed, at least one operationally (`{invalid, error}`)
pub async fn post_events(
    Extension(services): Extension<Arc<GatewayServices>>,
    Query(query): Query<dto::EventsQuery>,
    body: Bytes,
) -> axum::response::Response {
    let raw = match decode(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!("rejected request body: {e}");
            return errors::invalid_json(&e);
        }
    };

    let events = match normalize(raw) {
        Ok(events) => events,
        Err(e) => {
            warn!("{e}");
            return errors::normalize_error_to_response(e);
        }
    };

    let ctx = RequestContext::new(query.is_hasty());
    let span = info_span!(
        "events",
        request_id = %ctx.request_id(),
        batch_size = events.len(),
        hasty = ctx.is_hasty(),
    );

    // Processing runs in its own task so a disconnecting client cannot
    // cancel the bus call or the error resubmission after it.
    let (slot, pending) = ResponseSlot::new();
    tokio::spawn(
        async move { services.process_batch(ctx, events, slot).await }.instrument(span),
    );

    match pending.await {
        Ok(response) => response,
        Err(_) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "request processing ended without a response",
        ),
    }
}

// An empty (or all-whitespace) body decodes to `null`.
fn decode(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}
