use axum::{routing::post, Router};

pub mod events;
pub mod system;

/// Router for the versioned ingestion endpoints (mounted under `/v1`).
pub fn router() -> Router {
    Router::new().route("/events", post(events::post_events))
}
