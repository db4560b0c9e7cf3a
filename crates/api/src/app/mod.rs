//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: the bus, the error resubmitter, and the per-request pipeline
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower::ServiceBuilder;

use eventgate_events::EventBus;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `bus` is shared by every request; pass any [`EventBus`] implementation.
pub fn build_app(config: &AppConfig, bus: Arc<dyn EventBus>) -> Router {
    let services = Arc::new(services::GatewayServices::new(bus, config.error_events.clone()));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/v1", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
}
