use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use eventgate_events::{BusError, NormalizeError};

pub fn normalize_error_to_response(err: NormalizeError) -> axum::response::Response {
    match err {
        NormalizeError::EmptyBody => json_error(StatusCode::BAD_REQUEST, "empty_body", err.to_string()),
    }
}

pub fn bus_error_to_response(err: &BusError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "bus_unavailable", err.to_string())
}

pub fn invalid_json(err: &serde_json::Error) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_json",
        format!("request body is not valid JSON: {err}"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
