use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness endpoint: always 200 while the process serves requests.
pub async fn health_handler() -> Response {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// `GET /ping` answers `pong`.
pub async fn ping_handler() -> &'static str {
    "pong"
}

/// `GET /` answers an empty 200.
pub async fn root_handler() -> StatusCode {
    StatusCode::OK
}
