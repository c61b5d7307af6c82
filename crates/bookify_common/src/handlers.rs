// --- File: crates/bookify_common/src/handlers.rs ---

use axum::Json;
use serde::Serialize;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Answers `GET /` so uptime checks have something cheap to hit.
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Booking backend is running.".to_string(),
    })
}
