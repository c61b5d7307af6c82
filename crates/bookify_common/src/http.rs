// --- File: crates/bookify_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorBody, HttpStatusCode};

/// Renders any [`HttpStatusCode`] error as `(status, {"error": message})`.
pub fn error_response<E: HttpStatusCode + ?Sized>(err: &E) -> Response {
    let status_code =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status_code, Json(ErrorBody::new(err.public_message()))).into_response()
}
