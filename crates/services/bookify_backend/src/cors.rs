// File: services/bookify_backend/src/cors.rs
//! Cross-origin policy: a fixed allow-list.
//!
//! Requests without an `Origin` header (curl, same-origin navigation) pass.
//! A disallowed origin is refused with 403 before it reaches any route.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bookify_common::{error_response, HttpStatusCode};
use bookify_config::CorsConfig;
use http::{header, HeaderValue, Method};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Error, Debug)]
pub enum CorsError {
    #[error("Origin '{0}' is not allowed")]
    OriginNotAllowed(String),
}

impl HttpStatusCode for CorsError {
    fn status_code(&self) -> u16 {
        403
    }

    fn public_message(&self) -> String {
        "Not allowed by CORS".to_string()
    }
}

impl IntoResponse for CorsError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

/// Rejects requests whose `Origin` is not on the allow-list.
pub async fn origin_guard(
    State(cors): State<Arc<CorsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = String::from_utf8_lossy(origin.as_bytes());
        if !cors.is_allowed(&origin) {
            let err = CorsError::OriginNotAllowed(origin.into_owned());
            warn!("{} {}: {}", request.method(), request.uri().path(), err);
            return err.into_response();
        }
    }
    next.run(request).await
}

/// Response headers (and preflight answers) for allowed origins.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unusable allowed origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
