// --- File: crates/bookify_common/src/routes.rs ---

use axum::{routing::get, Router};

use crate::handlers::root_handler;

/// Routes that live outside the `/api` prefix.
pub fn routes() -> Router {
    Router::new().route("/", get(root_handler))
}
