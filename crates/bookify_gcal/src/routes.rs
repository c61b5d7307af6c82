// --- File: crates/bookify_gcal/src/routes.rs ---

use crate::handlers::{
    check_availability_handler, create_booking_handler, health_handler, GcalState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Booking routes, relative to the `/api` prefix, over an already built state.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/check-availability", post(check_availability_handler))
        .route("/create-booking", post(create_booking_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
