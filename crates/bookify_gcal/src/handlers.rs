// File: crates/bookify_gcal/src/handlers.rs
use crate::client::CalendarClient;
use crate::logic::{
    check_availability, create_booking, AvailabilityResponse, BookingError, BookingResponse,
    CheckAvailabilityRequest, CreateBookingRequest,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use bookify_common::HttpStatusCode;
use bookify_config::AppConfig;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// Shared state needed by the booking handlers
#[derive(Clone, Debug)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub client: CalendarClient,
    /// Display zone for created events, resolved once from the config.
    pub time_zone: Tz,
}

impl GcalState {
    pub fn new(config: Arc<AppConfig>, client: CalendarClient) -> Self {
        let time_zone = config.gcal.display_time_zone();
        Self {
            config,
            client,
            time_zone,
        }
    }

    fn calendar_id(&self) -> Result<&str, BookingError> {
        self.config
            .gcal
            .calendar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                error!("GOOGLE_CALENDAR_ID missing at request time");
                BookingError::MissingCalendarId
            })
    }
}

fn log_failure(route: &str, err: &BookingError) {
    if err.status_code() >= 500 {
        error!("{} failed: {}", route, err);
    } else {
        warn!("{} rejected: {}", route, err);
    }
}

fn body_or_bad_request<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BookingError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            BookingError::Validation(format!("Invalid request body: {}", rejection.body_text()))
        })
}

// The readiness check runs before the body is looked at, so an
// uninitialized client answers 503 whatever was sent.
async fn check_slot(
    state: &GcalState,
    payload: Result<Json<CheckAvailabilityRequest>, JsonRejection>,
) -> Result<AvailabilityResponse, BookingError> {
    let service = state.client.service()?;
    let start = body_or_bad_request(payload)?.validate()?;
    let calendar_id = state.calendar_id()?;

    let available = check_availability(service.as_ref(), calendar_id, start).await?;
    info!("Availability for {}: {}", start, available);
    Ok(AvailabilityResponse { available })
}

async fn book_slot(
    state: &GcalState,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<BookingResponse, BookingError> {
    let service = state.client.service()?;
    let booking = body_or_bad_request(payload)?.validate()?;
    let calendar_id = state.calendar_id()?;

    let created = create_booking(service.as_ref(), calendar_id, booking, state.time_zone).await?;
    Ok(BookingResponse::from(created))
}

/// Handler to check whether a 30-minute slot is free.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/check-availability",
    request_body = CheckAvailabilityRequest,
    responses(
        (status = 200, description = "Availability of the slot", body = AvailabilityResponse),
        (status = 400, description = "Missing or invalid startDateTimeISO", body = bookify_common::ErrorBody),
        (status = 500, description = "Configuration or calendar error", body = bookify_common::ErrorBody),
        (status = 503, description = "Calendar client not initialized", body = bookify_common::ErrorBody)
    ),
    tag = "Booking"
))]
pub async fn check_availability_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<CheckAvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>, BookingError> {
    check_slot(&state, payload)
        .await
        .map(Json)
        .inspect_err(|err| log_failure("check-availability", err))
}

/// Handler to create a booking in the configured calendar.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/create-booking",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Event created", body = BookingResponse),
        (status = 400, description = "Missing or invalid fields", body = bookify_common::ErrorBody),
        (status = 409, description = "Slot already taken", body = bookify_common::ErrorBody),
        (status = 500, description = "Configuration or calendar error", body = bookify_common::ErrorBody),
        (status = 503, description = "Calendar client not initialized", body = bookify_common::ErrorBody)
    ),
    tag = "Booking"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, BookingError> {
    book_slot(&state, payload)
        .await
        .map(Json)
        .inspect_err(|err| log_failure("create-booking", err))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    /// `ready` or `uninitialized`
    pub calendar: String,
}

/// Liveness plus calendar readiness. Always 200.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "Booking"
))]
pub async fn health_handler(State(state): State<Arc<GcalState>>) -> Json<HealthResponse> {
    let calendar = if state.client.is_ready() {
        "ready"
    } else {
        "uninitialized"
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        calendar: calendar.to_string(),
    })
}
