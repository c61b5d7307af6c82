// File: crates/bookify_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::HealthResponse;
use crate::logic::{
    AvailabilityResponse, BookingResponse, CheckAvailabilityRequest, CreateBookingRequest,
};
use bookify_common::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::check_availability_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::health_handler
    ),
    components(
        schemas(
            CheckAvailabilityRequest,
            AvailabilityResponse,
            CreateBookingRequest,
            BookingResponse,
            HealthResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "Booking", description = "Google Calendar booking gateway")
    ),
    servers(
        (url = "/api", description = "Booking API server")
    )
)]
pub struct BookingApiDoc;
