// --- File: crates/bookify_gcal/src/logic.rs ---
use crate::service::GcalServiceError;
use axum::response::{IntoResponse, Response};
use bookify_common::error_response;
use bookify_common::services::{
    CalendarEvent, CalendarEventResult, CalendarService, EventListQuery, ReminderMethod,
    ReminderOverride,
};
use bookify_common::HttpStatusCode;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Length of the window probed by an availability check.
pub const PROBE_WINDOW_MINUTES: i64 = 30;
/// Email reminder, one day ahead.
pub const EMAIL_REMINDER_MINUTES: i32 = 24 * 60;
pub const POPUP_REMINDER_MINUTES: i32 = 10;

// --- Error Handling ---
use thiserror::Error;

/// The remote operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CheckAvailability,
    CreateBooking,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CheckAvailability => write!(f, "check availability"),
            Operation::CreateBooking => write!(f, "create booking"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Calendar client is not initialized")]
    ServiceUnavailable,
    #[error("Calendar ID is not configured")]
    MissingCalendarId,
    #[error("Requested slot is already taken")]
    SlotTaken,
    #[error("Calendar call failed during {operation}: {source}")]
    Remote {
        operation: Operation,
        #[source]
        source: GcalServiceError,
    },
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::ServiceUnavailable => 503,
            BookingError::MissingCalendarId => 500,
            BookingError::SlotTaken => 409,
            BookingError::Remote { .. } => 500,
        }
    }

    fn public_message(&self) -> String {
        match self {
            BookingError::Validation(message) => message.clone(),
            BookingError::ServiceUnavailable => {
                "Calendar service is unavailable. Please try again later.".to_string()
            }
            BookingError::MissingCalendarId => {
                "Server configuration error: calendar ID missing.".to_string()
            }
            BookingError::SlotTaken => "This time slot is already booked.".to_string(),
            BookingError::Remote {
                operation: Operation::CheckAvailability,
                ..
            } => "Failed to check availability.".to_string(),
            BookingError::Remote {
                operation: Operation::CreateBooking,
                ..
            } => "Failed to create booking.".to_string(),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

// --- Data Structures ---

/// A time interval under consideration for booking. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::Validation(
                "endDateTimeISO must be after startDateTimeISO".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// The availability probe window `[start, start + 30 min)`.
    pub fn probe(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + Duration::minutes(PROBE_WINDOW_MINUTES),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckAvailabilityRequest {
    /// Start of the desired slot, RFC 3339
    #[serde(rename = "startDateTimeISO")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01T10:00:00Z"))]
    pub start_date_time_iso: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateBookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Consult"))]
    pub summary: Option<String>,
    #[serde(rename = "startDateTimeISO")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01T10:00:00Z"))]
    pub start_date_time_iso: Option<String>,
    #[serde(rename = "endDateTimeISO")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01T10:30:00Z"))]
    pub end_date_time_iso: Option<String>,
    pub description: Option<String>,
    /// Accepted but never invited as an attendee.
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://www.google.com/calendar/event?eid=abc123")
    )]
    pub event_link: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "abc123xyz456"))]
    pub event_id: Option<String>,
}

impl From<CalendarEventResult> for BookingResponse {
    fn from(result: CalendarEventResult) -> Self {
        Self {
            success: true,
            event_link: result.html_link,
            event_id: result.event_id,
        }
    }
}

/// A create-booking request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub summary: String,
    pub slot: Slot,
    pub description: Option<String>,
    pub contact_email: Option<String>,
}

// --- Validation ---

// Blank counts as absent; the text itself is kept as sent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Parses an RFC 3339 timestamp, naming `field` in the error.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, BookingError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            BookingError::Validation(format!("Invalid {field}: expected an RFC 3339 timestamp"))
        })
}

impl CheckAvailabilityRequest {
    pub fn validate(&self) -> Result<DateTime<Utc>, BookingError> {
        let raw = present(&self.start_date_time_iso).ok_or_else(|| {
            BookingError::Validation("Missing required field: startDateTimeISO".to_string())
        })?;
        parse_timestamp("startDateTimeISO", raw)
    }
}

impl CreateBookingRequest {
    pub fn validate(self) -> Result<NewBooking, BookingError> {
        let summary = present(&self.summary);
        let start = present(&self.start_date_time_iso);
        let end = present(&self.end_date_time_iso);

        let (Some(summary), Some(start), Some(end)) = (summary, start, end) else {
            let missing: Vec<&str> = [
                ("summary", summary.is_none()),
                ("startDateTimeISO", start.is_none()),
                ("endDateTimeISO", end.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, is_missing)| is_missing.then_some(name))
            .collect();
            return Err(BookingError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        let slot = Slot::new(
            parse_timestamp("startDateTimeISO", start)?,
            parse_timestamp("endDateTimeISO", end)?,
        )?;

        Ok(NewBooking {
            summary: summary.to_string(),
            slot,
            description: present(&self.description).map(str::to_string),
            contact_email: present(&self.email).map(str::to_string),
        })
    }
}

// --- Availability Logic ---

/// The listing that finds at most one event overlapping `window`, with
/// recurring events expanded.
pub fn availability_query(window: &Slot) -> EventListQuery {
    EventListQuery {
        time_min: window.start(),
        time_max: window.end(),
        single_events: true,
        order_by_start_time: true,
        max_results: Some(1),
    }
}

/// Reports whether the 30-minute window starting at `start` is free.
///
/// # Arguments
///
/// * `service` - The calendar to query
/// * `calendar_id` - The calendar the window is probed in
/// * `start` - Start of the window; the end is `start + 30 min`
///
/// # Returns
///
/// `true` when no event, recurring occurrences included, overlaps the window.
///
/// # Errors
///
/// Returns [`BookingError::Remote`] when the listing fails.
pub async fn check_availability<S>(
    service: &S,
    calendar_id: &str,
    start: DateTime<Utc>,
) -> Result<bool, BookingError>
where
    S: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let window = Slot::probe(start);
    let events = service
        .list_events(calendar_id, availability_query(&window))
        .await
        .map_err(|source| BookingError::Remote {
            operation: Operation::CheckAvailability,
            source,
        })?;

    match events.first() {
        Some(event) => debug!(
            "Window [{} - {}) overlaps {} event {:?} ('{}')",
            window.start(),
            window.end(),
            event.status,
            event.event_id,
            event.summary.as_deref().unwrap_or_default()
        ),
        None => debug!("Window [{} - {}) is free", window.start(), window.end()),
    }
    Ok(events.is_empty())
}

// --- Booking Logic ---

/// The event inserted for a booking: fixed display zone, default reminders
/// off, an email reminder a day ahead and a popup ten minutes ahead.
pub fn booking_event(booking: &NewBooking, time_zone: Tz) -> CalendarEvent {
    CalendarEvent {
        summary: booking.summary.clone(),
        description: booking.description.clone(),
        start_time: booking.slot.start(),
        end_time: booking.slot.end(),
        time_zone: time_zone.name().to_string(),
        use_default_reminders: false,
        reminder_overrides: vec![
            ReminderOverride {
                method: ReminderMethod::Email,
                minutes_before: EMAIL_REMINDER_MINUTES,
            },
            ReminderOverride {
                method: ReminderMethod::Popup,
                minutes_before: POPUP_REMINDER_MINUTES,
            },
        ],
    }
}

/// Inserts the booking as a calendar event.
///
/// The contact email is never added as an attendee.
///
/// # Arguments
///
/// * `service` - The calendar to insert into
/// * `calendar_id` - Target calendar
/// * `booking` - A validated booking
/// * `time_zone` - Display zone written on the event
///
/// # Errors
///
/// * [`BookingError::SlotTaken`] when the calendar answers 409
/// * [`BookingError::Remote`] for any other failure of the insert
pub async fn create_booking<S>(
    service: &S,
    calendar_id: &str,
    booking: NewBooking,
    time_zone: Tz,
) -> Result<CalendarEventResult, BookingError>
where
    S: CalendarService<Error = GcalServiceError> + ?Sized,
{
    if booking.contact_email.is_some() {
        // service accounts cannot invite attendees without delegated authority
        debug!("Contact email supplied for '{}'; not added as attendee", booking.summary);
    }

    let event = booking_event(&booking, time_zone);
    match service.create_event(calendar_id, event).await {
        Ok(result) => {
            info!(
                "Created {} event {:?} for '{}'",
                result.status, result.event_id, booking.summary
            );
            Ok(result)
        }
        Err(GcalServiceError::Conflict(detail)) => {
            info!("Calendar rejected booking as conflicting: {}", detail);
            Err(BookingError::SlotTaken)
        }
        Err(source) => Err(BookingError::Remote {
            operation: Operation::CreateBooking,
            source,
        }),
    }
}
