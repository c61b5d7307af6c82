// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.

use bookify_common::services::{
    BoxFuture, CalendarEvent, CalendarEventResult, CalendarService, EventListQuery, ListedEvent,
};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, EventReminder, EventReminders};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(google_calendar3::Error),
    /// The API answered 409.
    #[error("Google API reported a conflict: {0}")]
    Conflict(String),
}

impl From<google_calendar3::Error> for GcalServiceError {
    fn from(err: google_calendar3::Error) -> Self {
        if is_conflict(&err) {
            GcalServiceError::Conflict(err.to_string())
        } else {
            GcalServiceError::ApiError(err)
        }
    }
}

/// True when the API rejected the call with HTTP 409.
fn is_conflict(err: &google_calendar3::Error) -> bool {
    match err {
        google_calendar3::Error::BadRequest(body) => {
            body.pointer("/error/code").and_then(|code| code.as_u64()) == Some(409)
        }
        google_calendar3::Error::Failure(response) => response.status().as_u16() == 409,
        _ => false,
    }
}

/// Maps the gateway's event onto the Google wire model.
///
/// `attendees` is always left empty: a service account cannot invite
/// attendees without domain-wide delegation.
pub fn to_google_event(event: &CalendarEvent) -> Event {
    let overrides = event
        .reminder_overrides
        .iter()
        .map(|reminder| EventReminder {
            method: Some(reminder.method.as_str().to_string()),
            minutes: Some(reminder.minutes_before),
        })
        .collect();

    Event {
        summary: Some(event.summary.clone()),
        description: event.description.clone(),
        start: Some(EventDateTime {
            date_time: Some(event.start_time),
            time_zone: Some(event.time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end_time),
            time_zone: Some(event.time_zone.clone()),
            ..Default::default()
        }),
        reminders: Some(EventReminders {
            use_default: Some(event.use_default_reminders),
            overrides: Some(overrides),
        }),
        attendees: None,
        ..Default::default()
    }
}

fn event_time(value: Option<&EventDateTime>) -> Option<DateTime<Utc>> {
    let value = value?;
    // all-day events only carry a date
    value.date_time.or_else(|| {
        value
            .date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

fn from_google_event(event: Event) -> ListedEvent {
    ListedEvent {
        start_time: event_time(event.start.as_ref()),
        end_time: event_time(event.end.as_ref()),
        event_id: event.id,
        summary: event.summary,
        status: event.status.unwrap_or_else(|| "confirmed".to_string()),
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Lists events overlapping the query window with `events.list`.
    ///
    /// `time_min`/`time_max` are the API's overlap bounds: an event is returned
    /// when it ends after `time_min` and starts before `time_max`.
    ///
    /// # Arguments
    ///
    /// * `calendar_id` - The calendar to list (e.g. "primary" or a group calendar address)
    /// * `query` - Window, recurring-event expansion, ordering and result limit
    ///
    /// # Errors
    ///
    /// Returns `GcalServiceError::ApiError` when the request fails or the API
    /// rejects it.
    fn list_events(
        &self,
        calendar_id: &str,
        query: EventListQuery,
    ) -> BoxFuture<'_, Vec<ListedEvent>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut request = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(query.time_min)
                .time_max(query.time_max)
                .single_events(query.single_events);
            if query.order_by_start_time {
                request = request.order_by("startTime");
            }
            if let Some(max_results) = query.max_results {
                request = request.max_results(max_results);
            }

            let (_response, events_list) = request.doit().await?;

            let events: Vec<ListedEvent> = events_list
                .items
                .unwrap_or_default()
                .into_iter()
                .map(from_google_event)
                .collect();
            debug!(
                "events.list on {} [{} - {}) returned {} item(s)",
                calendar_id,
                query.time_min,
                query.time_max,
                events.len()
            );
            Ok(events)
        })
    }

    /// Inserts the event with `events.insert` and returns its id and link.
    ///
    /// # Arguments
    ///
    /// * `calendar_id` - The calendar the event is created in
    /// * `event` - Times, display zone, summary, description and reminders
    ///
    /// # Errors
    ///
    /// Returns a `GcalServiceError` if:
    /// * The API answers 409 (`Conflict`)
    /// * The request fails for any other reason (`ApiError`)
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let new_event = to_google_event(&event);

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                html_link: created_event.html_link,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
