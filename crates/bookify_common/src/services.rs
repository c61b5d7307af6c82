// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for the remote calendar.
//!
//! Handlers talk to the calendar only through [`CalendarService`], so the
//! Google implementation can be swapped for an in-memory one in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl ReminderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Email => "email",
            ReminderMethod::Popup => "popup",
        }
    }
}

/// A reminder that replaces the calendar's default reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes_before: i32,
}

/// An event to insert into a calendar.
///
/// There is no attendee list: a service-account credential without
/// domain-wide delegation cannot invite attendees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
    pub use_default_reminders: bool,
    pub reminder_overrides: Vec<ReminderOverride>,
}

/// What the calendar reports back after an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    /// Shareable link to the event in the calendar UI.
    pub html_link: Option<String>,
    pub status: String,
}

/// Parameters of an event listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListQuery {
    /// Lower bound (exclusive) on an event's end time.
    pub time_min: DateTime<Utc>,
    /// Upper bound (exclusive) on an event's start time.
    pub time_max: DateTime<Utc>,
    /// Expand recurring events into their single occurrences.
    pub single_events: bool,
    /// Order by start time; only meaningful with `single_events`.
    pub order_by_start_time: bool,
    pub max_results: Option<i32>,
}

/// An event as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEvent {
    pub event_id: Option<String>,
    pub summary: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List events overlapping `[query.time_min, query.time_max)`.
    fn list_events(
        &self,
        calendar_id: &str,
        query: EventListQuery,
    ) -> BoxFuture<'_, Vec<ListedEvent>, Self::Error>;

    /// Insert a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}
