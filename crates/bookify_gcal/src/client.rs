// --- File: crates/bookify_gcal/src/client.rs ---
//! The process-wide calendar client handle.
//!
//! Built once at startup and never changed afterwards. If the credential
//! exchange fails the handle stays [`CalendarClient::Uninitialized`] for the
//! lifetime of the process.

use bookify_common::services::CalendarService;
use bookify_config::GcalConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::{create_calendar_hub, GcalAuthError};
use crate::logic::BookingError;
use crate::service::{GcalServiceError, GoogleCalendarService};

pub type SharedCalendarService = Arc<dyn CalendarService<Error = GcalServiceError>>;

#[derive(Clone)]
pub enum CalendarClient {
    Uninitialized,
    Ready(SharedCalendarService),
}

impl CalendarClient {
    /// Exchanges the service-account credential for a session. Never retries.
    pub async fn connect(config: &GcalConfig) -> Self {
        match create_calendar_hub(config).await {
            Ok(hub) => {
                info!("Google Calendar client ready");
                CalendarClient::Ready(Arc::new(GoogleCalendarService::new(Arc::new(hub))))
            }
            Err(GcalAuthError::MissingCredentials(missing)) => {
                warn!(
                    "Google Calendar client not initialized, missing: {}",
                    missing.join(", ")
                );
                CalendarClient::Uninitialized
            }
            Err(err) => {
                error!("Google Calendar client initialization failed: {}", err);
                CalendarClient::Uninitialized
            }
        }
    }

    pub fn ready(service: SharedCalendarService) -> Self {
        CalendarClient::Ready(service)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CalendarClient::Ready(_))
    }

    /// The service, or `ServiceUnavailable` when initialization failed.
    pub fn service(&self) -> Result<&SharedCalendarService, BookingError> {
        match self {
            CalendarClient::Ready(service) => Ok(service),
            CalendarClient::Uninitialized => Err(BookingError::ServiceUnavailable),
        }
    }
}

impl fmt::Debug for CalendarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarClient::Uninitialized => write!(f, "CalendarClient::Uninitialized"),
            CalendarClient::Ready(_) => write!(f, "CalendarClient::Ready"),
        }
    }
}
