use serde::{Deserialize, Serialize};

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by every error type that can cross the HTTP boundary, so that
/// handlers render them the same way (see [`crate::http::error_response`]).
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;

    /// Message shown to the caller. Internal detail (remote error text,
    /// credentials) stays in `Display` and goes to the logs only.
    fn public_message(&self) -> String;
}

/// JSON body of every error response: `{ "error": "..." }`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[cfg_attr(feature = "openapi", schema(example = "This time slot is already booked."))]
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
