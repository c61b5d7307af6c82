// --- File: crates/bookify_common/src/lib.rs ---

pub mod error; // Status mapping shared by every error type
pub mod handlers; // Handlers not tied to a feature crate
pub mod http; // JSON error responses
pub mod logging; // Tracing subscriber setup
pub mod routes; // Root route
pub mod services; // Calendar service abstraction

pub use routes::routes;

pub use error::{ErrorBody, HttpStatusCode};

pub use http::error_response;

pub use logging::{init, init_with_level, log_error, log_result};
