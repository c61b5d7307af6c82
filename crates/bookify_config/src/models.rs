// --- File: crates/bookify_config/src/models.rs ---

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIME_ZONE: &str = "Europe/Zurich";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16, // PORT or BOOKIFY__SERVER__PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// --- Google Calendar Config ---
// The three credential fields come from the environment:
// GOOGLE_CLIENT_EMAIL, GOOGLE_PRIVATE_KEY, GOOGLE_CALENDAR_ID
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub client_email: Option<String>,
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub calendar_id: Option<String>,
    /// IANA name of the zone events are displayed in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            client_email: None,
            private_key: None,
            calendar_id: None,
            time_zone: default_time_zone(),
        }
    }
}

impl GcalConfig {
    /// True when the client email, private key and calendar ID are all set.
    pub fn has_credentials(&self) -> bool {
        self.missing_credentials().is_empty()
    }

    /// Names of the credential variables that are missing, in env var form.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("GOOGLE_CLIENT_EMAIL", &self.client_email),
            ("GOOGLE_PRIVATE_KEY", &self.private_key),
            ("GOOGLE_CALENDAR_ID", &self.calendar_id),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }

    /// Parses `time_zone`, falling back to Europe/Zurich on an unknown name.
    pub fn display_time_zone(&self) -> Tz {
        Tz::from_str(&self.time_zone).unwrap_or_else(|_| {
            warn!(
                "Unknown time zone '{}', falling back to {}",
                self.time_zone, DEFAULT_TIME_ZONE
            );
            Tz::Europe__Zurich
        })
    }
}

// Keep the private key out of logs.
impl fmt::Debug for GcalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcalConfig")
            .field("client_email", &self.client_email)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("calendar_id", &self.calendar_id)
            .field("time_zone", &self.time_zone)
            .finish()
    }
}

// --- Cross-origin Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

pub fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://localhost:5500".to_string(),
        "http://127.0.0.1:5500".to_string(),
    ]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.allowed_origins
            .iter()
            .any(|allowed| allowed.trim_end_matches('/') == origin)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}
