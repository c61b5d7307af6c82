// File: crates/bookify_gcal/src/auth.rs
use bookify_config::GcalConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{self, ServiceAccountAuthenticator, ServiceAccountKey},
    CalendarHub,
};
use thiserror::Error;
use tracing::info;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Read/write access to events; the gateway both lists and inserts.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Error, Debug)]
pub enum GcalAuthError {
    #[error("Missing service account settings: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("Failed to set up the calendar client: {0}")]
    Io(#[from] std::io::Error),
    #[error("Service account token exchange failed: {0}")]
    Token(#[from] yup_oauth2::Error),
}

/// Builds the service-account key from the env-provided client email and PEM.
pub fn service_account_key(config: &GcalConfig) -> Result<ServiceAccountKey, GcalAuthError> {
    let (Some(client_email), Some(private_key)) = (&config.client_email, &config.private_key)
    else {
        return Err(GcalAuthError::MissingCredentials(config.missing_credentials()));
    };
    if !config.has_credentials() {
        return Err(GcalAuthError::MissingCredentials(config.missing_credentials()));
    }

    Ok(ServiceAccountKey {
        key_type: Some("service_account".to_string()),
        project_id: None,
        private_key_id: None,
        private_key: private_key.clone(),
        client_email: client_email.clone(),
        client_id: None,
        auth_uri: None,
        token_uri: TOKEN_URI.to_string(),
        auth_provider_x509_cert_url: None,
        client_x509_cert_url: None,
    })
}

/// Exchanges the service-account credential for a token and returns a hub
/// that reuses the authenticator for every later call.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalAuthError> {
    let sa_key = service_account_key(config)?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    // Fail at startup, not on the first booking, when the key is rejected.
    auth.token(&[CALENDAR_SCOPE]).await?;
    info!(
        "Service account {} authorized for calendar access",
        config.client_email.as_deref().unwrap_or_default()
    );

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
