// File: services/bookify_backend/src/main.rs
use bookify_backend::build_app;
use bookify_backend::lifecycle::{install_panic_hook, Shutdown};
use bookify_common::{log_error, log_result, logging};
use bookify_config::load_config;
use bookify_gcal::client::CalendarClient;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match log_result(
        load_config(),
        "Configuration loaded",
        "Failed to load configuration",
    ) {
        Ok(config) => Arc::new(config),
        Err(_) => return ExitCode::FAILURE,
    };

    let shutdown = Shutdown::new();
    install_panic_hook(shutdown.clone());
    if let Err(err) = shutdown.listen_for_signals() {
        log_error(err, "Failed to install signal handlers");
    }

    // Connected once; a failure leaves the client uninitialized for good.
    let client = tokio::select! {
        client = CalendarClient::connect(&config.gcal) => client,
        _ = shutdown.wait() => {
            info!("Shutdown requested during startup");
            return exit_code(&shutdown);
        }
    };
    let app = build_app(config.clone(), client);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log_error(err, &format!("Failed to bind {}", addr));
            return ExitCode::FAILURE;
        }
    };
    info!("Server running on http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    let signal = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.wait().await })
        .await;
    if let Err(err) = served {
        log_error(err, "Server error");
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    exit_code(&shutdown)
}

fn exit_code(shutdown: &Shutdown) -> ExitCode {
    if shutdown.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
