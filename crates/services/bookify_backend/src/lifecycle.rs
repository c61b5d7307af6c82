// File: services/bookify_backend/src/lifecycle.rs
//! Process lifecycle: signals, graceful shutdown and panic policy.
//!
//! A panic while serving a request is logged and answered with 500 by
//! `CatchPanicLayer`; the process keeps running. Any other panic triggers a
//! graceful shutdown and the process exits with a failure code. Signal
//! handlers are registered before startup work begins, so an early SIGINT
//! also ends in a clean exit.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use bookify_common::ErrorBody;
use http::StatusCode;
use std::any::Any;
use std::future::Future;
use std::io;
use std::panic;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info, warn};

tokio::task_local! {
    static IN_REQUEST: ();
}

/// True when called from inside a request handled by [`mark_request`].
pub fn in_request() -> bool {
    IN_REQUEST.try_with(|_| ()).is_ok()
}

/// Middleware marking everything below it as request handling.
pub async fn mark_request(request: Request, next: Next) -> Response {
    IN_REQUEST.scope((), next.run(request)).await
}

/// Body for a request whose handler panicked.
pub fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal server error")),
    )
        .into_response()
}

/// Shutdown trigger shared by the signal listener and the panic hook.
#[derive(Clone, Default)]
pub struct Shutdown {
    notify: Arc<Notify>,
    fatal: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the SIGINT/SIGTERM handlers immediately and requests a clean
    /// shutdown once one of them fires.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when a handler cannot be registered; the default
    /// signal disposition then stays in place.
    pub fn listen_for_signals(&self) -> io::Result<()> {
        let received = signal_received()?;
        let notify = self.notify.clone();
        tokio::spawn(async move {
            received.await;
            notify.notify_one();
        });
        Ok(())
    }

    /// Requests shutdown and marks the exit as a failure.
    pub fn trigger_fatal(&self) {
        self.fatal.store(true, Ordering::SeqCst);
        // notify_one keeps a permit when nobody is waiting yet
        self.notify.notify_one();
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }

    /// Resolves once a signal arrived or a fatal trigger fired.
    pub async fn wait(&self) {
        self.notify.notified().await;
        if self.is_fatal() {
            warn!("Fatal error, initiating graceful shutdown");
        }
    }
}

/// Installs the process-wide panic policy.
pub fn install_panic_hook(shutdown: Shutdown) {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if in_request() {
            error!("Request handler panicked: {}", info);
            return;
        }
        error!("Unhandled panic: {}", info);
        default_hook(info);
        shutdown.trigger_fatal();
    }));
}

type SignalFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[cfg(unix)]
fn signal_received() -> io::Result<SignalFuture> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(Box::pin(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal, initiating graceful shutdown");
            }
        }
    }))
}

#[cfg(not(unix))]
fn signal_received() -> io::Result<SignalFuture> {
    Ok(Box::pin(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, initiating graceful shutdown"),
            Err(err) => {
                error!("Failed to listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    #[tokio::test]
    async fn fatal_trigger_ends_wait() {
        let shutdown = Shutdown::new();
        shutdown.trigger_fatal();

        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("wait should resolve after a fatal trigger");
        assert!(shutdown.is_fatal());
    }

    #[tokio::test]
    async fn request_marker_is_scoped() {
        assert!(!in_request());

        let app = Router::new()
            .route(
                "/",
                get(|| async { if in_request() { "inside" } else { "outside" } }),
            )
            .layer(middleware::from_fn(mark_request));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"inside");
        assert!(!in_request());
    }

    #[tokio::test]
    async fn only_panics_outside_requests_are_fatal() {
        async fn boom() -> &'static str {
            panic!("handler boom")
        }

        let shutdown = Shutdown::new();
        install_panic_hook(shutdown.clone());

        let app = Router::new()
            .route("/", get(boom))
            .layer(middleware::from_fn(mark_request))
            .layer(CatchPanicLayer::custom(panic_response));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!shutdown.is_fatal(), "a request panic must not stop the server");

        let joined = tokio::spawn(async { panic!("background boom") }).await;
        assert!(joined.unwrap_err().is_panic());
        assert!(shutdown.is_fatal(), "a background panic must stop the server");

        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("fatal panic should release the shutdown wait");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_requests_clean_shutdown() {
        let shutdown = Shutdown::new();
        shutdown
            .listen_for_signals()
            .expect("signal handlers should register");

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("kill should run");
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), shutdown.wait())
            .await
            .expect("SIGTERM should release the shutdown wait");
        assert!(!shutdown.is_fatal());
    }

    #[tokio::test]
    async fn handler_panic_becomes_500() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let app = Router::new()
            .route("/", get(boom))
            .layer(middleware::from_fn(mark_request))
            .layer(CatchPanicLayer::custom(panic_response));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }
}
