// File: services/bookify_backend/src/app.rs
use axum::{middleware, Router};
use bookify_config::AppConfig;
use bookify_gcal::client::CalendarClient;
use bookify_gcal::handlers::GcalState;
use bookify_gcal::routes as gcal_routes;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{cors, lifecycle};

/// Assembles the full application router around an already connected client.
pub fn build_app(config: Arc<AppConfig>, client: CalendarClient) -> Router {
    let gcal_state = Arc::new(GcalState::new(config.clone(), client));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new()
        .merge(bookify_common::routes())
        .nest("/api", gcal_routes::routes(gcal_state));

    #[cfg(feature = "openapi")]
    {
        use bookify_gcal::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Booking gateway in front of Google Calendar",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags( (name = "Bookify", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    // Outermost last: trace, origin guard, CORS headers, panic catch, request marker.
    app.layer(middleware::from_fn(lifecycle::mark_request))
        .layer(CatchPanicLayer::custom(lifecycle::panic_response))
        .layer(cors::cors_layer(&config.cors))
        .layer(middleware::from_fn_with_state(
            Arc::new(config.cors.clone()),
            cors::origin_guard,
        ))
        .layer(TraceLayer::new_for_http())
}
