//! SurfsUp Service Library
//!
//! HTTP handlers, router and OpenAPI document for the climate service.
//! This library is used by both the surfsup-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use surfsup::{ClimateStore, QueryWindow};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Pooled read-only climate store.
    pub store: ClimateStore,
    /// Window used by the precipitation and tobs routes.
    pub window: QueryWindow,
}

/// OpenAPI documentation for the climate service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SurfsUp Climate Service",
        version = "0.1.0",
        description = "Read-only REST API over the Hawaii climate observation store.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::index,
        handlers::get_precipitation,
        handlers::get_stations,
        handlers::get_tobs,
        handlers::get_summary_from,
        handlers::get_summary_range,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::PrecipitationEntry,
            handlers::TobsEntry,
            handlers::SummaryResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "climate", description = "Climate query endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router with tracing, CORS and Swagger UI.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/v1.0/precipitation", get(handlers::get_precipitation))
        .route("/api/v1.0/stations", get(handlers::get_stations))
        .route("/api/v1.0/tobs", get(handlers::get_tobs))
        .route("/api/v1.0/:start", get(handlers::get_summary_from))
        .route("/api/v1.0/:start/:end", get(handlers::get_summary_range))
        .route("/api/v1.0/start/:start", get(handlers::get_summary_from))
        .route("/api/v1.0/start/:start/:end", get(handlers::get_summary_range))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, HealthResponse, PrecipitationEntry, SummaryResponse, TobsEntry,
    ROUTE_LISTING,
};
