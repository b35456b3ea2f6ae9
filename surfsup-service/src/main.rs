//! SurfsUp Service - HTTP microservice for Hawaii climate queries.
//!
//! A read-only REST API over the station and measurement tables of a
//! pre-populated SQLite store.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SURFSUP_DATABASE` | Path to the SQLite store | `Resources/hawaii.sqlite` next to the executable |
//! | `SURFSUP_POOL_SIZE` | Maximum pooled connections | 4 |
//! | `SURFSUP_REFERENCE_DATE` | Last day of the one-year window | 2017-08-23 |
//! | `SURFSUP_ACTIVE_STATION` | Station served by `/tobs` | USC00519281 |
//! | `SURFSUP_DERIVE_WINDOW` | Derive window and station from the store | false |
//! | `SURFSUP_PORT` | HTTP server port | 5000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /` - Available routes (plain text)
//! - `GET /api/v1.0/precipitation` - Last year of precipitation
//! - `GET /api/v1.0/stations` - Station identifiers
//! - `GET /api/v1.0/tobs` - Last year of temperatures at the most active station
//! - `GET /api/v1.0/{start}` - MIN/MAX/AVG temperature from `start`
//! - `GET /api/v1.0/{start}/{end}` - MIN/MAX/AVG temperature between `start` and `end`
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use surfsup::{ClimateStoreBuilder, QueryWindow};
use surfsup_service::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surfsup_service=info,surfsup=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("SURFSUP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);

    // A missing or mismatched store is fatal here, before the socket is bound
    let store = ClimateStoreBuilder::from_env().build()?;

    let window = if derive_window_enabled() {
        QueryWindow::from_store(&store)?
    } else {
        QueryWindow::from_env()?
    };

    tracing::info!(
        database = %store.path().display(),
        pool_size = store.pool_size(),
        reference_date = %window.reference_date,
        cutoff = %window.cutoff(),
        active_station = %window.active_station,
        port = port,
        "Starting SurfsUp service"
    );

    let state = Arc::new(AppState { store, window });
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Whether `SURFSUP_DERIVE_WINDOW` asks for a store-derived window.
fn derive_window_enabled() -> bool {
    std::env::var("SURFSUP_DERIVE_WINDOW")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
