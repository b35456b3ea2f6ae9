//! HTTP request handlers for the climate service.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use surfsup::{model::parse_date, ClimateError, TemperatureSummary};
use utoipa::ToSchema;

use crate::AppState;

/// Body of `GET /`: the API routes, one per line.
pub const ROUTE_LISTING: &str = "Available Routes:
/api/v1.0/precipitation
/api/v1.0/stations
/api/v1.0/tobs
/api/v1.0/<start>
/api/v1.0/<start>/<end>
";

/// Rows keyed by their position in the result set (`"0"`, `"1"`, ...).
pub type PositionMap<T> = BTreeMap<usize, T>;

/// One day of precipitation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrecipitationEntry {
    /// Date (YYYY-MM-DD).
    pub date: String,
    /// Precipitation in inches.
    pub precipitation: f64,
}

/// One temperature observation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TobsEntry {
    /// Date (YYYY-MM-DD).
    pub date: String,
    /// Observed temperature in °F.
    pub tobs: f64,
}

/// Temperature statistics for a date range.
///
/// All fields are `null` when no observation falls in the range.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    #[serde(rename = "MIN")]
    pub min: Option<f64>,
    #[serde(rename = "MAX")]
    pub max: Option<f64>,
    #[serde(rename = "AVG")]
    pub avg: Option<f64>,
}

impl From<TemperatureSummary> for SummaryResponse {
    fn from(summary: TemperatureSummary) -> Self {
        Self {
            min: summary.min,
            max: summary.max,
            avg: summary.avg,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// A failed request, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ClimateError> for ApiError {
    fn from(e: ClimateError) -> Self {
        let status = match &e {
            ClimateError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, error = %self.message, "Climate query failed");
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Run a store query on the blocking pool.
async fn query<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> surfsup::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Query task failed: {}", e),
        })?
        .map_err(ApiError::from)
}

/// List the available API routes.
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Route listing", body = String, content_type = "text/plain")
    )
)]
pub async fn index() -> &'static str {
    ROUTE_LISTING
}

/// Last year of precipitation, ascending by date.
///
/// Days without a precipitation value are omitted.
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate",
    responses(
        (status = 200, description = "Readings keyed by row position", body = BTreeMap<String, PrecipitationEntry>),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn get_precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PositionMap<PrecipitationEntry>>, ApiError> {
    let readings = query(state, |s| s.store.precipitation(&s.window)).await?;

    tracing::info!(rows = readings.len(), "Precipitation served");

    Ok(Json(
        readings
            .into_iter()
            .map(|r| PrecipitationEntry {
                date: r.date.to_string(),
                precipitation: r.precipitation,
            })
            .enumerate()
            .collect(),
    ))
}

/// Identifiers of every station.
#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate",
    responses(
        (status = 200, description = "Station identifiers", body = Vec<String>),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = query(state, |s| s.store.station_ids()).await?;
    tracing::info!(stations = ids.len(), "Stations served");
    Ok(Json(ids))
}

/// Last year of temperature observations for the most active station.
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate",
    responses(
        (status = 200, description = "Observations keyed by row position", body = BTreeMap<String, TobsEntry>),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn get_tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PositionMap<TobsEntry>>, ApiError> {
    let station = state.window.active_station.clone();
    let observations = query(state, |s| s.store.temperature_observations(&s.window)).await?;

    tracing::info!(
        station = %station,
        rows = observations.len(),
        "Temperature observations served"
    );

    Ok(Json(
        observations
            .into_iter()
            .map(|o| TobsEntry {
                date: o.date.to_string(),
                tobs: o.tobs,
            })
            .enumerate()
            .collect(),
    ))
}

/// MIN/MAX/AVG temperature from `start` onwards.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "First date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Temperature statistics", body = SummaryResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn get_summary_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    tracing::debug!(start = %start, "Summary query");

    let start = parse_date(&start)?;
    let summary = query(state, move |s| s.store.temperature_summary(start, None)).await?;
    Ok(Json(summary.into()))
}

/// MIN/MAX/AVG temperature between `start` and `end`, both inclusive.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "First date, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Temperature statistics", body = SummaryResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_summary_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<SummaryResponse>, ApiError> {
    tracing::debug!(start = %start, end = %end, "Summary query");

    let start = parse_date(&start)?;
    let end = parse_date(&end)?;
    let summary = query(state, move |s| s.store.temperature_summary(start, Some(end))).await?;
    Ok(Json(summary.into()))
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_listing_has_five_routes() {
        let routes: Vec<&str> = ROUTE_LISTING
            .lines()
            .filter(|l| l.starts_with('/'))
            .collect();
        assert_eq!(routes.len(), 5);
        assert!(routes.iter().all(|r| r.starts_with("/api/v1.0/")));
    }

    #[test]
    fn test_summary_response_serialize() {
        let response = SummaryResponse::from(TemperatureSummary {
            min: Some(54.0),
            max: Some(85.0),
            avg: Some(71.5),
        });
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"MIN":54.0,"MAX":85.0,"AVG":71.5}"#);
    }

    #[test]
    fn test_empty_summary_serializes_nulls() {
        let response = SummaryResponse::from(TemperatureSummary::default());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"MIN":null,"MAX":null,"AVG":null}"#);
    }

    #[test]
    fn test_position_map_keys_in_order() {
        let map: PositionMap<TobsEntry> = (0..12)
            .map(|i| TobsEntry {
                date: format!("2017-01-{:02}", i + 1),
                tobs: 70.0,
            })
            .enumerate()
            .collect();
        let value = serde_json::to_value(&map).unwrap();
        let json = serde_json::to_string(&map).unwrap();

        assert_eq!(value["10"]["date"], "2017-01-11");
        // numeric key order, not lexicographic
        assert!(json.find("\"2\":").unwrap() < json.find("\"10\":").unwrap());
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::from(ClimateError::InvalidDate {
            value: "tomorrow".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(ClimateError::MissingTable { table: "station" });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
