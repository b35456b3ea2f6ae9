//! Integration tests for the HTTP API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::{params, Connection};
use serde_json::Value;
use surfsup::{ClimateStore, QueryWindow};
use surfsup_service::{router, AppState, ROUTE_LISTING};
use tempfile::TempDir;

const STATIONS: [(&str, &str); 3] = [
    ("USC00519397", "WAIKIKI 717.2, HI US"),
    ("USC00513117", "KANEOHE 838.1, HI US"),
    ("USC00519281", "WAIHEE 837.5, HI US"),
];

/// (station, date, prcp, tobs), inserted out of date order.
const MEASUREMENTS: [(&str, &str, Option<f64>, Option<f64>); 9] = [
    ("USC00513117", "2010-01-01", Some(0.08), Some(65.0)),
    ("USC00519397", "2017-08-23", Some(0.0), Some(79.0)),
    ("USC00519397", "2016-08-23", Some(0.0), Some(81.0)),
    ("USC00519281", "2016-08-24", Some(2.15), Some(77.0)),
    ("USC00519397", "2016-08-24", Some(0.08), Some(79.0)),
    ("USC00513117", "2016-08-24", None, Some(76.0)),
    ("USC00519281", "2016-08-25", Some(0.06), Some(80.0)),
    ("USC00519281", "2017-08-18", None, Some(79.0)),
    ("USC00519281", "2017-08-19", Some(0.09), None),
];

/// Create a small copy of the Hawaii store.
fn create_test_db(dir: &Path) -> PathBuf {
    let path = dir.join("hawaii.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE station (
            id INTEGER PRIMARY KEY, station TEXT, name TEXT,
            latitude FLOAT, longitude FLOAT, elevation FLOAT
        );
        CREATE TABLE measurement (
            id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT
        );",
    )
    .unwrap();

    for (station, name) in STATIONS {
        conn.execute(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES (?1, ?2, 21.3, -157.8, 10.0)",
            params![station, name],
        )
        .unwrap();
    }
    for (station, date, prcp, tobs) in MEASUREMENTS {
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            params![station, date, prcp, tobs],
        )
        .unwrap();
    }
    path
}

/// Create a test server over the real router.
fn create_test_server(temp_dir: &TempDir) -> TestServer {
    let path = create_test_db(temp_dir.path());
    let state = Arc::new(AppState {
        store: ClimateStore::open(path).unwrap(),
        window: QueryWindow::default(),
    });
    TestServer::new(router(state)).unwrap()
}

/// Values of a position-keyed object, in position order.
fn rows(json: &Value) -> Vec<&Value> {
    let map = json.as_object().unwrap();
    (0..map.len())
        .map(|i| map.get(&i.to_string()).expect("positions are contiguous"))
        .collect()
}

#[tokio::test]
async fn test_index_lists_routes() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));

    let text = response.text();
    assert_eq!(text, ROUTE_LISTING);
    let routes: Vec<&str> = text.lines().filter(|l| l.starts_with('/')).collect();
    assert_eq!(
        routes,
        [
            "/api/v1.0/precipitation",
            "/api/v1.0/stations",
            "/api/v1.0/tobs",
            "/api/v1.0/<start>",
            "/api/v1.0/<start>/<end>",
        ]
    );
}

#[tokio::test]
async fn test_precipitation_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/precipitation").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let entries = rows(&json);
    assert_eq!(entries.len(), 5);

    assert_eq!(entries[0]["date"], "2016-08-24");
    assert_eq!(entries[0]["precipitation"], 2.15);
    assert_eq!(entries[4]["date"], "2017-08-23");

    // no nulls, nothing at or before the cutoff, ascending dates
    assert!(entries.iter().all(|r| r["precipitation"].is_number()));
    let dates: Vec<&str> = entries.iter().map(|r| r["date"].as_str().unwrap()).collect();
    assert!(dates.iter().all(|d| *d > "2016-08-23"));
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_stations_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/stations").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json,
        serde_json::json!(["USC00519397", "USC00513117", "USC00519281"])
    );
}

#[tokio::test]
async fn test_stations_endpoint_repeated_identifier() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_db(temp_dir.path());
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES ('USC00513117', 'KANEOHE (dup)', 21.4234, -157.8015, 14.6),
                    ('USC00516128', 'MANOA LYON ARBO 785.2, HI US', 21.3331, -157.8025, 152.4);",
        )
        .unwrap();
    let state = Arc::new(AppState {
        store: ClimateStore::open(&path).unwrap(),
        window: QueryWindow::default(),
    });
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/v1.0/stations").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json,
        serde_json::json!(["USC00519397", "USC00513117", "USC00519281", "USC00516128"])
    );
}

#[tokio::test]
async fn test_tobs_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/tobs").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let entries = rows(&json);
    let values: Vec<(&str, f64)> = entries
        .iter()
        .map(|r| (r["date"].as_str().unwrap(), r["tobs"].as_f64().unwrap()))
        .collect();
    assert_eq!(
        values,
        [("2016-08-24", 77.0), ("2016-08-25", 80.0), ("2017-08-18", 79.0)]
    );
}

#[tokio::test]
async fn test_summary_single_day() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/2017-08-23/2017-08-23").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json,
        serde_json::json!({"MIN": 79.0, "MAX": 79.0, "AVG": 79.0})
    );
}

#[tokio::test]
async fn test_summary_beyond_data() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/9999-01-01").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json,
        serde_json::json!({"MIN": null, "MAX": null, "AVG": null})
    );
}

#[tokio::test]
async fn test_summary_from_start() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/2016-08-24").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let min = json["MIN"].as_f64().unwrap();
    let max = json["MAX"].as_f64().unwrap();
    let avg = json["AVG"].as_f64().unwrap();
    assert_eq!(min, 76.0);
    assert_eq!(max, 80.0);
    assert!(min <= avg && avg <= max);
}

#[tokio::test]
async fn test_summary_start_alias() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let direct: Value = server.get("/api/v1.0/2016-08-24").await.json();
    let alias: Value = server.get("/api/v1.0/start/2016-08-24").await.json();
    assert_eq!(direct, alias);

    let direct: Value = server.get("/api/v1.0/2016-08-24/2016-08-25").await.json();
    let alias: Value = server
        .get("/api/v1.0/start/2016-08-24/2016-08-25")
        .await
        .json();
    assert_eq!(direct, alias);
    assert_eq!(direct["MIN"], 76.0);
    assert_eq!(direct["MAX"], 80.0);
}

#[tokio::test]
async fn test_summary_inverted_range() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/2017-01-01/2016-01-01").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["MIN"].is_null());
    assert!(json["MAX"].is_null());
    assert!(json["AVG"].is_null());
}

#[tokio::test]
async fn test_summary_malformed_date() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v1.0/08-23-2017").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("08-23-2017"));

    let response = server.get("/api/v1.0/2017-01-01/not-a-date").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_derived_window() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_db(temp_dir.path());
    let store = ClimateStore::open(path).unwrap();
    let window = QueryWindow::from_store(&store).unwrap();
    let server = TestServer::new(router(Arc::new(AppState { store, window }))).unwrap();

    let json: Value = server.get("/api/v1.0/tobs").await.json();
    assert_eq!(json.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/api/v1.0/stations"].is_object());
}

#[tokio::test]
async fn test_unknown_route() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/v2.0/stations/extra/segments").await;
    response.assert_status_not_found();
}
