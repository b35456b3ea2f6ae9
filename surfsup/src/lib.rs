//! # SurfsUp - Hawaii Climate Store
//!
//! Read-only access to a pre-populated SQLite store of weather stations and
//! their daily precipitation and temperature readings.
//!
//! ## Quick Start
//!
//! ```ignore
//! use surfsup::{ClimateStore, QueryWindow};
//!
//! let store = ClimateStore::open("Resources/hawaii.sqlite")?;
//!
//! // Stations in the store
//! let ids = store.station_ids()?;
//!
//! // Temperature statistics for a date range
//! let start = surfsup::model::parse_date("2017-01-01")?;
//! let summary = store.temperature_summary(start, None)?;
//! println!("min={:?} max={:?} avg={:?}", summary.min, summary.max, summary.avg);
//!
//! // Last year of precipitation
//! let readings = store.precipitation(&QueryWindow::default())?;
//! ```
//!
//! ## Store Layout
//!
//! Two tables, both loaded outside this crate:
//!
//! - `station`: `id`, `station`, `name`, `latitude`, `longitude`, `elevation`
//! - `measurement`: `id`, `station`, `date` (`YYYY-MM-DD` text), `prcp`, `tobs`
//!
//! The store is opened read-only and checked against this layout when a
//! [`ClimateStore`] is built.

pub mod error;
pub mod model;
pub mod schema;
pub mod store;
pub mod window;

// Re-export main types at crate root for convenience
pub use error::{ClimateError, Result};
pub use model::{
    Measurement, PrecipitationReading, Station, StationActivity, StoreInfo,
    TemperatureObservation, TemperatureSummary,
};
pub use store::{default_database_path, ClimateStore, ClimateStoreBuilder};
pub use window::QueryWindow;
