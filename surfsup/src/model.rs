//! Record types for the `station` and `measurement` tables.
//!
//! The store is populated outside this crate, so these types mirror its
//! existing layout instead of defining one. [`crate::schema`] checks at
//! startup that the file actually matches them.

use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::error::{ClimateError, Result};

/// A weather station (row of the `station` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Row id.
    pub id: i64,
    /// Station identifier, e.g. `USC00519397`.
    pub station: String,
    /// Human-readable station name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation in feet.
    pub elevation: f64,
}

impl Station {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            station: row.get("station")?,
            name: row.get("name")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            elevation: row.get("elevation")?,
        })
    }
}

/// A daily observation (row of the `measurement` table).
///
/// Either reading may be missing for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    /// Identifier of the reporting [`Station`].
    pub station: String,
    pub date: NaiveDate,
    /// Precipitation in inches.
    pub prcp: Option<f64>,
    /// Observed temperature in °F.
    pub tobs: Option<f64>,
}

impl Measurement {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            station: row.get("station")?,
            date: row.get("date")?,
            prcp: row.get("prcp")?,
            tobs: row.get("tobs")?,
        })
    }
}

/// One day of precipitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationReading {
    pub date: NaiveDate,
    pub precipitation: f64,
}

/// One observed temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    pub tobs: f64,
}

/// MIN/MAX/AVG of observed temperatures over a date range.
///
/// All three are `None` when no observation falls in the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

impl TemperatureSummary {
    /// Whether the range matched no observations.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.avg.is_none()
    }
}

/// Number of measurements reported by a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationActivity {
    pub station: String,
    pub count: u64,
}

/// Overview of what the store contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub station_count: u64,
    pub measurement_count: u64,
    /// Earliest measurement date, `None` for an empty table.
    pub first_date: Option<NaiveDate>,
    /// Latest measurement date, `None` for an empty table.
    pub last_date: Option<NaiveDate>,
}

/// Parse a `YYYY-MM-DD` date string.
///
/// # Example
///
/// ```
/// use surfsup::model::parse_date;
///
/// let date = parse_date("2017-08-23").unwrap();
/// assert_eq!(date.to_string(), "2017-08-23");
/// assert!(parse_date("08/23/2017").is_err());
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ClimateError::InvalidDate {
        value: value.to_string(),
    })
}
