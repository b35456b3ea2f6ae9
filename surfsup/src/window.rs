//! The "most recent year" window used by the precipitation and temperature
//! observation queries.

use chrono::{Duration, NaiveDate};

use crate::error::Result;
use crate::model::parse_date;
use crate::store::ClimateStore;

/// Last date covered by the Hawaii dataset.
pub const DEFAULT_REFERENCE_DATE: (i32, u32, u32) = (2017, 8, 23);

/// Station with the most measurements in the Hawaii dataset.
pub const DEFAULT_ACTIVE_STATION: &str = "USC00519281";

/// Length of the window in days.
pub const WINDOW_DAYS: i64 = 365;

/// A one-year window ending at `reference_date`, plus the station whose
/// temperature observations are reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    /// Last day of the window.
    pub reference_date: NaiveDate,
    /// Station used for temperature observations.
    pub active_station: String,
}

impl Default for QueryWindow {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_REFERENCE_DATE;
        Self {
            reference_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            active_station: DEFAULT_ACTIVE_STATION.to_string(),
        }
    }
}

impl QueryWindow {
    /// Create a window ending at `reference_date`.
    pub fn new(reference_date: NaiveDate, active_station: impl Into<String>) -> Self {
        Self {
            reference_date,
            active_station: active_station.into(),
        }
    }

    /// Create a window configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SURFSUP_REFERENCE_DATE` | Last day of the window (`YYYY-MM-DD`) | 2017-08-23 |
    /// | `SURFSUP_ACTIVE_STATION` | Station for temperature observations | USC00519281 |
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClimateError::InvalidDate`] if `SURFSUP_REFERENCE_DATE`
    /// is set but malformed.
    pub fn from_env() -> Result<Self> {
        let mut window = Self::default();

        if let Ok(value) = std::env::var("SURFSUP_REFERENCE_DATE") {
            window.reference_date = parse_date(&value)?;
        }
        if let Ok(station) = std::env::var("SURFSUP_ACTIVE_STATION") {
            if !station.trim().is_empty() {
                window.active_station = station.trim().to_string();
            }
        }

        Ok(window)
    }

    /// Exclusive lower bound: rows are kept when `date > cutoff()`.
    ///
    /// ```
    /// use surfsup::QueryWindow;
    ///
    /// assert_eq!(QueryWindow::default().cutoff().to_string(), "2016-08-23");
    /// ```
    pub fn cutoff(&self) -> NaiveDate {
        self.reference_date - Duration::days(WINDOW_DAYS)
    }

    /// Whether a row dated `date` passes the window filter.
    ///
    /// Only the lower bound is applied; the store holds nothing after the
    /// reference date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.cutoff()
    }

    /// Derive the window from the store's contents: the latest measurement
    /// date and the most active station.
    ///
    /// Either value falls back to its default when the store has no
    /// measurements.
    pub fn from_store(store: &ClimateStore) -> Result<Self> {
        let default = Self::default();

        let reference_date = store.latest_date()?.unwrap_or_else(|| {
            tracing::warn!("No measurements found, keeping default reference date");
            default.reference_date
        });
        let active_station = store
            .most_active_station()?
            .map(|activity| activity.station)
            .unwrap_or(default.active_station);

        tracing::info!(
            reference_date = %reference_date,
            active_station = %active_station,
            "Derived query window from store"
        );

        Ok(Self {
            reference_date,
            active_station,
        })
    }
}
