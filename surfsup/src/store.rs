//! Pooled, read-only access to the climate SQLite store.
//!
//! [`ClimateStore`] owns an r2d2 pool of read-only connections. Every query
//! checks a connection out for its own duration, so concurrent callers never
//! share a SQLite handle.
//!
//! ```ignore
//! use surfsup::{ClimateStoreBuilder, QueryWindow};
//!
//! let store = ClimateStoreBuilder::new("Resources/hawaii.sqlite")
//!     .pool_size(4)
//!     .build()?;
//!
//! let window = QueryWindow::default();
//! for reading in store.precipitation(&window)? {
//!     println!("{} {}", reading.date, reading.precipitation);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OpenFlags, OptionalExtension};

use crate::error::{ClimateError, Result};
use crate::model::{
    Measurement, PrecipitationReading, Station, StationActivity, StoreInfo,
    TemperatureObservation, TemperatureSummary,
};
use crate::schema::verify_schema;
use crate::window::QueryWindow;

/// Directory, relative to the executable, holding the default database.
pub const RESOURCES_DIR: &str = "Resources";

/// File name of the default database.
pub const DATABASE_FILE: &str = "hawaii.sqlite";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

type Conn = PooledConnection<SqliteConnectionManager>;

/// Read-only climate store backed by a pool of SQLite connections.
#[derive(Clone)]
pub struct ClimateStore {
    path: PathBuf,
    pool: Pool<SqliteConnectionManager>,
}

impl ClimateStore {
    /// Open the store at `path` with default pool settings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ClimateStoreBuilder::new(path).build()
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(path: P) -> ClimateStoreBuilder {
        ClimateStoreBuilder::new(path)
    }

    /// Path of the underlying SQLite file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum number of pooled connections.
    pub fn pool_size(&self) -> u32 {
        self.pool.max_size()
    }

    fn conn(&self) -> Result<Conn> {
        Ok(self.pool.get()?)
    }

    /// Precipitation readings after the window's cutoff, ascending by date.
    ///
    /// Days without a precipitation value are left out.
    pub fn precipitation(&self, window: &QueryWindow) -> Result<Vec<PrecipitationReading>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT date, prcp FROM measurement
             WHERE date > ?1 AND prcp IS NOT NULL
             ORDER BY date ASC, id ASC",
        )?;
        let readings = stmt
            .query_map([window.cutoff()], |row| {
                Ok(PrecipitationReading {
                    date: row.get(0)?,
                    precipitation: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            cutoff = %window.cutoff(),
            rows = readings.len(),
            "Precipitation query"
        );
        Ok(readings)
    }

    /// Identifiers of every station, without duplicates, in table order.
    pub fn station_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT station FROM station GROUP BY station ORDER BY MIN(id) ASC",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Every station with its metadata, in table order.
    pub fn stations(&self) -> Result<Vec<Station>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, station, name, latitude, longitude, elevation
             FROM station ORDER BY id ASC",
        )?;
        let stations = stmt
            .query_map([], Station::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stations)
    }

    /// Temperature observations of the window's active station after the
    /// cutoff, ascending by date.
    ///
    /// Days without a temperature value are left out.
    pub fn temperature_observations(
        &self,
        window: &QueryWindow,
    ) -> Result<Vec<TemperatureObservation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT date, tobs FROM measurement
             WHERE station = ?1 AND date > ?2 AND tobs IS NOT NULL
             ORDER BY date ASC, id ASC",
        )?;
        let observations = stmt
            .query_map(params![window.active_station, window.cutoff()], |row| {
                Ok(TemperatureObservation {
                    date: row.get(0)?,
                    tobs: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            station = %window.active_station,
            cutoff = %window.cutoff(),
            rows = observations.len(),
            "Temperature observation query"
        );
        Ok(observations)
    }

    /// MIN, MAX and AVG of observed temperatures with `date >= start` and,
    /// when `end` is given, `date <= end`.
    ///
    /// A range with no observations (including `start > end`) yields an
    /// empty [`TemperatureSummary`].
    pub fn temperature_summary(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TemperatureSummary> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
             WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)",
        )?;
        let summary = stmt.query_row(params![start, end], |row| {
            Ok(TemperatureSummary {
                min: row.get(0)?,
                max: row.get(1)?,
                avg: row.get(2)?,
            })
        })?;

        tracing::debug!(
            start = %start,
            end = ?end,
            empty = summary.is_empty(),
            "Temperature summary query"
        );
        Ok(summary)
    }

    /// Raw measurements with `date >= start` and, when `end` is given,
    /// `date <= end`, ascending by date.
    pub fn measurements(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Measurement>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, station, date, prcp, tobs FROM measurement
             WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)
             ORDER BY date ASC, id ASC",
        )?;
        let measurements = stmt
            .query_map(params![start, end], Measurement::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(measurements)
    }

    /// Date of the most recent measurement, `None` if there are none.
    pub fn latest_date(&self) -> Result<Option<NaiveDate>> {
        let conn = self.conn()?;
        let date = conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;
        Ok(date)
    }

    /// Number of measurements per station, most active first.
    ///
    /// Ties are ordered by station identifier.
    pub fn station_activity(&self) -> Result<Vec<StationActivity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT station, COUNT(*) AS n FROM measurement
             GROUP BY station ORDER BY n DESC, station ASC",
        )?;
        let activity = stmt
            .query_map([], |row| {
                Ok(StationActivity {
                    station: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activity)
    }

    /// The station with the most measurements, `None` if there are none.
    pub fn most_active_station(&self) -> Result<Option<StationActivity>> {
        let conn = self.conn()?;
        let activity = conn
            .query_row(
                "SELECT station, COUNT(*) AS n FROM measurement
                 GROUP BY station ORDER BY n DESC, station ASC LIMIT 1",
                [],
                |row| {
                    Ok(StationActivity {
                        station: row.get(0)?,
                        count: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(activity)
    }

    /// Row counts and the covered date range.
    pub fn info(&self) -> Result<StoreInfo> {
        let conn = self.conn()?;
        let station_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;
        let (measurement_count, first_date, last_date) = conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM measurement",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<NaiveDate>>(1)?,
                    row.get::<_, Option<NaiveDate>>(2)?,
                ))
            },
        )?;

        Ok(StoreInfo {
            station_count: station_count as u64,
            measurement_count: measurement_count as u64,
            first_date,
            last_date,
        })
    }
}

/// Location of the bundled database: `Resources/hawaii.sqlite` next to the
/// running executable.
///
/// Falls back to a path relative to the working directory when the
/// executable's location cannot be determined.
pub fn default_database_path() -> PathBuf {
    let relative = Path::new(RESOURCES_DIR).join(DATABASE_FILE);
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(&relative))
            .unwrap_or(relative),
        Err(e) => {
            tracing::warn!(error = %e, "Could not locate executable, using relative database path");
            relative
        }
    }
}

/// Builder for [`ClimateStore`].
#[derive(Debug, Clone)]
pub struct ClimateStoreBuilder {
    path: PathBuf,
    pool_size: u32,
    connection_timeout: Duration,
}

impl ClimateStoreBuilder {
    /// Create a new builder for the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SURFSUP_DATABASE` | Path to the SQLite store | `Resources/hawaii.sqlite` next to the executable |
    /// | `SURFSUP_POOL_SIZE` | Maximum pooled connections | 4 |
    pub fn from_env() -> Self {
        let path = std::env::var("SURFSUP_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let pool_size: u32 = std::env::var("SURFSUP_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);

        Self::new(path).pool_size(pool_size)
    }

    /// Set the maximum number of pooled connections (at least 1).
    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    /// Set how long a query waits for a free connection.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Open the pool and verify the schema.
    ///
    /// # Errors
    ///
    /// - [`ClimateError::DatabaseNotFound`] if the file does not exist
    /// - [`ClimateError::MissingTable`] / [`ClimateError::MissingColumn`] if
    ///   the file does not hold the expected tables
    /// - [`ClimateError::Pool`] / [`ClimateError::Sqlite`] if SQLite cannot
    ///   open it
    pub fn build(self) -> Result<ClimateStore> {
        if !self.path.is_file() {
            return Err(ClimateError::DatabaseNotFound { path: self.path });
        }

        let manager = SqliteConnectionManager::file(&self.path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        );

        let pool = Pool::builder()
            .max_size(self.pool_size)
            .min_idle(Some(1))
            .connection_timeout(self.connection_timeout)
            .build(manager)?;

        {
            let conn = pool.get()?;
            verify_schema(&conn)?;
        }

        tracing::info!(
            path = %self.path.display(),
            pool_size = self.pool_size,
            "Opened climate store"
        );

        Ok(ClimateStore {
            path: self.path,
            pool,
        })
    }
}
