//! Error types for the SurfsUp library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading the climate store.
#[derive(Error, Debug)]
pub enum ClimateError {
    /// SQLite error while preparing or running a query.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No connection could be checked out of the pool.
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The SQLite file does not exist.
    #[error("Climate database not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// The store lacks one of the expected tables.
    #[error("Table `{table}` is missing from the climate database")]
    MissingTable { table: &'static str },

    /// A table exists but lacks an expected column.
    #[error("Column `{table}.{column}` is missing from the climate database")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A date string is not in `YYYY-MM-DD` form.
    #[error("Invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },
}

/// Result type alias using [`ClimateError`].
pub type Result<T> = std::result::Result<T, ClimateError>;
