//! Startup check that the SQLite file has the tables this crate reads.
//!
//! The record types in [`crate::model`] are declared statically. Before
//! serving anything, [`verify_schema`] compares them against the file's
//! actual layout so a wrong or truncated database fails at startup rather
//! than on the first request.

use rusqlite::Connection;

use crate::error::{ClimateError, Result};

/// A table and the columns this crate reads from it.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Layout of the `station` table.
pub const STATION_TABLE: TableSchema = TableSchema {
    name: "station",
    columns: &["id", "station", "name", "latitude", "longitude", "elevation"],
};

/// Layout of the `measurement` table.
pub const MEASUREMENT_TABLE: TableSchema = TableSchema {
    name: "measurement",
    columns: &["id", "station", "date", "prcp", "tobs"],
};

/// Every table the store must contain.
pub const EXPECTED_TABLES: [TableSchema; 2] = [STATION_TABLE, MEASUREMENT_TABLE];

/// Verify that all [`EXPECTED_TABLES`] exist with their columns.
///
/// Extra tables and columns are ignored.
pub fn verify_schema(conn: &Connection) -> Result<()> {
    for table in EXPECTED_TABLES {
        let present = table_columns(conn, table.name)?;
        if present.is_empty() {
            return Err(ClimateError::MissingTable { table: table.name });
        }

        for &column in table.columns {
            if !present.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                return Err(ClimateError::MissingColumn {
                    table: table.name,
                    column,
                });
            }
        }

        tracing::debug!(table = table.name, columns = present.len(), "Table verified");
    }

    Ok(())
}

/// Column names of `table`, empty if the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}
