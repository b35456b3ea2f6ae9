use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use surfsup::{model::parse_date, QueryWindow};

use super::open_store;
use crate::ExportKind;

pub fn run(
    database: Option<PathBuf>,
    kind: ExportKind,
    output: Option<PathBuf>,
    reference_date: Option<String>,
    station: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let mut window = QueryWindow::default();
    if let Some(date) = reference_date {
        window.reference_date = parse_date(&date)?;
    }
    if let Some(station) = station {
        window.active_station = station;
    }

    let store = open_store(database)?;

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let rows = match kind {
        ExportKind::Precipitation => write_csv(writer, &store.precipitation(&window)?)?,
        ExportKind::Tobs => write_csv(writer, &store.temperature_observations(&window)?)?,
        ExportKind::Measurements => {
            let start = match start {
                Some(s) => parse_date(&s)?,
                None => window
                    .cutoff()
                    .succ_opt()
                    .context("Window start is out of range")?,
            };
            let end = end.as_deref().map(parse_date).transpose()?;
            write_csv(writer, &store.measurements(start, end)?)?
        }
    };

    if let Some(path) = output {
        eprintln!("Wrote {} rows to {}", rows, path.display());
    }

    Ok(())
}

/// Write `records` as CSV with a header row, returning the row count.
fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}
