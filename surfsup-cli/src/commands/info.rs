use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use surfsup::QueryWindow;

use super::open_store;

pub fn run(database: Option<PathBuf>) -> Result<()> {
    let store = open_store(database)?;

    let info = store.info().context("Failed to read database summary")?;
    let file_size = file_size(store.path())?;

    println!("Database: {}", store.path().display());
    println!("File size: {}", format_size(file_size));
    println!();
    println!("Stations: {}", info.station_count);
    println!("Measurements: {}", info.measurement_count);

    let last = match (info.first_date, info.last_date) {
        (Some(first), Some(last)) => {
            println!("Date range: {} to {}", first, last);
            last
        }
        _ => {
            println!("Date range: (no measurements)");
            return Ok(());
        }
    };

    if let Some(most) = store.most_active_station()? {
        println!(
            "Most active station: {} ({} measurements)",
            most.station, most.count
        );
    }

    let window = QueryWindow::new(last, "");
    println!(
        "Latest year: {} to {}",
        window.cutoff().succ_opt().unwrap_or(window.cutoff()),
        window.reference_date
    );

    Ok(())
}

fn file_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?;
    Ok(metadata.len())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
