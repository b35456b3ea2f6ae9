use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use super::open_store;

pub fn run(database: Option<PathBuf>, json: bool) -> Result<()> {
    let store = open_store(database)?;

    if json {
        let ids = store.station_ids().context("Failed to list stations")?;
        println!("{}", serde_json::to_string(&ids)?);
        return Ok(());
    }

    let stations = store.stations().context("Failed to list stations")?;
    if stations.is_empty() {
        println!("No stations found in: {}", store.path().display());
        return Ok(());
    }

    let counts: HashMap<String, u64> = store
        .station_activity()
        .context("Failed to count measurements per station")?
        .into_iter()
        .map(|a| (a.station, a.count))
        .collect();

    println!(
        "{:<12} {:<40} {:>9} {:>10} {:>8} {:>8}",
        "STATION", "NAME", "LAT", "LON", "ELEV", "ROWS"
    );
    println!("{}", "-".repeat(92));

    for station in &stations {
        println!(
            "{:<12} {:<40} {:>9.4} {:>10.4} {:>8.1} {:>8}",
            station.station,
            station.name,
            station.latitude,
            station.longitude,
            station.elevation,
            counts.get(&station.station).copied().unwrap_or(0)
        );
    }

    println!();
    println!("Total: {} stations", stations.len());

    Ok(())
}
