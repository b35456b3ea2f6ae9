pub mod export;
pub mod info;
pub mod stations;
pub mod summary;

use anyhow::{Context, Result};
use std::path::PathBuf;
use surfsup::{ClimateStore, ClimateStoreBuilder};

/// Open the store at `database`, or wherever the environment points.
pub fn open_store(database: Option<PathBuf>) -> Result<ClimateStore> {
    let builder = match database {
        Some(path) => ClimateStoreBuilder::new(path),
        None => ClimateStoreBuilder::from_env(),
    };
    builder.build().context("Failed to open climate database")
}
