use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

/// Hawaii climate data CLI tool
#[derive(Parser)]
#[command(name = "surfsup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite climate database
    #[arg(short, long, env = "SURFSUP_DATABASE", global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the database contains
    Info,

    /// List weather stations
    Stations {
        /// Output station identifiers as a JSON array
        #[arg(short, long)]
        json: bool,
    },

    /// Minimum, maximum and average temperature for a date range
    Summary {
        /// First date (YYYY-MM-DD)
        start: String,

        /// Last date (YYYY-MM-DD), open-ended if omitted
        end: Option<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Export rows as CSV
    Export {
        /// Which rows to export
        #[arg(value_enum)]
        kind: ExportKind,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Last day of the one-year window (YYYY-MM-DD)
        #[arg(long, env = "SURFSUP_REFERENCE_DATE")]
        reference_date: Option<String>,

        /// Station for temperature observations
        #[arg(long, env = "SURFSUP_ACTIVE_STATION")]
        station: Option<String>,

        /// First date for raw measurements (defaults to the window start)
        #[arg(long)]
        start: Option<String>,

        /// Last date for raw measurements
        #[arg(long)]
        end: Option<String>,
    },
}

/// Rows that can be exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Last year of precipitation
    Precipitation,
    /// Last year of temperatures at the active station
    Tobs,
    /// Raw measurement rows
    Measurements,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info => commands::info::run(cli.database),
        Commands::Stations { json } => commands::stations::run(cli.database, json),
        Commands::Summary { start, end, json } => {
            commands::summary::run(cli.database, start, end, json)
        }
        Commands::Export {
            kind,
            output,
            reference_date,
            station,
            start,
            end,
        } => commands::export::run(
            cli.database,
            kind,
            output,
            reference_date,
            station,
            start,
            end,
        ),
    }
}
