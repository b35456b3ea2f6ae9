use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use surfsup::{model::parse_date, TemperatureSummary};

use super::open_store;

#[derive(Serialize)]
struct SummaryResponse {
    start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(rename = "MIN")]
    min: Option<f64>,
    #[serde(rename = "MAX")]
    max: Option<f64>,
    #[serde(rename = "AVG")]
    avg: Option<f64>,
}

pub fn run(database: Option<PathBuf>, start: String, end: Option<String>, json: bool) -> Result<()> {
    let start_date = parse_date(&start)?;
    let end_date = end.as_deref().map(parse_date).transpose()?;

    let store = open_store(database)?;
    let summary = store.temperature_summary(start_date, end_date)?;

    if json {
        let response = SummaryResponse {
            start: start_date.to_string(),
            end: end_date.map(|d| d.to_string()),
            min: summary.min,
            max: summary.max,
            avg: summary.avg,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", format_summary(&summary));
    }

    Ok(())
}

fn format_summary(summary: &TemperatureSummary) -> String {
    match (summary.min, summary.max, summary.avg) {
        (Some(min), Some(max), Some(avg)) => {
            format!("min {:.1}°F  max {:.1}°F  avg {:.2}°F", min, max, avg)
        }
        _ => "no observations".to_string(),
    }
}
