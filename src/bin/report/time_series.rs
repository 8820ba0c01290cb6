// Per-Day JSONL Time Series Recorder
// Outputs one JSON line per date of the global series for independent analysis

use chrono::NaiveDate;
use outbreak_engine::metrics::fatality_rate;
use outbreak_engine::GlobalDailySummary;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub new_cases: Option<i64>,
    pub new_deaths: Option<i64>,
    pub fatality_rate: f64,
}

impl DaySnapshot {
    pub fn from_summary(day: &GlobalDailySummary) -> Self {
        Self {
            date: day.date,
            confirmed: day.confirmed,
            deaths: day.deaths,
            recovered: day.recovered,
            active: day.active,
            new_cases: day.new_cases,
            new_deaths: day.new_deaths,
            fatality_rate: fatality_rate(day.confirmed, day.deaths),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<DaySnapshot>,
}

impl TimeSeriesRecorder {
    pub fn from_daily(daily: &[GlobalDailySummary]) -> Self {
        Self { snapshots: daily.iter().map(DaySnapshot::from_summary).collect() }
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
