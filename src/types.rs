// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Type Definitions

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{OutbreakError, Result};

// ─── Date Axis ──────────────────────────────────────────────────────────────

/// Contiguous daily axis, `start..=end`. Strictly increasing, no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(OutbreakError::InvalidDateRange { start, end });
        }
        let dates = start.iter_days().take_while(|d| *d <= end).collect();
        Ok(Self { dates })
    }

    pub fn start(&self) -> NaiveDate { self.dates[0] }
    pub fn end(&self) -> NaiveDate { self.dates[self.dates.len() - 1] }
    pub fn len(&self) -> usize { self.dates.len() }
    pub fn is_empty(&self) -> bool { self.dates.is_empty() }
    pub fn dates(&self) -> &[NaiveDate] { &self.dates }

    /// `(day_index, date)` pairs, index 0 at the axis start.
    pub fn enumerate(&self) -> impl Iterator<Item = (u32, NaiveDate)> + '_ {
        self.dates.iter().enumerate().map(|(i, d)| (i as u32, *d))
    }
}

// ─── Entity Parameters ──────────────────────────────────────────────────────

/// Outbreak shape for one entity. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityParameters {
    pub entity_id: String,
    /// Day index at which the curve turns from growth to decline.
    pub peak_offset_days: u32,
    /// Asymptotic case scale, always > 0.
    pub amplitude: f64,
}

// ─── Observation Records ────────────────────────────────────────────────────

/// One synthetic per-entity, per-day observation.
///
/// `confirmed` is an independent draw for the day, not a running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    pub entity_id: String,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
}

impl ObservationRecord {
    /// Builds a record, deriving `active = max(0, confirmed - deaths - recovered)`.
    pub fn new(date: NaiveDate, entity_id: &str, confirmed: u64, deaths: u64, recovered: u64) -> Self {
        let active = confirmed.saturating_sub(deaths).saturating_sub(recovered);
        Self {
            date,
            entity_id: entity_id.to_string(),
            confirmed,
            deaths,
            recovered,
            active,
        }
    }
}

/// Flat table of observations, unique on `(date, entity_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObservationTable {
    records: Vec<ObservationRecord>,
}

impl ObservationTable {
    /// Wraps `records`, rejecting the first repeated `(date, entity_id)` key.
    pub fn from_records(records: Vec<ObservationRecord>) -> Result<Self> {
        let mut seen: HashSet<(NaiveDate, &str)> = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert((r.date, r.entity_id.as_str())) {
                return Err(OutbreakError::DuplicateKey {
                    date: r.date,
                    entity_id: r.entity_id.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ObservationRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Entity ids in first-seen order.
    pub fn entity_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.entity_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Records of one entity, ascending by date.
    pub fn entity_series(&self, entity_id: &str) -> Vec<&ObservationRecord> {
        let mut series: Vec<&ObservationRecord> = self.records
            .iter()
            .filter(|r| r.entity_id == entity_id)
            .collect();
        series.sort_by_key(|r| r.date);
        series
    }

    /// Daily `confirmed` for one entity, ascending by date.
    pub fn confirmed_series(&self, entity_id: &str) -> Vec<u64> {
        self.entity_series(entity_id).iter().map(|r| r.confirmed).collect()
    }
}

// ─── Aggregates ─────────────────────────────────────────────────────────────

/// Global sums for one date. Deltas are `None` on the first date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDailySummary {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub new_cases: Option<i64>,
    pub new_deaths: Option<i64>,
}

/// Per-entity row at the latest date, with derived ratios in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity_id: String,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub fatality_rate: f64,
    pub recovery_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub confirmed: u64,
}

impl MonthlyTotal {
    pub fn month_name_of(date: NaiveDate) -> String {
        date.format("%B").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAverage {
    pub weekday: String,
    pub mean_confirmed: f64,
    pub samples: usize,
}

/// Monday-first ordering used for weekday profiles.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `(year, month)` bucket key for a date.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
