// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Temporal Aggregation
//
// Rollups of the observation table along the date axis (global sums, monthly
// totals, weekday profile) and along the entity axis (latest snapshot and
// rankings). Every rollup returns a new table.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{OutbreakError, Result};
use crate::metrics::{fatality_rate, recovery_rate};
use crate::types::*;

#[derive(Default)]
struct Totals {
    confirmed: u64,
    deaths: u64,
    recovered: u64,
    active: u64,
}

fn ensure_rows(table: &ObservationTable) -> Result<()> {
    if table.is_empty() {
        return Err(OutbreakError::EmptyTable);
    }
    Ok(())
}

// ─── Global Daily Totals ────────────────────────────────────────────────────

/// Sums every count per date, ascending, with first-difference deltas.
pub fn daily_totals(table: &ObservationTable) -> Result<Vec<GlobalDailySummary>> {
    ensure_rows(table)?;

    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for r in table.records() {
        let t = by_date.entry(r.date).or_default();
        t.confirmed += r.confirmed;
        t.deaths += r.deaths;
        t.recovered += r.recovered;
        t.active += r.active;
    }

    let mut summaries: Vec<GlobalDailySummary> = Vec::with_capacity(by_date.len());
    let mut previous: Option<(u64, u64)> = None;
    for (date, t) in by_date {
        let (new_cases, new_deaths) = match previous {
            Some((prev_confirmed, prev_deaths)) => (
                Some(t.confirmed as i64 - prev_confirmed as i64),
                Some(t.deaths as i64 - prev_deaths as i64),
            ),
            None => (None, None),
        };
        previous = Some((t.confirmed, t.deaths));
        summaries.push(GlobalDailySummary {
            date,
            confirmed: t.confirmed,
            deaths: t.deaths,
            recovered: t.recovered,
            active: t.active,
            new_cases,
            new_deaths,
        });
    }
    Ok(summaries)
}

// ─── Latest Snapshot ────────────────────────────────────────────────────────

/// One row per entity at the table's maximum date, with CFR and recovery rate.
pub fn latest_snapshot(table: &ObservationTable) -> Result<Vec<EntitySnapshot>> {
    let latest = table.max_date().ok_or(OutbreakError::EmptyTable)?;
    Ok(table
        .records()
        .iter()
        .filter(|r| r.date == latest)
        .map(|r| EntitySnapshot {
            entity_id: r.entity_id.clone(),
            confirmed: r.confirmed,
            deaths: r.deaths,
            recovered: r.recovered,
            active: r.active,
            fatality_rate: fatality_rate(r.confirmed, r.deaths),
            recovery_rate: recovery_rate(r.confirmed, r.recovered),
        })
        .collect())
}

// ─── Calendar Profiles ──────────────────────────────────────────────────────

/// Confirmed cases summed per calendar month, ascending.
pub fn monthly_totals(table: &ObservationTable) -> Result<Vec<MonthlyTotal>> {
    ensure_rows(table)?;

    let mut by_month: BTreeMap<(i32, u32), (String, u64)> = BTreeMap::new();
    for r in table.records() {
        let entry = by_month
            .entry(month_key(r.date))
            .or_insert_with(|| (MonthlyTotal::month_name_of(r.date), 0));
        entry.1 += r.confirmed;
    }

    Ok(by_month
        .into_iter()
        .map(|((year, month), (month_name, confirmed))| MonthlyTotal {
            year,
            month,
            month_name,
            confirmed,
        })
        .collect())
}

/// Mean confirmed per weekday over all rows, Monday first.
/// Weekdays absent from the table are omitted.
pub fn weekday_averages(table: &ObservationTable) -> Result<Vec<WeekdayAverage>> {
    ensure_rows(table)?;

    let mut sums = [(0u64, 0usize); 7];
    for r in table.records() {
        let slot = &mut sums[r.date.weekday().num_days_from_monday() as usize];
        slot.0 += r.confirmed;
        slot.1 += 1;
    }

    Ok(WEEK_ORDER
        .iter()
        .zip(sums)
        .filter(|(_, (_, n))| *n > 0)
        .map(|(day, (total, n))| WeekdayAverage {
            weekday: weekday_name(*day).to_string(),
            mean_confirmed: total as f64 / n as f64,
            samples: n,
        })
        .collect())
}

// ─── Rankings ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    Confirmed,
    Deaths,
    FatalityRate,
    RecoveryRate,
}

impl RankKey {
    pub fn value(&self, row: &EntitySnapshot) -> f64 {
        match self {
            Self::Confirmed => row.confirmed as f64,
            Self::Deaths => row.deaths as f64,
            Self::FatalityRate => row.fatality_rate,
            Self::RecoveryRate => row.recovery_rate,
        }
    }
}

/// Top `n` snapshot rows by `key`, descending; ties broken by entity id.
pub fn rank_snapshot(snapshot: &[EntitySnapshot], key: RankKey, n: usize) -> Vec<EntitySnapshot> {
    let mut rows = snapshot.to_vec();
    rows.sort_by(|a, b| {
        key.value(b)
            .partial_cmp(&key.value(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    rows.truncate(n);
    rows
}
