// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Pipeline
//
// Wires generation and analysis together:
//   parameters -> generator -> assembler -> aggregation -> metrics -> correlation
// Every stage consumes a fully materialized table and returns a new one.

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregation::{self, RankKey};
use crate::assembler::{AssembledSeries, SeriesAssembler};
use crate::config::PipelineConfig;
use crate::correlation::{correlate, CorrelationMatrix, SnapshotField};
use crate::error::Result;
use crate::metrics::{average_growth_rate, fatality_rate, smoothed_growth_rate};
use crate::parameters::CurveParameterProvider;
use crate::types::*;

// ─── Report Types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub by_confirmed: Vec<EntitySnapshot>,
    pub by_deaths: Vec<EntitySnapshot>,
    pub by_fatality_rate: Vec<EntitySnapshot>,
    pub by_recovery_rate: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthAnalysis {
    pub entity_id: String,
    /// `None` when no day-over-day change was defined.
    pub average_growth_rate: Option<f64>,
    pub smoothed_growth_rate: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyInsights {
    pub total_confirmed: u64,
    pub total_deaths: u64,
    pub total_recovered: u64,
    /// CFR of the global totals on the last date.
    pub overall_fatality_rate: f64,
    pub peak_daily_new_cases: Option<i64>,
    pub top_entities: Vec<(String, u64)>,
    pub peak_month: Option<String>,
    pub busiest_weekday: Option<String>,
    pub mean_recovery_rate: f64,
    pub best_recovery_entity: Option<String>,
    pub fastest_growing_entity: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutbreakReport {
    pub config: PipelineConfig,
    pub observations: ObservationTable,
    pub daily_totals: Vec<GlobalDailySummary>,
    pub snapshot: Vec<EntitySnapshot>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub weekday_averages: Vec<WeekdayAverage>,
    pub rankings: Rankings,
    pub correlation: CorrelationMatrix,
    pub growth: Vec<GrowthAnalysis>,
    pub insights: KeyInsights,
    /// Configured ids with no curve parameters; they have no rows.
    pub skipped_entities: Vec<String>,
}

// ─── Pipeline ───────────────────────────────────────────────────────────────

pub struct OutbreakPipeline {
    config: PipelineConfig,
    provider: CurveParameterProvider,
}

impl OutbreakPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_provider(config, CurveParameterProvider::default())
    }

    pub fn with_provider(config: PipelineConfig, provider: CurveParameterProvider) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &PipelineConfig { &self.config }

    /// Builds the observation table for the configured entities and axis.
    pub fn generate(&self) -> Result<AssembledSeries> {
        let axis = self.config.date_axis()?;
        let assembled = SeriesAssembler::new(&self.provider, self.config.random_seed)
            .assemble(self.config.entity_list.as_slice(), &axis)?;
        info!(
            entities = self.config.entity_list.len(),
            skipped = assembled.skipped_entities.len(),
            days = axis.len(),
            rows = assembled.table.len(),
            seed = self.config.random_seed,
            "observation table assembled"
        );
        Ok(assembled)
    }

    pub fn run(&self) -> Result<OutbreakReport> {
        let AssembledSeries { table, skipped_entities } = self.generate()?;
        let mut report = self.analyze(table)?;
        report.skipped_entities = skipped_entities;
        Ok(report)
    }

    /// Derives every aggregate and metric from `table`.
    pub fn analyze(&self, table: ObservationTable) -> Result<OutbreakReport> {
        let daily = aggregation::daily_totals(&table)?;
        let snapshot = aggregation::latest_snapshot(&table)?;
        let monthly = aggregation::monthly_totals(&table)?;
        let weekday = aggregation::weekday_averages(&table)?;

        let n = self.config.top_n;
        let rankings = Rankings {
            by_confirmed: aggregation::rank_snapshot(&snapshot, RankKey::Confirmed, n),
            by_deaths: aggregation::rank_snapshot(&snapshot, RankKey::Deaths, n),
            by_fatality_rate: aggregation::rank_snapshot(&snapshot, RankKey::FatalityRate, n),
            by_recovery_rate: aggregation::rank_snapshot(&snapshot, RankKey::RecoveryRate, n),
        };

        let correlation = correlate(&snapshot, &SnapshotField::ALL);
        let growth = self.growth_analysis(&table);
        let insights = key_insights(&daily, &snapshot, &monthly, &weekday, &growth);
        info!(
            total_confirmed = insights.total_confirmed,
            overall_cfr = insights.overall_fatality_rate,
            "analysis complete"
        );

        Ok(OutbreakReport {
            config: self.config.clone(),
            observations: table,
            daily_totals: daily,
            snapshot,
            monthly_totals: monthly,
            weekday_averages: weekday,
            rankings,
            correlation,
            growth,
            insights,
            skipped_entities: Vec::new(),
        })
    }

    /// `InsufficientData` for one entity only blanks that entity's average.
    fn growth_analysis(&self, table: &ObservationTable) -> Vec<GrowthAnalysis> {
        self.config
            .focus_entities
            .iter()
            .map(|entity_id| {
                let series = table.confirmed_series(entity_id);
                let average = match average_growth_rate(&series) {
                    Ok(avg) => Some(avg),
                    Err(e) => {
                        warn!(entity = %entity_id, error = %e, "average growth rate undefined");
                        None
                    }
                };
                GrowthAnalysis {
                    entity_id: entity_id.clone(),
                    average_growth_rate: average,
                    smoothed_growth_rate: smoothed_growth_rate(&series, self.config.smoothing_window),
                }
            })
            .collect()
    }
}

// ─── Insights ───────────────────────────────────────────────────────────────

pub fn key_insights(
    daily: &[GlobalDailySummary],
    snapshot: &[EntitySnapshot],
    monthly: &[MonthlyTotal],
    weekday: &[WeekdayAverage],
    growth: &[GrowthAnalysis],
) -> KeyInsights {
    let last = daily.last();
    let total_confirmed = last.map_or(0, |d| d.confirmed);
    let total_deaths = last.map_or(0, |d| d.deaths);

    let top_entities = aggregation::rank_snapshot(snapshot, RankKey::Confirmed, 3)
        .into_iter()
        .map(|s| (s.entity_id, s.confirmed))
        .collect();

    let mean_recovery_rate = if snapshot.is_empty() {
        0.0
    } else {
        snapshot.iter().map(|s| s.recovery_rate).sum::<f64>() / snapshot.len() as f64
    };

    KeyInsights {
        total_confirmed,
        total_deaths,
        total_recovered: last.map_or(0, |d| d.recovered),
        overall_fatality_rate: fatality_rate(total_confirmed, total_deaths),
        peak_daily_new_cases: daily.iter().filter_map(|d| d.new_cases).max(),
        top_entities,
        peak_month: first_max_by(monthly, |m| m.confirmed as f64).map(|m| m.month_name.clone()),
        busiest_weekday: first_max_by(weekday, |w| w.mean_confirmed).map(|w| w.weekday.clone()),
        mean_recovery_rate,
        best_recovery_entity: aggregation::rank_snapshot(snapshot, RankKey::RecoveryRate, 1)
            .into_iter()
            .next()
            .map(|s| s.entity_id),
        fastest_growing_entity: growth
            .iter()
            .filter_map(|g| g.average_growth_rate.map(|avg| (g, avg)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(g, _)| g.entity_id.clone()),
    }
}

/// Earliest item holding the largest key; later ties do not displace it.
fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    items.iter().fold(None, |best: Option<(&T, f64)>, item| {
        let k = key(item);
        match best {
            Some((_, best_k)) if k <= best_k => best,
            _ => Some((item, k)),
        }
    })
    .map(|(item, _)| item)
}
