// Report Types - JSON output of a pipeline run plus seed-stability statistics

use outbreak_engine::OutbreakReport;
use serde::Serialize;

// ─── Statistics (per-metric aggregation across seeds) ───────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Seed Result ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SeedResult {
    pub seed: u64,
    pub total_confirmed: u64,
    pub total_deaths: u64,
    pub overall_fatality_rate: f64,
    pub peak_daily_new_cases: Option<i64>,
    pub top_entity: Option<String>,
    pub elapsed_ms: u128,
}

// ─── Stability Report (aggregation over N seeds) ────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub n_runs: usize,
    pub base_seed: u64,
    pub total_confirmed: Stats,
    pub total_deaths: Stats,
    pub overall_fatality_rate: Stats,
    pub peak_daily_new_cases: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<SeedResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    /// Carries the run configuration as `analysis.config`.
    pub analysis: &'a OutbreakReport,
    pub stability: Option<StabilityReport>,
}
