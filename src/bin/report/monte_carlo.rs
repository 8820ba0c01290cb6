// Seed Stability - rerun the pipeline over consecutive seeds and aggregate
// Each run uses seed base+i, computing mean ± 95% CI of headline figures

use outbreak_engine::{OutbreakPipeline, PipelineConfig, Result};
use std::time::Instant;
use tracing::debug;

use crate::report::*;

/// Run the full pipeline once with `seed`, keeping only headline figures.
pub fn run_single(config: &PipelineConfig, seed: u64) -> Result<SeedResult> {
    let start = Instant::now();
    let config = PipelineConfig { random_seed: seed, ..config.clone() };
    let report = OutbreakPipeline::new(config)?.run()?;
    let insights = report.insights;

    Ok(SeedResult {
        seed,
        total_confirmed: insights.total_confirmed,
        total_deaths: insights.total_deaths,
        overall_fatality_rate: insights.overall_fatality_rate,
        peak_daily_new_cases: insights.peak_daily_new_cases,
        top_entity: insights.top_entities.first().map(|(id, _)| id.clone()),
        elapsed_ms: start.elapsed().as_millis(),
    })
}

/// Run `n_runs` seeds starting at `config.random_seed`.
pub fn run_stability(config: &PipelineConfig, n_runs: usize) -> Result<StabilityReport> {
    let base_seed = config.random_seed;
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed.wrapping_add(i as u64);
        let result = run_single(config, seed)?;
        debug!(seed, total = result.total_confirmed, "stability run finished");
        results.push(result);
    }
    Ok(aggregate(base_seed, results))
}

fn aggregate(base_seed: u64, results: Vec<SeedResult>) -> StabilityReport {
    let column = |f: &dyn Fn(&SeedResult) -> f64| -> Stats {
        Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
    };

    StabilityReport {
        n_runs: results.len(),
        base_seed,
        total_confirmed: column(&|r: &SeedResult| r.total_confirmed as f64),
        total_deaths: column(&|r: &SeedResult| r.total_deaths as f64),
        overall_fatality_rate: column(&|r: &SeedResult| r.overall_fatality_rate),
        // Runs without a defined peak are left out of the sample.
        peak_daily_new_cases: Stats::from_samples(
            &results.iter().filter_map(|r| r.peak_daily_new_cases.map(|p| p as f64)).collect::<Vec<_>>()
        ),
        elapsed_ms: column(&|r: &SeedResult| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
