// Outbreak Report Runner - synthetic epidemic series, summaries and trends
// Seedable ChaCha8 PRNG, JSON report, optional per-day JSONL time series
//
// Usage:
//   cargo run --release --bin outbreak-report                       # Defaults (2020, 15 entities, seed 42)
//   cargo run --release --bin outbreak-report -- --seed 7           # Custom seed
//   cargo run --release --bin outbreak-report -- --config run.json  # Load a JSON config
//   cargo run --release --bin outbreak-report -- --start 2020-03-01 --end 2020-06-30
//   cargo run --release --bin outbreak-report -- --window 14        # Smoothing window
//   cargo run --release --bin outbreak-report -- --runs 30          # Seed stability (30 seeds)
//   cargo run --release --bin outbreak-report -- --time-series      # Enable JSONL output

mod report;
mod monte_carlo;
mod time_series;

use outbreak_engine::correlation::CorrelationMatrix;
use outbreak_engine::{EntitySnapshot, OutbreakPipeline, OutbreakReport, PipelineConfig};
use report::*;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use time_series::TimeSeriesRecorder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    config: Option<PathBuf>,
    seed: Option<u64>,
    start: Option<String>,
    end: Option<String>,
    window: Option<usize>,
    runs: usize,
    time_series: bool,
    out: PathBuf,
}

/// Parsed flag value; a missing or malformed value is reported and dropped.
fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> Option<T> {
    let raw = match value {
        Some(raw) => raw,
        None => {
            warn!("{} expects a value", flag);
            return None;
        }
    };
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {} {:?}: not a valid number", flag, raw);
            None
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        config: None,
        seed: None,
        start: None,
        end: None,
        window: None,
        runs: 1,
        time_series: false,
        out: PathBuf::from("outbreak-results"),
    };

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--config" => { cli.config = value.map(PathBuf::from); i += 1; }
            "--seed" => { cli.seed = parse_value("--seed", value.as_ref()); i += 1; }
            "--start" => { cli.start = value; i += 1; }
            "--end" => { cli.end = value; i += 1; }
            "--window" => { cli.window = parse_value("--window", value.as_ref()); i += 1; }
            "--runs" => { cli.runs = parse_value("--runs", value.as_ref()).unwrap_or(1); i += 1; }
            "--out" => { if let Some(v) = value { cli.out = PathBuf::from(v); } i += 1; }
            "--time-series" => {
                cli.time_series = true;
            }
            other => {
                warn!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    cli
}

fn build_config(cli: &CliArgs) -> outbreak_engine::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(seed) = cli.seed { config.random_seed = seed; }
    if let Some(window) = cli.window { config.smoothing_window = window; }
    for (flag, target) in [(&cli.start, &mut config.start_date), (&cli.end, &mut config.end_date)] {
        if let Some(s) = flag {
            *target = s.parse().map_err(|e| {
                outbreak_engine::OutbreakError::InvalidConfig(format!("bad date {:?}: {}", s, e))
            })?;
        }
    }
    config.validate()?;
    Ok(config)
}

// ─── Console Tables ─────────────────────────────────────────────────────────

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{:.2}", x))
}

fn print_ranking(title: &str, rows: &[EntitySnapshot]) {
    println!("\n  {}", title);
    println!("  {:<14} {:>12} {:>10} {:>12} {:>8} {:>9}",
        "Entity", "Confirmed", "Deaths", "Recovered", "CFR%", "Recov%");
    for r in rows {
        println!("  {:<14} {:>12} {:>10} {:>12} {:>8.2} {:>9.2}",
            r.entity_id, r.confirmed, r.deaths, r.recovered, r.fatality_rate, r.recovery_rate);
    }
}

fn print_correlation(m: &CorrelationMatrix) {
    println!("\n  Correlation Matrix (entities at final date)");
    print!("  {:<14}", "");
    for f in &m.fields { print!(" {:>13}", f.name()); }
    println!();
    for (i, f) in m.fields.iter().enumerate() {
        print!("  {:<14}", f.name());
        for cell in &m.matrix[i] {
            print!(" {:>13}", cell.map_or_else(|| "-".to_string(), |r| format!("{:.3}", r)));
        }
        println!();
    }
}

fn print_report(report: &OutbreakReport) {
    let ins = &report.insights;
    println!("  Global totals (final date)");
    println!("    Confirmed: {}  Deaths: {}  Recovered: {}", ins.total_confirmed, ins.total_deaths, ins.total_recovered);
    println!("    Overall CFR: {:.2}%  Peak daily new cases: {}",
        ins.overall_fatality_rate,
        ins.peak_daily_new_cases.map_or_else(|| "-".to_string(), |p| p.to_string()));

    if !report.skipped_entities.is_empty() {
        println!("    Skipped (no curve parameters): {}", report.skipped_entities.join(", "));
    }

    print_ranking("Top entities by confirmed", &report.rankings.by_confirmed);
    print_ranking("Top entities by deaths", &report.rankings.by_deaths);
    print_ranking("Top entities by fatality rate", &report.rankings.by_fatality_rate);
    print_ranking("Top entities by recovery rate", &report.rankings.by_recovery_rate);

    println!("\n  Monthly confirmed");
    for m in &report.monthly_totals {
        println!("    {:<10} {:>4} {:>14}", m.month_name, m.year, m.confirmed);
    }

    println!("\n  Mean confirmed by weekday");
    for w in &report.weekday_averages {
        println!("    {:<10} {:>14.1}", w.weekday, w.mean_confirmed);
    }

    print_correlation(&report.correlation);

    println!("\n  Growth (window {} days)", report.config.smoothing_window);
    println!("  {:<14} {:>12} {:>14}", "Entity", "Avg growth%", "Last smoothed%");
    for g in &report.growth {
        let last = g.smoothed_growth_rate.iter().rev().find_map(|v| *v);
        println!("  {:<14} {:>12} {:>14}", g.entity_id, fmt_opt(g.average_growth_rate), fmt_opt(last));
    }

    println!("\n  Key insights");
    for (rank, (id, confirmed)) in ins.top_entities.iter().enumerate() {
        println!("    #{}: {} - {} cases", rank + 1, id, confirmed);
    }
    println!("    Peak month: {}", ins.peak_month.as_deref().unwrap_or("-"));
    println!("    Busiest weekday: {}", ins.busiest_weekday.as_deref().unwrap_or("-"));
    println!("    Mean recovery rate: {:.1}%", ins.mean_recovery_rate);
    println!("    Best recovery rate: {}", ins.best_recovery_entity.as_deref().unwrap_or("-"));
    println!("    Fastest average growth: {}", ins.fastest_growing_entity.as_deref().unwrap_or("-"));
}

fn print_stability(s: &StabilityReport) {
    println!("\n  Seed stability ({} runs from seed {})", s.n_runs, s.base_seed);
    println!("  {:<22} {:>16} {:>14} {:>16} {:>16}", "Metric", "Mean", "±95% CI", "Min", "Max");
    println!("  {}", "-".repeat(88));
    for (name, st) in [
        ("total_confirmed", &s.total_confirmed),
        ("total_deaths", &s.total_deaths),
        ("overall_cfr_pct", &s.overall_fatality_rate),
        ("peak_new_cases", &s.peak_daily_new_cases),
    ] {
        println!("  {:<22} {:>16.2} {:>14.2} {:>16.2} {:>16.2}",
            name, st.mean, (st.ci_upper - st.ci_lower) / 2.0, st.min, st.max);
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = parse_args();
    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("configuration rejected: {}", e);
            std::process::exit(2);
        }
    };

    println!("\n  Outbreak Report Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Seed: {} | Axis: {} .. {} | Entities: {} | Window: {}\n",
        config.random_seed, config.start_date, config.end_date,
        config.entity_list.len(), config.smoothing_window);

    let started = Instant::now();
    let analysis = match OutbreakPipeline::new(config.clone()).and_then(|p| p.run()) {
        Ok(r) => r,
        Err(e) => {
            error!("pipeline failed: {}", e);
            std::process::exit(1);
        }
    };
    print_report(&analysis);

    let stability = if cli.runs > 1 {
        match monte_carlo::run_stability(&config, cli.runs) {
            Ok(s) => {
                print_stability(&s);
                Some(s)
            }
            Err(e) => {
                error!("stability runs failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    let timestamp = format!("{}", ts);

    if cli.time_series {
        let recorder = TimeSeriesRecorder::from_daily(&analysis.daily_totals);
        let path = cli.out.join("time-series").join(format!("seed-{}.jsonl", config.random_seed));
        match recorder.write_jsonl(&path) {
            Ok(()) => info!(days = recorder.len(), path = %path.display(), "time series written"),
            Err(e) => warn!("failed to write time series: {}", e),
        }
    }

    let file = ReportFile {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        analysis: &analysis,
        stability,
    };

    if let Err(e) = std::fs::create_dir_all(&cli.out) {
        error!("failed to create {}: {}", cli.out.display(), e);
        std::process::exit(1);
    }
    let path = cli.out.join(format!("report-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&file).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write report file");
    println!("\n  Suite time: {:.2}s", started.elapsed().as_secs_f64());
    println!("  Results saved to: {}\n", path.display());
}
