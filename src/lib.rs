// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - synthetic epidemic curves and derived metrics

pub mod error;
pub mod types;
pub mod config;
pub mod parameters;
pub mod generator;
pub mod assembler;
pub mod aggregation;
pub mod metrics;
pub mod correlation;
pub mod pipeline;

pub use error::{OutbreakError, Result};
pub use types::*;
pub use config::PipelineConfig;
pub use parameters::{Archetype, CurveParameterProvider};
pub use generator::EpidemicCurveGenerator;
pub use assembler::SeriesAssembler;
pub use correlation::{CorrelationMatrix, SnapshotField};
pub use pipeline::{OutbreakPipeline, OutbreakReport};

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing handle on one finished pipeline run. Plotting code pulls
/// each exported table as a plain JS value.
#[wasm_bindgen]
pub struct OutbreakSession {
    report: OutbreakReport,
}

fn to_js_error(e: OutbreakError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, JsValue> {
    s.parse::<NaiveDate>()
        .map_err(|e| JsValue::from_str(&format!("invalid date {:?}: {}", s, e)))
}

impl OutbreakSession {
    fn from_config(config: PipelineConfig) -> Result<Self> {
        let report = OutbreakPipeline::new(config)?.run()?;
        Ok(Self { report })
    }

    pub fn report(&self) -> &OutbreakReport {
        &self.report
    }

    fn export<T: serde::Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
    }
}

#[wasm_bindgen]
impl OutbreakSession {
    /// Default entities and window over `start..=end` (ISO dates).
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, start: &str, end: &str) -> std::result::Result<OutbreakSession, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = PipelineConfig {
            start_date: parse_date(start)?,
            end_date: parse_date(end)?,
            random_seed: seed,
            ..PipelineConfig::default()
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// Full configuration as JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> std::result::Result<OutbreakSession, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = PipelineConfig::from_json_str(json).map_err(to_js_error)?;
        Self::from_config(config).map_err(to_js_error)
    }

    pub fn get_observations(&self) -> JsValue {
        Self::export(&self.report.observations)
    }

    pub fn get_daily_totals(&self) -> JsValue {
        Self::export(&self.report.daily_totals)
    }

    pub fn get_snapshot(&self) -> JsValue {
        Self::export(&self.report.snapshot)
    }

    pub fn get_rankings(&self) -> JsValue {
        Self::export(&self.report.rankings)
    }

    pub fn get_monthly_totals(&self) -> JsValue {
        Self::export(&self.report.monthly_totals)
    }

    pub fn get_weekday_averages(&self) -> JsValue {
        Self::export(&self.report.weekday_averages)
    }

    pub fn get_correlation(&self) -> JsValue {
        Self::export(&self.report.correlation)
    }

    pub fn get_growth(&self) -> JsValue {
        Self::export(&self.report.growth)
    }

    pub fn get_insights(&self) -> JsValue {
        Self::export(&self.report.insights)
    }

    pub fn row_count(&self) -> usize {
        self.report.observations.len()
    }
}
