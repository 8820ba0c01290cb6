// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Pipeline Configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{OutbreakError, Result};
use crate::metrics::DEFAULT_SMOOTHING_WINDOW;
use crate::parameters::DEFAULT_ENTITIES;
use crate::types::DateAxis;

/// Entities tracked by the growth-rate analysis unless configured otherwise.
pub const DEFAULT_FOCUS_ENTITIES: [&str; 5] = ["US", "Italy", "Spain", "Germany", "China"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entity_list: Vec<String>,
    pub random_seed: u64,
    pub smoothing_window: usize,
    /// Entities that get per-entity growth analysis. Must be in `entity_list`.
    pub focus_entities: Vec<String>,
    /// Rows kept by each ranking.
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or_default(),
            entity_list: DEFAULT_ENTITIES.iter().map(|s| s.to_string()).collect(),
            random_seed: 42,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            focus_entities: DEFAULT_FOCUS_ENTITIES.iter().map(|s| s.to_string()).collect(),
            top_n: 10,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OutbreakError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| OutbreakError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn date_axis(&self) -> Result<DateAxis> {
        DateAxis::new(self.start_date, self.end_date)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(OutbreakError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.entity_list.is_empty() {
            return Err(OutbreakError::InvalidConfig("entity_list is empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.entity_list.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(OutbreakError::InvalidConfig(format!("entity listed twice: {}", dup)));
        }
        if self.smoothing_window == 0 {
            return Err(OutbreakError::InvalidConfig("smoothing_window must be at least 1".into()));
        }
        if let Some(missing) = self.focus_entities.iter().find(|id| !seen.contains(id.as_str())) {
            return Err(OutbreakError::InvalidConfig(format!(
                "focus entity not in entity_list: {}",
                missing
            )));
        }
        Ok(())
    }
}
