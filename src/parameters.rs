// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Curve Parameter Provider
//
// Entities are bucketed into outbreak archetypes by a static data table.
// The generator never branches on entity identity; it only sees the
// (peak_offset_days, amplitude) pair resolved here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{OutbreakError, Result};
use crate::types::EntityParameters;

// ─── Archetypes ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    /// Early outbreak, then controlled.
    EarlyContained,
    FirstWave,
    MultiWave,
    /// Late outbreak with very high case counts.
    LateSurge,
    General,
}

impl Default for Archetype {
    fn default() -> Self { Archetype::General }
}

impl Archetype {
    pub fn peak_offset_days(&self) -> u32 {
        match self {
            Self::EarlyContained => 30,
            Self::FirstWave => 90,
            Self::MultiWave => 120,
            Self::LateSurge => 200,
            Self::General => 100,
        }
    }

    pub fn amplitude(&self) -> f64 {
        match self {
            Self::EarlyContained => 80_000.0,
            Self::FirstWave => 200_000.0,
            Self::MultiWave => 20_000_000.0,
            Self::LateSurge => 5_000_000.0,
            Self::General => 500_000.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EarlyContained => "early-contained",
            Self::FirstWave => "first-wave",
            Self::MultiWave => "multi-wave",
            Self::LateSurge => "late-surge",
            Self::General => "general",
        }
    }
}

/// Default tracked entities, in reporting order.
pub const DEFAULT_ENTITIES: [&str; 15] = [
    "US", "Italy", "Spain", "Germany", "France", "UK", "China", "Iran",
    "South Korea", "Brazil", "India", "Russia", "Turkey", "Belgium", "Netherlands",
];

/// Entities with a non-general archetype in the default table.
const DEFAULT_ASSIGNMENTS: [(&str, Archetype); 6] = [
    ("China", Archetype::EarlyContained),
    ("Italy", Archetype::FirstWave),
    ("Spain", Archetype::FirstWave),
    ("US", Archetype::MultiWave),
    ("Brazil", Archetype::LateSurge),
    ("India", Archetype::LateSurge),
];

// ─── Parameter Table ────────────────────────────────────────────────────────

/// Read-only entity → archetype lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveParameterProvider {
    assignments: HashMap<String, Archetype>,
}

impl Default for CurveParameterProvider {
    fn default() -> Self {
        let mut assignments: HashMap<String, Archetype> = DEFAULT_ENTITIES
            .iter()
            .map(|id| (id.to_string(), Archetype::General))
            .collect();
        for (id, archetype) in DEFAULT_ASSIGNMENTS {
            assignments.insert(id.to_string(), archetype);
        }
        Self { assignments }
    }
}

impl CurveParameterProvider {
    pub fn empty() -> Self {
        Self { assignments: HashMap::new() }
    }

    /// Adds or reassigns an entity. Consumes `self` so the table is fixed
    /// once it is handed to the pipeline.
    pub fn with_entity(mut self, entity_id: impl Into<String>, archetype: Archetype) -> Self {
        self.assignments.insert(entity_id.into(), archetype);
        self
    }

    pub fn archetype_of(&self, entity_id: &str) -> Result<Archetype> {
        self.assignments
            .get(entity_id)
            .copied()
            .ok_or_else(|| OutbreakError::UnknownEntity(entity_id.to_string()))
    }

    pub fn get_parameters(&self, entity_id: &str) -> Result<EntityParameters> {
        let archetype = self.archetype_of(entity_id)?;
        Ok(EntityParameters {
            entity_id: entity_id.to_string(),
            peak_offset_days: archetype.peak_offset_days(),
            amplitude: archetype.amplitude(),
        })
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.assignments.contains_key(entity_id)
    }

    pub fn len(&self) -> usize { self.assignments.len() }
    pub fn is_empty(&self) -> bool { self.assignments.is_empty() }
}
