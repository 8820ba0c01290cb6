// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Correlation Analysis
//
// Pearson correlation across entities (one sample per snapshot row).

use serde::{Deserialize, Serialize};

use crate::types::EntitySnapshot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    Confirmed,
    Deaths,
    Recovered,
    Active,
    FatalityRate,
    RecoveryRate,
}

impl SnapshotField {
    pub const ALL: [SnapshotField; 6] = [
        Self::Confirmed,
        Self::Deaths,
        Self::Recovered,
        Self::Active,
        Self::FatalityRate,
        Self::RecoveryRate,
    ];

    pub fn value(&self, row: &EntitySnapshot) -> f64 {
        match self {
            Self::Confirmed => row.confirmed as f64,
            Self::Deaths => row.deaths as f64,
            Self::Recovered => row.recovered as f64,
            Self::Active => row.active as f64,
            Self::FatalityRate => row.fatality_rate,
            Self::RecoveryRate => row.recovery_rate,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Deaths => "deaths",
            Self::Recovered => "recovered",
            Self::Active => "active",
            Self::FatalityRate => "fatality_rate",
            Self::RecoveryRate => "recovery_rate",
        }
    }
}

/// Square matrix keyed by `fields` on both axes. `None` marks an undefined cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<SnapshotField>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: SnapshotField, b: SnapshotField) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        self.matrix[i][j]
    }
}

/// Pearson coefficient, `None` with fewer than two samples or zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Correlation matrix over `fields`, computed across the snapshot's entities.
pub fn correlate(snapshot: &[EntitySnapshot], fields: &[SnapshotField]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = fields
        .iter()
        .map(|f| snapshot.iter().map(|row| f.value(row)).collect())
        .collect();

    let k = fields.len();
    let mut matrix = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = if i == j {
                pearson(&columns[i], &columns[i]).map(|_| 1.0)
            } else {
                pearson(&columns[i], &columns[j])
            };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    CorrelationMatrix { fields: fields.to_vec(), matrix }
}
