// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Series Assembler

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::error::{OutbreakError, Result};
use crate::generator::EpidemicCurveGenerator;
use crate::parameters::CurveParameterProvider;
use crate::types::{DateAxis, ObservationRecord, ObservationTable};

/// Table built by [`SeriesAssembler::assemble`], plus the ids that had no
/// curve parameters and were left out.
#[derive(Debug, Clone)]
pub struct AssembledSeries {
    pub table: ObservationTable,
    pub skipped_entities: Vec<String>,
}

/// Runs the curve generator over every entity and validates the flat table.
pub struct SeriesAssembler<'a> {
    provider: &'a CurveParameterProvider,
    seed: u64,
}

impl<'a> SeriesAssembler<'a> {
    pub fn new(provider: &'a CurveParameterProvider, seed: u64) -> Self {
        Self { provider, seed }
    }

    /// Entity `index` draws from ChaCha stream `index` of the global seed, so
    /// its values do not depend on which other entities run or in what order.
    pub fn entity_rng(&self, index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(index as u64);
        rng
    }

    /// An unknown id is logged and skipped; the remaining entities keep the
    /// stream of their list position.
    pub fn assemble<S: AsRef<str>>(&self, entities: &[S], axis: &DateAxis) -> Result<AssembledSeries> {
        let mut records: Vec<ObservationRecord> = Vec::with_capacity(entities.len() * axis.len());
        let mut skipped_entities = Vec::new();

        for (index, entity_id) in entities.iter().enumerate() {
            let params = match self.provider.get_parameters(entity_id.as_ref()) {
                Ok(params) => params,
                Err(OutbreakError::UnknownEntity(id)) => {
                    warn!(entity = %id, "no curve parameters, entity skipped");
                    skipped_entities.push(id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let mut generator = EpidemicCurveGenerator::new(self.entity_rng(index));
            let series = generator.generate(&params, axis);
            debug!(
                entity = %params.entity_id,
                peak = params.peak_offset_days,
                amplitude = params.amplitude,
                days = series.len(),
                "generated entity series"
            );
            records.extend(series);
        }

        Ok(AssembledSeries {
            table: ObservationTable::from_records(records)?,
            skipped_entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn axis() -> DateAxis {
        DateAxis::new(
            NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 31).unwrap(),
        ).unwrap()
    }

    #[test]
    fn test_assemble_covers_every_entity_and_day() {
        let provider = CurveParameterProvider::default();
        let entities = ["US", "China", "Italy"];
        let axis = axis();
        let table = SeriesAssembler::new(&provider, 42).assemble(&entities, &axis).unwrap().table;
        assert_eq!(table.len(), entities.len() * axis.len());
        for id in entities {
            assert_eq!(table.entity_series(id).len(), axis.len());
        }
    }

    #[test]
    fn test_unknown_entity_is_skipped() {
        let provider = CurveParameterProvider::default();
        let assembler = SeriesAssembler::new(&provider, 42);
        let axis = axis();
        let mixed = assembler.assemble(&["US", "Atlantis", "Italy"], &axis).unwrap();
        assert_eq!(mixed.skipped_entities, vec!["Atlantis".to_string()]);
        assert_eq!(mixed.table.len(), 2 * axis.len());
        assert!(mixed.table.entity_series("Atlantis").is_empty());

        // Italy keeps the stream of its list position.
        let plain = assembler.assemble(&["US", "Spain", "Italy"], &axis).unwrap();
        assert_eq!(mixed.table.entity_series("Italy"), plain.table.entity_series("Italy"));
        assert_eq!(mixed.table.entity_series("US"), plain.table.entity_series("US"));
    }

    #[test]
    fn test_duplicate_entity_is_duplicate_key() {
        let provider = CurveParameterProvider::default();
        let err = SeriesAssembler::new(&provider, 42)
            .assemble(&["Spain", "Spain"], &axis())
            .unwrap_err();
        assert!(matches!(err, OutbreakError::DuplicateKey { ref entity_id, .. } if entity_id == "Spain"));
    }

    #[test]
    fn test_entity_streams_are_order_independent() {
        let provider = CurveParameterProvider::default();
        let axis = axis();
        let assembler = SeriesAssembler::new(&provider, 7);

        // Same entity at the same index yields the same series regardless of its neighbours.
        let a = assembler.assemble(&["France", "UK"], &axis).unwrap().table;
        let b = assembler.assemble(&["France", "Iran"], &axis).unwrap().table;
        assert_eq!(a.entity_series("France"), b.entity_series("France"));
    }

    #[test]
    fn test_streams_differ_per_index() {
        let provider = CurveParameterProvider::default();
        let assembler = SeriesAssembler::new(&provider, 7);
        let table = assembler.assemble(&["France", "UK"], &axis()).unwrap().table;
        // Both are general archetype; only the stream separates them.
        assert_ne!(table.confirmed_series("France"), table.confirmed_series("UK"));
    }
}
