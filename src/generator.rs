// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Epidemic Curve Generator
//
// Piecewise level curve: saturating growth up to the peak, exponential decay
// after it. Each day is an independent draw with multiplicative jitter and
// additive gaussian noise, so `confirmed` is not monotone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::{DateAxis, EntityParameters, ObservationRecord};

// ─── Constants ──────────────────────────────────────────────────────────────

/// Growth-phase time constant in days.
pub const GROWTH_TIME_CONSTANT: f64 = 30.0;

/// Decline-phase time constant in days.
pub const DECAY_TIME_CONSTANT: f64 = 60.0;

/// Gaussian noise sigma as a fraction of the day's base level.
pub const NOISE_FRACTION: f64 = 0.1;

const GROWTH_JITTER: (f64, f64) = (0.8, 1.2);
const DECLINE_JITTER: (f64, f64) = (0.9, 1.1);
const DEATH_RATIO: (f64, f64) = (0.01, 0.05);
const RECOVERY_RATIO: (f64, f64) = (0.7, 0.95);

// ─── Generator ──────────────────────────────────────────────────────────────

/// Seedable single-entity curve generator.
pub struct EpidemicCurveGenerator {
    rng: ChaCha8Rng,
}

impl EpidemicCurveGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Emits exactly one record per axis date, in axis order.
    pub fn generate(&mut self, params: &EntityParameters, axis: &DateAxis) -> Vec<ObservationRecord> {
        let mut records = Vec::with_capacity(axis.len());
        for (day_index, date) in axis.enumerate() {
            let base = self.base_level(params, day_index);
            let confirmed = self.noisy_count(base);
            let deaths = self.fraction_of(confirmed, DEATH_RATIO);
            let recovered = self.fraction_of(confirmed, RECOVERY_RATIO);
            let record = ObservationRecord::new(date, &params.entity_id, confirmed, deaths, recovered);
            records.push(record);
        }
        records
    }

    /// Jittered curve level for `day_index`.
    fn base_level(&mut self, params: &EntityParameters, day_index: u32) -> f64 {
        let i = day_index as f64;
        if day_index < params.peak_offset_days {
            let (lo, hi) = GROWTH_JITTER;
            params.amplitude * (1.0 - (-i / GROWTH_TIME_CONSTANT).exp()) * self.rng.gen_range(lo..hi)
        } else {
            let (lo, hi) = DECLINE_JITTER;
            let since_peak = i - params.peak_offset_days as f64;
            params.amplitude * (-since_peak / DECAY_TIME_CONSTANT).exp() * self.rng.gen_range(lo..hi)
        }
    }

    /// `trunc(max(0, base + N(0, 0.1 * base)))`
    fn noisy_count(&mut self, base: f64) -> u64 {
        let noisy = base + standard_normal(&mut self.rng) * base * NOISE_FRACTION;
        noisy.max(0.0) as u64
    }

    fn fraction_of(&mut self, confirmed: u64, (lo, hi): (f64, f64)) -> u64 {
        let ratio: f64 = self.rng.gen_range(lo..hi);
        (confirmed as f64 * ratio).max(0.0).floor() as u64
    }
}

/// Standard normal draw via Box-Muller.
/// `u1` is drawn from (0, 1] so the log never sees zero.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn axis(days: i64) -> DateAxis {
        let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
        DateAxis::new(start, start + chrono::Duration::days(days - 1)).unwrap()
    }

    fn params(peak: u32, amplitude: f64) -> EntityParameters {
        EntityParameters { entity_id: "Testland".into(), peak_offset_days: peak, amplitude }
    }

    #[test]
    fn test_one_record_per_day() {
        let mut gen = EpidemicCurveGenerator::from_seed(7);
        let axis = axis(4);
        let records = gen.generate(&params(100, 500_000.0), &axis);
        assert_eq!(records.len(), 4);
        for (record, date) in records.iter().zip(axis.dates()) {
            assert_eq!(record.date, *date);
            assert_eq!(record.entity_id, "Testland");
        }
    }

    #[test]
    fn test_every_phase_emits_records() {
        // Peak beyond the axis: growth only. Peak zero: decline only.
        for peak in [0, 10, 400] {
            let mut gen = EpidemicCurveGenerator::from_seed(1);
            assert_eq!(gen.generate(&params(peak, 1000.0), &axis(20)).len(), 20);
        }
    }

    #[test]
    fn test_counts_invariants() {
        let mut gen = EpidemicCurveGenerator::from_seed(42);
        for r in gen.generate(&params(90, 200_000.0), &axis(345)) {
            assert!(r.deaths <= r.confirmed);
            assert!(r.recovered <= r.confirmed);
            assert_eq!(
                r.active as i128,
                (r.confirmed as i128 - r.deaths as i128 - r.recovered as i128).max(0)
            );
        }
    }

    #[test]
    fn test_day_zero_is_empty_in_growth_phase() {
        // 1 - e^0 = 0, so the first growth day has no cases.
        let mut gen = EpidemicCurveGenerator::from_seed(3);
        let records = gen.generate(&params(50, 1_000_000.0), &axis(2));
        assert_eq!(records[0].confirmed, 0);
        assert_eq!(records[0].active, 0);
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = EpidemicCurveGenerator::from_seed(99).generate(&params(30, 80_000.0), &axis(60));
        let b = EpidemicCurveGenerator::from_seed(99).generate(&params(30, 80_000.0), &axis(60));
        let c = EpidemicCurveGenerator::from_seed(100).generate(&params(30, 80_000.0), &axis(60));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_curve_rises_then_declines() {
        let mut gen = EpidemicCurveGenerator::from_seed(5);
        let records = gen.generate(&params(100, 1_000_000.0), &axis(345));
        let mean = |range: std::ops::Range<usize>| {
            let n = range.len() as f64;
            records[range].iter().map(|r| r.confirmed as f64).sum::<f64>() / n
        };
        let early = mean(0..10);
        let peak = mean(90..110);
        let late = mean(330..345);
        assert!(early < peak, "early {} should be below peak {}", early, peak);
        assert!(late < peak, "late {} should be below peak {}", late, peak);
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!(mean.abs() < 0.05, "mean {} far from 0", mean);
        assert!((var - 1.0).abs() < 0.05, "variance {} far from 1", var);
    }
}
