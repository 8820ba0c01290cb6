// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Derived Metrics
//
// Ratio metrics never fail on a zero denominator: fatality and recovery rates
// fall back to 0, growth rates fall back to `None`. `None` means undefined and
// is excluded from averages; it is never read as zero.

use num_traits::ToPrimitive;

use crate::error::{OutbreakError, Result};

/// Default trailing window for smoothed growth, in days.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 7;

// ─── Ratios ─────────────────────────────────────────────────────────────────

/// Case-fatality rate in percent; 0 when nothing is confirmed.
pub fn fatality_rate(confirmed: u64, deaths: u64) -> f64 {
    percent_of(deaths, confirmed)
}

/// Recovery rate in percent; 0 when nothing is confirmed.
pub fn recovery_rate(confirmed: u64, recovered: u64) -> f64 {
    percent_of(recovered, confirmed)
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

// ─── Growth ─────────────────────────────────────────────────────────────────

/// Day-over-day percent change.
///
/// The first element is undefined, and so is any change from a zero prior
/// value. The result never contains an infinity or NaN.
pub fn growth_rate<T: ToPrimitive>(series: &[T]) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = series.iter().map(|v| v.to_f64()).collect();
    let mut rates = Vec::with_capacity(values.len());
    for (i, current) in values.iter().enumerate() {
        let rate = if i == 0 {
            None
        } else {
            match (values[i - 1], *current) {
                (Some(prev), Some(cur)) if prev != 0.0 => {
                    Some((cur - prev) / prev * 100.0).filter(|r| r.is_finite())
                }
                _ => None,
            }
        };
        rates.push(rate);
    }
    rates
}

/// Trailing mean of `growth_rate` over `window` days, no look-ahead.
///
/// The first `window - 1` entries are undefined, as is any window that holds
/// an undefined growth value. A zero window yields an all-undefined series.
pub fn smoothed_growth_rate<T: ToPrimitive>(series: &[T], window: usize) -> Vec<Option<f64>> {
    let rates = growth_rate(series);
    if window == 0 {
        return vec![None; rates.len()];
    }

    let mut smoothed = Vec::with_capacity(rates.len());
    let mut sum = 0.0;
    let mut undefined_in_window = 0usize;

    for (i, rate) in rates.iter().enumerate() {
        match rate {
            Some(r) => sum += r,
            None => undefined_in_window += 1,
        }
        if i >= window {
            match rates[i - window] {
                Some(r) => sum -= r,
                None => undefined_in_window -= 1,
            }
        }

        let full = i + 1 >= window;
        smoothed.push(if full && undefined_in_window == 0 {
            Some(sum / window as f64)
        } else {
            None
        });
    }
    smoothed
}

/// Mean of the defined growth values.
///
/// # Errors
/// - `InsufficientData` if every growth value is undefined.
pub fn average_growth_rate<T: ToPrimitive>(series: &[T]) -> Result<f64> {
    let defined: Vec<f64> = growth_rate(series).into_iter().flatten().collect();
    if defined.is_empty() {
        return Err(OutbreakError::InsufficientData(format!(
            "no defined growth rate in a series of {} values",
            series.len()
        )));
    }
    Ok(defined.iter().sum::<f64>() / defined.len() as f64)
}

/// Running total of a daily series, for callers that need monotone counts.
pub fn cumulative_confirmed(series: &[u64]) -> Vec<u64> {
    series
        .iter()
        .scan(0u64, |total, v| {
            *total = total.saturating_add(*v);
            Some(*total)
        })
        .collect()
}
