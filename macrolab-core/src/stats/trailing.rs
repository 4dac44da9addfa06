//! Trailing-window stats for a single indicator series.
//!
//! The "current print vs recent history" view: mean/stdev over the last N
//! years, the z of the latest observation, its change versus the previous
//! print, and the closest historical analogue periods by z distance.

use crate::domain::{Observation, PeriodKey, Series};
use crate::stats::baseline::zscore;
use crate::stats::summary::SummaryStats;
use serde::{Deserialize, Serialize};

/// Default trailing window in years.
pub const DEFAULT_LOOKBACK_YEARS: i32 = 10;

/// How many analogue periods to report.
const ANALOGUE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingStats {
    pub latest: Observation,
    pub previous: Option<Observation>,
    /// Mean over the trailing window.
    pub mean: f64,
    /// Sample stdev over the trailing window.
    pub stdev: f64,
    /// Z of the latest value against the trailing window.
    pub z: f64,
    /// Latest minus previous print (0.0 when there is no previous print).
    pub delta: f64,
    /// Per-period z across the window, in period order.
    pub z_by_period: Vec<(PeriodKey, f64)>,
    /// Past periods whose z was closest to the latest z.
    pub analogues: Vec<PeriodKey>,
    /// Number of observations in the window.
    pub window_len: usize,
}

/// Compute trailing stats over the last `lookback_years` calendar years
/// ending at the latest finite observation. `None` when the series has no
/// finite value at all.
pub fn trailing_stats(series: &Series, lookback_years: i32) -> Option<TrailingStats> {
    let finite: Vec<Observation> = series
        .iter()
        .filter(|p| p.finite_value().is_some())
        .copied()
        .collect();
    let latest = *finite.last()?;
    let previous = finite.len().checked_sub(2).map(|i| finite[i]);

    let cutoff_year = latest.period.year() - lookback_years + 1;
    let window: Vec<Observation> = finite
        .iter()
        .filter(|p| p.period.year() >= cutoff_year)
        .copied()
        .collect();

    let values: Vec<f64> = window.iter().filter_map(|p| p.finite_value()).collect();
    let summary = SummaryStats::compute(&values)?;
    let latest_value = latest.finite_value()?;
    let z = zscore(latest_value, summary.mean, summary.stdev);

    let z_by_period: Vec<(PeriodKey, f64)> = window
        .iter()
        .filter_map(|p| {
            let v = p.finite_value()?;
            Some((p.period, zscore(v, summary.mean, summary.stdev)))
        })
        .collect();

    // Closest past periods by z distance, excluding the latest print itself.
    let mut ranked: Vec<(PeriodKey, f64)> = z_by_period
        .iter()
        .filter(|(period, _)| *period != latest.period)
        .map(|&(period, pz)| (period, (pz - z).abs()))
        .collect();
    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let analogues = ranked
        .into_iter()
        .take(ANALOGUE_COUNT)
        .map(|(period, _)| period)
        .collect();

    let delta = previous
        .and_then(|p| p.finite_value())
        .map(|prev| latest_value - prev)
        .unwrap_or(0.0);

    Some(TrailingStats {
        latest,
        previous,
        mean: summary.mean,
        stdev: summary.stdev,
        z,
        delta,
        z_by_period,
        analogues,
        window_len: window.len(),
    })
}
