//! Baseline statistics and standard/robust scoring.
//!
//! A baseline is the reference distribution an anomaly is measured against —
//! typically an archive sample or a trailing multi-year window. The guard
//! policy is load-bearing: a near-zero spread normalizes to exactly 0, so
//! downstream composites read "no signal" rather than blowing up, and a
//! too-small sample invalidates the baseline entirely.

use crate::stats::summary::SummaryStats;
use serde::{Deserialize, Serialize};

/// Spreads at or below this are treated as degenerate.
pub const SIGMA_FLOOR: f64 = 1e-9;

/// Minimum sample size for a baseline to be considered valid.
pub const MIN_BASELINE_SAMPLE: usize = 30;

/// Standard score. Degenerate sigma yields exactly 0 (neutral), never
/// NaN or infinity.
pub fn zscore(x: f64, mean: f64, sigma: f64) -> f64 {
    if sigma > SIGMA_FLOOR {
        (x - mean) / sigma
    } else {
        0.0
    }
}

/// Robust score: deviation from the median scaled by IQR, same neutral
/// guard as `zscore`.
pub fn robust_score(x: f64, median: f64, iqr: f64) -> f64 {
    if iqr > SIGMA_FLOOR {
        (x - median) / iqr
    } else {
        0.0
    }
}

/// Reference-window statistics for anomaly scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub mean: f64,
    pub stdev: f64,
    pub median: f64,
    pub iqr: f64,
    pub n: usize,
}

impl BaselineStats {
    /// Build a baseline from a reference sample. Samples below
    /// [`MIN_BASELINE_SAMPLE`] produce no baseline at all.
    pub fn from_sample(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_BASELINE_SAMPLE {
            return None;
        }
        let s = SummaryStats::compute(values)?;
        Some(Self {
            mean: s.mean,
            stdev: s.stdev,
            median: s.median,
            iqr: s.iqr,
            n: s.n,
        })
    }

    pub fn zscore(&self, x: f64) -> f64 {
        zscore(x, self.mean, self.stdev)
    }

    pub fn robust_score(&self, x: f64) -> f64 {
        robust_score(x, self.median, self.iqr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn zscore_standard_case() {
        // Sample [10,20,30,40,50]: mean 30, sample stdev ≈ 15.811.
        let sd = 250.0_f64.sqrt();
        assert_approx(zscore(50.0, 30.0, sd), 1.2649, 1e-3);
    }

    #[test]
    fn zscore_neutral_on_degenerate_sigma() {
        assert_eq!(zscore(42.0, 10.0, 0.0), 0.0);
        assert_eq!(zscore(42.0, 10.0, 1e-10), 0.0);
        assert_eq!(zscore(42.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn robust_score_matches_formula() {
        assert_approx(robust_score(15.0, 10.0, 4.0), 1.25, DEFAULT_EPSILON);
        assert_eq!(robust_score(15.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn baseline_requires_minimum_sample() {
        let short: Vec<f64> = (0..29).map(|i| i as f64).collect();
        assert!(BaselineStats::from_sample(&short).is_none());

        let enough: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let b = BaselineStats::from_sample(&enough).unwrap();
        assert_eq!(b.n, 30);
        assert_approx(b.mean, 14.5, DEFAULT_EPSILON);
    }

    #[test]
    fn baseline_scores_through_methods() {
        let sample: Vec<f64> = (0..40).map(|i| (i % 10) as f64).collect();
        let b = BaselineStats::from_sample(&sample).unwrap();
        let z = b.zscore(9.0);
        assert!(z > 0.0);
        // Constant sample → all scores neutral.
        let flat = vec![5.0; 30];
        let b = BaselineStats::from_sample(&flat).unwrap();
        assert_eq!(b.zscore(100.0), 0.0);
        assert_eq!(b.robust_score(100.0), 0.0);
    }
}
