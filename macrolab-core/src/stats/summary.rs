//! Distribution summary over a numeric sample window.
//!
//! Input is already filtered to finite values (callers strip nulls/NaN when
//! flattening a `Series`). Quantiles interpolate linearly at fractional
//! ranks. Standard deviation is the sample form (divide by n−1); the
//! higher moments are population moments — this feeds screens and reports,
//! not inference, so unbiased corrections are not required.

use serde::{Deserialize, Serialize};

/// Minimum sample size for a summary to be flagged usable in reports.
pub const MIN_SUMMARY_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n−1), 0.0 for a single observation.
    pub stdev: f64,
    pub skew: f64,
    /// Excess kurtosis (normal = 0).
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub iqr: f64,
}

impl SummaryStats {
    /// Summarize a sample. Empty input yields `None` — never a panic.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
            m3 += d * d * d;
            m4 += d * d * d * d;
        }
        m2 /= nf;
        m3 /= nf;
        m4 /= nf;

        let stdev = if n > 1 {
            (m2 * nf / (nf - 1.0)).sqrt()
        } else {
            0.0
        };

        let (skew, kurtosis) = if m2 > 0.0 {
            (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
        } else {
            (0.0, 0.0)
        };

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = quantile_sorted(&sorted, 0.5);
        let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);

        Some(Self {
            n,
            mean,
            stdev,
            skew,
            kurtosis,
            min,
            max,
            median,
            iqr,
        })
    }

    /// Whether the sample is large enough to quote in a report.
    pub fn is_sufficient(&self) -> bool {
        self.n >= MIN_SUMMARY_SAMPLE
    }
}

/// Quantile with linear interpolation at fractional ranks.
///
/// `result = s[floor(idx)] + (s[ceil(idx)] − s[floor(idx)]) · frac(idx)`
/// with `idx = (n−1)·p`. Empty input yields `None`.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(quantile_sorted(&sorted, p))
}

fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
    }
}

/// Pearson correlation over paired samples.
///
/// Uses the shorter of the two lengths. Returns `None` below 3 pairs or when
/// either side has zero spread.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 3 {
        return None;
    }
    let x = &x[..n];
    let y = &y[..n];
    let sx = SummaryStats::compute(x)?;
    let sy = SummaryStats::compute(y)?;
    if sx.stdev == 0.0 || sy.stdev == 0.0 {
        return None;
    }
    let mut cov = 0.0;
    for i in 0..n {
        cov += (x[i] - sx.mean) * (y[i] - sy.mean);
    }
    cov /= (n - 1) as f64;
    Some(cov / (sx.stdev * sy.stdev))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn summary_basic_sample() {
        let s = SummaryStats::compute(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
        assert_eq!(s.n, 5);
        assert_approx(s.mean, 30.0, DEFAULT_EPSILON);
        // Sample stdev of 10..50 step 10.
        assert_approx(s.stdev, 250.0_f64.sqrt(), DEFAULT_EPSILON);
        assert_approx(s.median, 30.0, DEFAULT_EPSILON);
        assert_approx(s.iqr, 20.0, DEFAULT_EPSILON);
        assert_approx(s.skew, 0.0, DEFAULT_EPSILON);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 50.0);
        assert!(s.is_sufficient());
    }

    #[test]
    fn summary_empty_is_none() {
        assert!(SummaryStats::compute(&[]).is_none());
    }

    #[test]
    fn summary_single_value() {
        let s = SummaryStats::compute(&[7.0]).unwrap();
        assert_eq!(s.stdev, 0.0);
        assert_eq!(s.skew, 0.0);
        assert_eq!(s.median, 7.0);
        assert!(!s.is_sufficient());
    }

    #[test]
    fn summary_constant_sample_degenerate_moments() {
        let s = SummaryStats::compute(&[3.0; 10]).unwrap();
        assert_eq!(s.stdev, 0.0);
        assert_eq!(s.skew, 0.0);
        assert_eq!(s.kurtosis, 0.0);
        assert_eq!(s.iqr, 0.0);
    }

    #[test]
    fn quantile_boundaries() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(5.0));
        assert_eq!(quantile(&v, 0.5), Some(3.0));
    }

    #[test]
    fn quantile_interpolates() {
        // idx = 3 * 0.25 = 0.75 → 1 + (2-1)*0.75 = 1.75
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_approx(quantile(&v, 0.25).unwrap(), 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn quantile_unsorted_input() {
        let v = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(quantile(&v, 0.5), Some(3.0));
    }

    #[test]
    fn quantile_empty_is_none() {
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn correlation_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_approx(correlation(&x, &y).unwrap(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn correlation_perfect_negative() {
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        assert_approx(correlation(&x, &y).unwrap(), -1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn correlation_too_short_or_flat_is_none() {
        assert_eq!(correlation(&[1.0, 2.0], &[1.0, 2.0]), None);
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn correlation_uses_shorter_length() {
        let x = [1.0, 2.0, 3.0, 100.0];
        let y = [2.0, 4.0, 6.0];
        assert_approx(correlation(&x, &y).unwrap(), 1.0, DEFAULT_EPSILON);
    }
}
