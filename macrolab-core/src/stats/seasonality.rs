//! Calendar-month seasonality buckets.

use serde::{Deserialize, Serialize};

/// Average step return per calendar month, with observation counts.
/// Months with no observations stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeasonality {
    /// Index 0 = January.
    pub avg: [Option<f64>; 12],
    pub n: [usize; 12],
}

/// Bucket `(month 1–12, return)` pairs by calendar month.
///
/// Out-of-range months and non-finite returns are skipped, not errors —
/// a monthly view of annual data simply ends up mostly empty.
pub fn monthly_seasonality(points: impl IntoIterator<Item = (u32, f64)>) -> MonthlySeasonality {
    let mut sums = [0.0_f64; 12];
    let mut n = [0_usize; 12];
    for (month, ret) in points {
        if !(1..=12).contains(&month) || !ret.is_finite() {
            continue;
        }
        let i = (month - 1) as usize;
        sums[i] += ret;
        n[i] += 1;
    }
    let mut avg = [None; 12];
    for i in 0..12 {
        if n[i] > 0 {
            avg[i] = Some(sums[i] / n[i] as f64);
        }
    }
    MonthlySeasonality { avg, n }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn buckets_by_month() {
        let season = monthly_seasonality([(1, 0.02), (1, 0.04), (6, -0.01)]);
        assert_approx(season.avg[0].unwrap(), 0.03, DEFAULT_EPSILON);
        assert_eq!(season.n[0], 2);
        assert_approx(season.avg[5].unwrap(), -0.01, DEFAULT_EPSILON);
        assert_eq!(season.avg[1], None);
        assert_eq!(season.n[11], 0);
    }

    #[test]
    fn skips_invalid_input() {
        let season = monthly_seasonality([(0, 1.0), (13, 1.0), (3, f64::NAN)]);
        assert!(season.avg.iter().all(|a| a.is_none()));
    }

    #[test]
    fn empty_input_all_none() {
        let season = monthly_seasonality(std::iter::empty());
        assert!(season.avg.iter().all(|a| a.is_none()));
        assert_eq!(season.n.iter().sum::<usize>(), 0);
    }
}
