//! Hodrick–Prescott trend/cycle decomposition.
//!
//! Solves `(I + λ·K'K)·trend = y` where `K'K` is the pentadiagonal
//! second-difference operator with the standard boundary rows:
//!
//! ```text
//! row 0:    [1+λ,  −2λ,   λ]
//! row 1:    [−2λ, 1+5λ, −4λ,   λ]
//! interior: [λ,   −4λ, 1+6λ, −4λ, λ]
//! ```
//!
//! mirrored at the tail. The solve is dense Gaussian elimination with
//! partial pivoting — entirely adequate for the series lengths this engine
//! sees (annual macro history, n in the tens to low hundreds). A banded
//! solver would be O(n) instead but must reproduce the same trend within
//! floating tolerance.

/// Smoothing parameter for annual-frequency macro data.
pub const DEFAULT_LAMBDA: f64 = 100.0;

/// Series too short for the filter to mean anything.
const MIN_FILTER_LEN: usize = 6;

/// Trend and residual cycle, both the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCycle {
    pub trend: Vec<f64>,
    pub cycle: Vec<f64>,
}

/// Decompose a series (typically log-levels) into trend and cycle.
///
/// Fewer than 6 observations returns the input unchanged as trend with an
/// all-zero cycle — the filter is not meaningful on so short a series.
pub fn hp_filter(y: &[f64], lambda: f64) -> TrendCycle {
    let n = y.len();
    if n < MIN_FILTER_LEN {
        return TrendCycle {
            trend: y.to_vec(),
            cycle: vec![0.0; n],
        };
    }

    let l = lambda;
    let mut a = vec![vec![0.0; n]; n];
    for (i, row) in a.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    // λ·K'K, boundary rows first.
    a[0][0] += l;
    a[0][1] += -2.0 * l;
    a[0][2] += l;

    a[1][0] += -2.0 * l;
    a[1][1] += 5.0 * l;
    a[1][2] += -4.0 * l;
    a[1][3] += l;

    for i in 2..=(n - 3) {
        a[i][i - 2] += l;
        a[i][i - 1] += -4.0 * l;
        a[i][i] += 6.0 * l;
        a[i][i + 1] += -4.0 * l;
        a[i][i + 2] += l;
    }

    a[n - 2][n - 4] += l;
    a[n - 2][n - 3] += -4.0 * l;
    a[n - 2][n - 2] += 5.0 * l;
    a[n - 2][n - 1] += -2.0 * l;

    a[n - 1][n - 3] += l;
    a[n - 1][n - 2] += -2.0 * l;
    a[n - 1][n - 1] += l;

    let trend = gaussian_solve(a, y.to_vec());
    let cycle = y.iter().zip(&trend).map(|(v, t)| v - t).collect();
    TrendCycle { trend, cycle }
}

/// Dense Gaussian elimination with partial pivoting.
///
/// Near-singular pivots are skipped (row contributes zero) rather than
/// propagating infinities; the HP system itself is well-conditioned, so the
/// guard only matters for degenerate caller input.
fn gaussian_solve(mut m: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();

    for k in 0..n {
        let mut max_row = k;
        let mut max_val = m[k][k].abs();
        for i in (k + 1)..n {
            let v = m[i][k].abs();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }
        if max_val < 1e-12 {
            continue;
        }
        if max_row != k {
            m.swap(k, max_row);
            b.swap(k, max_row);
        }

        for i in (k + 1)..n {
            let f = m[i][k] / m[k][k];
            if !f.is_finite() {
                continue;
            }
            b[i] -= f * b[k];
            for j in k..n {
                m[i][j] -= f * m[k][j];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut s = b[i];
        for j in (i + 1)..n {
            s -= m[i][j] * x[j];
        }
        x[i] = if m[i][i].abs() < 1e-12 { 0.0 } else { s / m[i][i] };
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_passes_through() {
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let tc = hp_filter(&y, 100.0);
        assert_eq!(tc.trend, y.to_vec());
        assert!(tc.cycle.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn linear_series_is_its_own_trend() {
        // The penalty term is zero on any line, so the filter reproduces it.
        let y: Vec<f64> = (0..40).map(|i| 2.0 + 0.3 * i as f64).collect();
        let tc = hp_filter(&y, 100.0);
        for (i, (&t, &c)) in tc.trend.iter().zip(&tc.cycle).enumerate() {
            assert!((t - y[i]).abs() < 1e-6, "trend off at {i}: {t} vs {}", y[i]);
            assert!(c.abs() < 1e-6, "cycle not ~0 at {i}: {c}");
        }
    }

    #[test]
    fn zero_lambda_returns_input() {
        let y: Vec<f64> = (0..20).map(|i| (i as f64 * 0.7).sin()).collect();
        let tc = hp_filter(&y, 0.0);
        for (t, v) in tc.trend.iter().zip(&y) {
            assert!((t - v).abs() < 1e-9);
        }
    }

    #[test]
    fn trend_smooths_oscillation() {
        // Line plus oscillation: the trend should track the line and absorb
        // far less of the wiggle than the raw series carries.
        let y: Vec<f64> = (0..60)
            .map(|i| 10.0 + 0.5 * i as f64 + 2.0 * (i as f64 * 1.3).sin())
            .collect();
        let tc = hp_filter(&y, 100.0);

        let wiggle = |v: &[f64]| -> f64 {
            v.windows(3)
                .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
                .sum::<f64>()
        };
        assert!(wiggle(&tc.trend) < wiggle(&y) / 10.0);
        // Decomposition is exact: trend + cycle == y.
        for i in 0..y.len() {
            assert!((tc.trend[i] + tc.cycle[i] - y[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_series_flat_trend() {
        let y = vec![7.0; 30];
        let tc = hp_filter(&y, 100.0);
        for t in &tc.trend {
            assert!((t - 7.0).abs() < 1e-9);
        }
    }
}
