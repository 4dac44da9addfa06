//! ADF-lite stationarity screen.
//!
//! A single-lag Dickey–Fuller regression without trend term:
//! `Δy_t = α + β·y_{t−1}`, with the t-statistic of β compared against a
//! fixed rough 5% critical value. True Dickey–Fuller critical values vary
//! with sample size and lag specification; the fixed cutoff is a deliberate
//! screening heuristic, labelled as such wherever the result is shown, and
//! is not to be replaced without a product decision.

use serde::{Deserialize, Serialize};

/// Rough 5% critical value for the screen, fixed regardless of n.
pub const ADF_CRIT_5PCT: f64 = -2.86;

/// Minimum observations for the screen to run.
pub const MIN_ADF_SAMPLE: usize = 40;

/// Screen outcome. `ok: false` carries a reason instead of an error —
/// short or degenerate samples are data conditions, not failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityScreen {
    pub ok: bool,
    pub reason: Option<String>,
    /// t-statistic of the lagged-level coefficient.
    pub t_stat: Option<f64>,
    /// `t_stat < −2.86` when the screen ran.
    pub stationary: Option<bool>,
    /// Observations used.
    pub n: usize,
}

impl StationarityScreen {
    fn unavailable(n: usize, reason: &str) -> Self {
        Self {
            ok: false,
            reason: Some(reason.to_string()),
            t_stat: None,
            stationary: None,
            n,
        }
    }
}

/// Run the ADF-lite screen over a level series (finite values, in order).
pub fn adf_screen(levels: &[f64]) -> StationarityScreen {
    let n = levels.len();
    if n < MIN_ADF_SAMPLE {
        return StationarityScreen::unavailable(
            n,
            &format!("need at least {MIN_ADF_SAMPLE} observations, have {n}"),
        );
    }

    // Regress Δy on lagged level with intercept.
    let m = n - 1;
    let lagged = &levels[..m];
    let diffs: Vec<f64> = (1..n).map(|i| levels[i] - levels[i - 1]).collect();

    let x_mean = lagged.iter().sum::<f64>() / m as f64;
    let d_mean = diffs.iter().sum::<f64>() / m as f64;

    let mut sxx = 0.0;
    let mut sxd = 0.0;
    for i in 0..m {
        let dx = lagged[i] - x_mean;
        sxx += dx * dx;
        sxd += dx * (diffs[i] - d_mean);
    }
    if sxx < 1e-12 {
        return StationarityScreen::unavailable(n, "level series has no variation");
    }

    let beta = sxd / sxx;
    let alpha = d_mean - beta * x_mean;

    let mut rss = 0.0;
    for i in 0..m {
        let e = diffs[i] - alpha - beta * lagged[i];
        rss += e * e;
    }
    let dof = m - 2;
    let sigma_sq = rss / dof as f64;
    let se_beta = (sigma_sq / sxx).sqrt();
    if se_beta < 1e-12 {
        return StationarityScreen::unavailable(n, "degenerate regression fit");
    }

    let t_stat = beta / se_beta;
    StationarityScreen {
        ok: true,
        reason: None,
        t_stat: Some(t_stat),
        stationary: Some(t_stat < ADF_CRIT_5PCT),
        n,
    }
}
