//! Lead-time decay weighting.
//!
//! Near-term observations matter more than distant ones when a series is a
//! forward path (a forecast horizon, a lead-time ladder). The weight is a
//! causal exponential decay `w(t) = exp(−t/τ)` over the step index from now;
//! it is not a symmetric smoothing kernel — recency dominates no matter how
//! long the series runs.

/// Default decay constant, in caller-defined steps (72 ≈ three days of
/// hourly leads).
pub const DEFAULT_TAU: f64 = 72.0;

/// Decay weight at `steps_from_now`. `lead_weight(0, τ) == 1` exactly.
pub fn lead_weight(steps_from_now: usize, tau: f64) -> f64 {
    (-(steps_from_now as f64) / tau).exp()
}

/// Lead-weighted mean over a gap-tolerant path. Index 0 is the nearest
/// observation. Gaps contribute nothing to either sum; an all-gap path has
/// no answer.
pub fn lead_weighted_mean(values: &[Option<f64>], tau: f64) -> Option<f64> {
    let mut num = 0.0;
    let mut den = 0.0;
    for (t, v) in values.iter().enumerate() {
        if let Some(x) = v.filter(|x| x.is_finite()) {
            let w = lead_weight(t, tau);
            num += w * x;
            den += w;
        }
    }
    if den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

/// Reusable decay configuration for callers aggregating many paths with one τ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadWeights {
    pub tau: f64,
}

impl Default for LeadWeights {
    fn default() -> Self {
        Self { tau: DEFAULT_TAU }
    }
}

impl LeadWeights {
    pub fn new(tau: f64) -> Self {
        assert!(tau > 0.0, "decay constant must be positive");
        Self { tau }
    }

    pub fn weight(&self, steps_from_now: usize) -> f64 {
        lead_weight(steps_from_now, self.tau)
    }

    pub fn weighted_mean(&self, values: &[Option<f64>]) -> Option<f64> {
        lead_weighted_mean(values, self.tau)
    }
}
