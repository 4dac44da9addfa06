//! Turning-point risk: a hand-calibrated logistic scorecard.
//!
//! Six weakness features, each clamped to [0, 1] on its own scale, combined
//! with fixed weights and squashed through a logistic. This is a heuristic
//! scorecard, not a fitted model — the weights and scale constants are
//! configuration, and nothing here should be mistaken for estimated
//! coefficients.

use serde::{Deserialize, Serialize};

/// Feature scale constants (denominator of each clamp).
const GROWTH_SCALE: f64 = 2.0;
const UNEMPLOYMENT_SCALE: f64 = 2.0;
const LIQUIDITY_SCALE: f64 = 2.0;
const EXTERNAL_SCALE: f64 = 2.0;
const DIVERGENCE_SCALE: f64 = 2.5;
const GDP_DELTA_SCALE: f64 = 4.0;

/// Logistic shift/scale applied to the weighted feature sum.
const LOGIT_SCALE: f64 = 2.1;
const LOGIT_SHIFT: f64 = 1.2;

/// Current engine/indicator state feeding the scorecard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurningPointInputs {
    pub growth_z: f64,
    pub inflation_z: f64,
    pub liquidity_z: f64,
    pub external_z: f64,
    /// Change in the unemployment rate vs the previous print (pp).
    pub unemployment_delta: f64,
    /// Change in GDP growth vs the previous print (pp).
    pub gdp_delta: f64,
}

/// Scorecard weights. Defaults are the tuned production values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurningPointWeights {
    pub growth_weakness: f64,
    pub unemployment_rise: f64,
    pub liquidity_weakness: f64,
    pub external_weakness: f64,
    pub divergence: f64,
    pub gdp_delta_weakness: f64,
}

impl Default for TurningPointWeights {
    fn default() -> Self {
        Self {
            growth_weakness: 1.35,
            unemployment_rise: 0.90,
            liquidity_weakness: 1.10,
            external_weakness: 0.75,
            divergence: 0.65,
            gdp_delta_weakness: 0.55,
        }
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Probability of a cyclical turning point over the next period, in [0, 1].
pub fn turning_point_probability(
    inputs: &TurningPointInputs,
    weights: &TurningPointWeights,
) -> f64 {
    let f_growth = clamp01((-inputs.growth_z).max(0.0) / GROWTH_SCALE);
    let f_unemployment = clamp01(inputs.unemployment_delta.max(0.0) / UNEMPLOYMENT_SCALE);
    let f_liquidity = clamp01((-inputs.liquidity_z).max(0.0) / LIQUIDITY_SCALE);
    let f_external = clamp01((-inputs.external_z).max(0.0) / EXTERNAL_SCALE);
    let f_divergence = clamp01((inputs.growth_z - inputs.inflation_z).abs() / DIVERGENCE_SCALE);
    let f_gdp_delta = clamp01((-inputs.gdp_delta).max(0.0) / GDP_DELTA_SCALE);

    let s = weights.growth_weakness * f_growth
        + weights.unemployment_rise * f_unemployment
        + weights.liquidity_weakness * f_liquidity
        + weights.external_weakness * f_external
        + weights.divergence * f_divergence
        + weights.gdp_delta_weakness * f_gdp_delta;

    let p = 1.0 / (1.0 + (-(s * LOGIT_SCALE - LOGIT_SHIFT)).exp());
    clamp01(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::assert_approx;

    #[test]
    fn neutral_state_baseline_probability() {
        // All features zero → p = 1/(1+e^{1.2}).
        let p = turning_point_probability(
            &TurningPointInputs::default(),
            &TurningPointWeights::default(),
        );
        assert_approx(p, 1.0 / (1.0 + 1.2_f64.exp()), 1e-12);
    }

    #[test]
    fn broad_weakness_elevates_risk() {
        let inputs = TurningPointInputs {
            growth_z: -2.0,
            inflation_z: 1.0,
            liquidity_z: -2.0,
            external_z: -2.0,
            unemployment_delta: 2.0,
            gdp_delta: -4.0,
        };
        let p = turning_point_probability(&inputs, &TurningPointWeights::default());
        assert!(p > 0.9, "deep weakness should read as high risk, got {p}");
    }

    #[test]
    fn strength_does_not_add_risk() {
        // Positive growth/liquidity/external and falling unemployment leave
        // only the divergence feature active.
        let inputs = TurningPointInputs {
            growth_z: 2.0,
            inflation_z: 2.0,
            liquidity_z: 2.0,
            external_z: 2.0,
            unemployment_delta: -1.0,
            gdp_delta: 2.0,
        };
        let p = turning_point_probability(&inputs, &TurningPointWeights::default());
        let baseline = turning_point_probability(
            &TurningPointInputs::default(),
            &TurningPointWeights::default(),
        );
        assert_approx(p, baseline, 1e-12);
    }

    #[test]
    fn monotone_in_growth_weakness() {
        let weights = TurningPointWeights::default();
        let mut prev = 0.0;
        for step in 0..=8 {
            let inputs = TurningPointInputs {
                growth_z: -(step as f64) * 0.25,
                ..Default::default()
            };
            let p = turning_point_probability(&inputs, &weights);
            assert!(p >= prev, "risk must not fall as growth weakens");
            prev = p;
        }
    }

    #[test]
    fn probability_bounded() {
        let extreme = TurningPointInputs {
            growth_z: -100.0,
            inflation_z: 100.0,
            liquidity_z: -100.0,
            external_z: -100.0,
            unemployment_delta: 100.0,
            gdp_delta: -100.0,
        };
        let p = turning_point_probability(&extreme, &TurningPointWeights::default());
        assert!((0.0..=1.0).contains(&p));
        assert!(p > 0.9);
    }
}
