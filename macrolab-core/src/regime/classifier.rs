//! Probabilistic regime classification in composite-z space.
//!
//! Each regime is a centroid in the engine-score space (growth, inflation,
//! liquidity, external by default). A state vector scores each regime by
//! negative squared distance, less a fragility penalty when the first two
//! components (growth vs inflation) disagree sharply; softmax turns the
//! scores into probabilities. Centroids are tuned for interpretability,
//! not fitted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight on the growth/inflation disagreement penalty.
pub const FRAGILITY_WEIGHT: f64 = 0.35;

/// A named regime centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub id: String,
    pub label: String,
    pub centroid: Vec<f64>,
}

impl Regime {
    pub fn new(id: &str, label: &str, centroid: Vec<f64>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            centroid,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegimeError {
    #[error("regime table is empty")]
    EmptyTable,

    #[error("regime '{regime}' centroid has {got} components, expected {expected}")]
    RaggedCentroid {
        regime: String,
        expected: usize,
        got: usize,
    },

    #[error("regime '{0}' centroid has a non-finite component")]
    NonFiniteCentroid(String),

    #[error("state vector has {got} components, table expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Validated, fixed-dimension regime table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Regime>", into = "Vec<Regime>")]
pub struct RegimeTable {
    regimes: Vec<Regime>,
    dimension: usize,
}

impl RegimeTable {
    /// Build a table. All centroids must share one finite dimension —
    /// a mismatch is a setup mistake and errors immediately.
    pub fn new(regimes: Vec<Regime>) -> Result<Self, RegimeError> {
        let dimension = regimes.first().ok_or(RegimeError::EmptyTable)?.centroid.len();
        for regime in &regimes {
            if regime.centroid.len() != dimension {
                return Err(RegimeError::RaggedCentroid {
                    regime: regime.id.clone(),
                    expected: dimension,
                    got: regime.centroid.len(),
                });
            }
            if regime.centroid.iter().any(|c| !c.is_finite()) {
                return Err(RegimeError::NonFiniteCentroid(regime.id.clone()));
            }
        }
        Ok(Self { regimes, dimension })
    }

    /// The standard macro table over [growth, inflation, liquidity,
    /// external] z-space. Inflation is in engine convention: negative means
    /// inflation pressure.
    pub fn default_macro() -> Self {
        Self::new(vec![
            Regime::new("goldilocks", "Goldilocks", vec![0.9, 0.6, 0.6, 0.2]),
            Regime::new("overheat", "Overheat", vec![0.6, -0.8, 0.5, 0.0]),
            Regime::new("slowdown", "Slowdown", vec![-0.9, 0.5, -0.6, -0.2]),
            Regime::new("stress", "External stress", vec![-0.4, 0.2, -0.4, -1.2]),
            Regime::new("stagflation", "Stagflation", vec![-0.8, -0.8, -0.2, -0.2]),
        ])
        .expect("default table is well-formed")
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }
}

impl TryFrom<Vec<Regime>> for RegimeTable {
    type Error = RegimeError;
    fn try_from(regimes: Vec<Regime>) -> Result<Self, Self::Error> {
        Self::new(regimes)
    }
}

impl From<RegimeTable> for Vec<Regime> {
    fn from(table: RegimeTable) -> Self {
        table.regimes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeProbability {
    pub id: String,
    pub label: String,
    pub p: f64,
}

/// Classification output: probabilities sorted descending, plus a
/// separation-based confidence heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub probabilities: Vec<RegimeProbability>,
    /// `clamp01((p₁ − p₂)·1.8 + 0.15)` — grows with the gap between the top
    /// two regimes.
    pub confidence: f64,
}

impl RegimeReport {
    pub fn top(&self) -> &RegimeProbability {
        &self.probabilities[0]
    }
}

/// Classify a state vector against a regime table.
pub fn classify(
    x: &[f64],
    table: &RegimeTable,
    fragility_weight: f64,
) -> Result<RegimeReport, RegimeError> {
    if x.len() != table.dimension() {
        return Err(RegimeError::DimensionMismatch {
            expected: table.dimension(),
            got: x.len(),
        });
    }

    let fragility = if x.len() >= 2 { (x[0] - x[1]).abs() } else { 0.0 };
    let scores: Vec<f64> = table
        .regimes()
        .iter()
        .map(|r| {
            let d2: f64 = x
                .iter()
                .zip(&r.centroid)
                .map(|(xi, ci)| (xi - ci) * (xi - ci))
                .sum();
            -(d2 + fragility_weight * fragility)
        })
        .collect();

    let p = softmax(&scores);
    let mut probabilities: Vec<RegimeProbability> = table
        .regimes()
        .iter()
        .zip(p)
        .map(|(r, p)| RegimeProbability {
            id: r.id.clone(),
            label: r.label.clone(),
            p,
        })
        .collect();
    probabilities.sort_by(|a, b| {
        b.p.partial_cmp(&a.p)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let second = probabilities.get(1).map(|r| r.p).unwrap_or(0.0);
    let confidence = ((probabilities[0].p - second) * 1.8 + 0.15).clamp(0.0, 1.0);

    Ok(RegimeReport {
        probabilities,
        confidence,
    })
}

/// Numerically stable softmax (max-shifted).
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
