//! Ensemble impact distribution.
//!
//! When a forecast comes as N member paths instead of one deterministic
//! path, each member gets its own composite impact and the spread of those
//! impacts is the scenario distribution: P10/P50/P90 percentiles, dispersion
//! and a confidence ratio.
//!
//! Member normalization is within-member — the lead-weighted mean scored
//! against the member's own mean/stdev — a fast proxy that avoids
//! re-baselining every member against the archive.

use crate::engine::model::EngineModel;
use crate::stats::baseline::zscore;
use crate::stats::lead::lead_weighted_mean;
use crate::stats::summary::{quantile, SummaryStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution of member impacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactDistribution {
    pub n: usize,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    /// Sample stdev of member impacts.
    pub dispersion: f64,
    pub iqr: f64,
    /// |median impact| / dispersion; 1.0 when the dispersion is degenerate.
    pub confidence: f64,
}

/// Composite impact of one ensemble member.
///
/// `member` maps indicator id → forward path (index 0 nearest). Indicators
/// the model references but the member lacks contribute nothing.
pub fn member_impact(
    member: &BTreeMap<String, Vec<Option<f64>>>,
    model: &EngineModel,
    tau: f64,
) -> f64 {
    let mut impact = 0.0;
    for term in &model.terms {
        let Some(path) = member.get(&term.indicator) else {
            continue;
        };
        let Some(lw) = lead_weighted_mean(path, tau) else {
            continue;
        };
        let finite: Vec<f64> = path.iter().filter_map(|v| v.filter(|x| x.is_finite())).collect();
        let Some(summary) = SummaryStats::compute(&finite) else {
            continue;
        };
        let z = zscore(lw, summary.mean, summary.stdev);
        let adjusted = if term.flip { -z } else { z };
        impact += term.weight * adjusted;
    }
    impact
}

/// Summarize member impacts into a scenario distribution. `None` on an
/// empty ensemble.
pub fn impact_distribution(impacts: &[f64]) -> Option<ImpactDistribution> {
    let summary = SummaryStats::compute(impacts)?;
    let p10 = quantile(impacts, 0.10)?;
    let p50 = quantile(impacts, 0.50)?;
    let p90 = quantile(impacts, 0.90)?;
    let dispersion = summary.stdev;
    let confidence = if dispersion > 1e-9 {
        p50.abs() / dispersion
    } else {
        1.0
    };
    Some(ImpactDistribution {
        n: impacts.len(),
        p10,
        p50,
        p90,
        dispersion,
        iqr: summary.iqr,
        confidence,
    })
}
