//! Leading composite and growth nowcast.
//!
//! The leading composite compresses the faster-moving indicators (money,
//! external balance, labour, prices) into one clamped z; the nowcast maps
//! that composite back into growth space around the historical mean. The
//! mapping constants are interpretability choices, not fitted coefficients.

use crate::domain::{PeriodKey, Series};
use crate::engine::model::{EngineModel, EngineTerm};
use crate::engine::score::{composite, ScoreVector};
use crate::stats::baseline::zscore;
use crate::stats::summary::SummaryStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Clamp applied to the leading composite.
pub const COMPOSITE_CLAMP: f64 = 2.5;

/// Composite-to-growth slope as a fraction of growth stdev.
const NOWCAST_BETA: f64 = 0.55;

/// Normalizer taking the clamped composite toward ±1 before the slope.
const COMPOSITE_SCALE: f64 = 1.4;

/// Minimum aligned periods for a composite history to be worth reporting.
const MIN_HISTORY_PERIODS: usize = 8;

/// Default leading-composite model: liquidity and external support, less
/// labour-market and inflation tension.
pub fn default_leading_model() -> EngineModel {
    EngineModel::new(
        "leading",
        "Leading composite",
        vec![
            EngineTerm::new("money", 0.45),
            EngineTerm::new("current_account", 0.30),
            EngineTerm::new("unemployment", -0.35),
            EngineTerm::new("inflation", -0.20),
        ],
    )
}

/// Leading composite over current scores, clamped to ±2.5.
pub fn leading_composite(model: &EngineModel, scores: &ScoreVector) -> f64 {
    composite(model, scores)
        .z
        .clamp(-COMPOSITE_CLAMP, COMPOSITE_CLAMP)
}

/// Nowcast for a target series: its window mean shifted by the composite.
///
/// `mean + 0.55·stdev·(composite/1.4)`; a degenerate stdev falls back to a
/// unit slope so the composite still registers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nowcast {
    pub value: f64,
    pub composite: f64,
    pub mean: f64,
    pub stdev: f64,
}

pub fn nowcast(mean: f64, stdev: f64, composite_z: f64) -> Nowcast {
    let slope = NOWCAST_BETA * if stdev > 0.0 { stdev } else { 1.0 };
    Nowcast {
        value: mean + slope * (composite_z / COMPOSITE_SCALE),
        composite: composite_z,
        mean,
        stdev,
    }
}

/// Composite history across the periods where the model's components have
/// data.
///
/// Each component series is z-scored against its own full sample, then the
/// model weights combine whatever components a period has (absent
/// components contribute nothing). Returns `None` below 8 usable periods.
pub fn composite_history(
    series_by_indicator: &BTreeMap<String, Series>,
    model: &EngineModel,
) -> Option<Vec<(PeriodKey, f64)>> {
    // Full-sample z map per component.
    let mut z_maps: BTreeMap<&str, BTreeMap<PeriodKey, f64>> = BTreeMap::new();
    for term in &model.terms {
        let Some(series) = series_by_indicator.get(&term.indicator) else {
            continue;
        };
        let values = series.finite_values();
        let Some(summary) = SummaryStats::compute(&values) else {
            continue;
        };
        let map = series
            .iter()
            .filter_map(|p| {
                let v = p.finite_value()?;
                Some((p.period, zscore(v, summary.mean, summary.stdev)))
            })
            .collect();
        z_maps.insert(term.indicator.as_str(), map);
    }

    let mut periods: std::collections::BTreeSet<PeriodKey> = std::collections::BTreeSet::new();
    for map in z_maps.values() {
        periods.extend(map.keys().copied());
    }
    if periods.len() < MIN_HISTORY_PERIODS {
        return None;
    }

    let mut out = Vec::with_capacity(periods.len());
    for period in periods {
        let mut comp = 0.0;
        let mut any = false;
        for term in &model.terms {
            if let Some(z) = z_maps.get(term.indicator.as_str()).and_then(|m| m.get(&period)) {
                let adjusted = if term.flip { -z } else { *z };
                comp += term.weight * adjusted;
                any = true;
            }
        }
        if any {
            out.push((period, comp.clamp(-COMPOSITE_CLAMP, COMPOSITE_CLAMP)));
        }
    }

    (out.len() >= MIN_HISTORY_PERIODS).then_some(out)
}
