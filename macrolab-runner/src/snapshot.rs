//! Per-entity snapshot pipeline.
//!
//! One entity (a country, a commodity) brings a map of indicator series;
//! the snapshot runs the whole engine over it:
//!
//! 1. trailing stats per indicator → score vector
//! 2. engine composites in config order
//! 3. regime probabilities over the [growth, inflation, liquidity,
//!    external] engine vector (absent engines read neutral)
//! 4. turning-point risk, nowcast, leading-composite history
//! 5. output gap from the configured activity level series
//! 6. balance scenarios from the configured assumptions
//!
//! Entities are independent, so `run_snapshots` fans out across them with
//! rayon. Data-quality shortfalls degrade to neutral blocks; only a
//! misconfigured regime table can actually error here.

use macrolab_core::domain::{PeriodKey, Series};
use macrolab_core::engine::{
    composite, composite_history, leading_composite, nowcast, CompositeScore, IndicatorScore,
    Nowcast, ScoreVector,
};
use macrolab_core::regime::{
    classify, turning_point_probability, RegimeError, RegimeReport, TurningPointInputs,
};
use macrolab_core::scenario::{evaluate, BalanceReport};
use macrolab_core::stats::{trailing_stats, TrailingStats};
use macrolab_core::trend::{output_gap, OutputGap};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::SnapshotConfig;

/// The four engine ids the regime/turning blocks read, in state-vector
/// order.
const STATE_ENGINES: [&str; 4] = ["growth", "inflation", "liquidity", "external"];

/// One entity's raw input: indicator id → series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInput {
    pub id: String,
    pub label: String,
    pub series: BTreeMap<String, Series>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("entity '{entity}': {source}")]
    Regime {
        entity: String,
        source: RegimeError,
    },
}

/// Complete scored state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity: String,
    pub label: String,
    /// Hash of the configuration that produced this snapshot.
    pub config_id: String,
    pub indicators: BTreeMap<String, TrailingStats>,
    pub scores: ScoreVector,
    /// Engine composites, in configuration order.
    pub engines: Vec<CompositeScore>,
    pub regime: RegimeReport,
    /// Turning-point probability in [0, 1].
    pub turning_point: f64,
    pub nowcast: Option<Nowcast>,
    pub composite_history: Option<Vec<(PeriodKey, f64)>>,
    pub output_gap: Option<OutputGap>,
    pub balance: BalanceReport,
    /// Data-coverage confidence in [0, 1]: 0.4·coverage + 0.6·window depth.
    pub confidence: f64,
}

impl EntitySnapshot {
    /// Engine composite by id.
    pub fn engine(&self, id: &str) -> Option<&CompositeScore> {
        self.engines.iter().find(|e| e.engine_id == id)
    }
}

/// Score one entity under a configuration.
pub fn run_snapshot(
    entity: &EntityInput,
    config: &SnapshotConfig,
) -> Result<EntitySnapshot, SnapshotError> {
    let series = restricted_series(entity, config);

    // Trailing stats and the score vector.
    let mut indicators = BTreeMap::new();
    let mut scores = ScoreVector::new();
    for (id, s) in &series {
        if let Some(stats) = trailing_stats(s, config.lookback_years) {
            if let Some(raw) = stats.latest.finite_value() {
                scores.insert(
                    id.clone(),
                    IndicatorScore {
                        z: stats.z,
                        raw,
                        period: stats.latest.period,
                    },
                );
            }
            indicators.insert(id.clone(), stats);
        }
    }

    // Engine composites, then the 4-dim state vector for classification.
    let engines: Vec<CompositeScore> = config
        .engines
        .iter()
        .map(|model| composite(model, &scores))
        .collect();
    let state: Vec<f64> = STATE_ENGINES
        .iter()
        .map(|id| engines.iter().find(|e| e.engine_id == *id).map_or(0.0, |e| e.z))
        .collect();

    let regime =
        classify(&state, &config.regimes, config.fragility_weight).map_err(|source| {
            SnapshotError::Regime {
                entity: entity.id.clone(),
                source,
            }
        })?;

    let turning_inputs = TurningPointInputs {
        growth_z: state[0],
        inflation_z: state[1],
        liquidity_z: state[2],
        external_z: state[3],
        unemployment_delta: indicators
            .get(&config.unemployment_indicator)
            .map_or(0.0, |s| s.delta),
        gdp_delta: indicators
            .get(&config.growth_indicator)
            .map_or(0.0, |s| s.delta),
    };
    let turning_point = turning_point_probability(&turning_inputs, &config.turning_weights);

    let composite_z = leading_composite(&config.leading, &scores);
    let nowcast = indicators
        .get(&config.growth_indicator)
        .map(|g| nowcast(g.mean, g.stdev, composite_z));

    let composite_history = composite_history(&series, &config.leading);

    let output_gap = config
        .activity_level_indicator
        .as_ref()
        .and_then(|id| series.get(id))
        .and_then(|s| output_gap(s, config.hp_lambda));

    let balance = evaluate(&config.balance, &config.sweep);
    let confidence = coverage_confidence(config, &indicators);

    Ok(EntitySnapshot {
        entity: entity.id.clone(),
        label: entity.label.clone(),
        config_id: config.config_id(),
        indicators,
        scores,
        engines,
        regime,
        turning_point,
        nowcast,
        composite_history,
        output_gap,
        balance,
        confidence,
    })
}

/// Score many entities in parallel. Entities are independent; order of the
/// output matches the input.
pub fn run_snapshots(
    entities: &[EntityInput],
    config: &SnapshotConfig,
) -> Vec<Result<EntitySnapshot, SnapshotError>> {
    entities
        .par_iter()
        .map(|entity| run_snapshot(entity, config))
        .collect()
}

/// Apply the optional start-period cutoff to every series.
fn restricted_series(entity: &EntityInput, config: &SnapshotConfig) -> BTreeMap<String, Series> {
    match config.start_period {
        None => entity.series.clone(),
        Some(cutoff) => entity
            .series
            .iter()
            .map(|(id, s)| {
                let points = s.window_from(cutoff);
                let restricted =
                    Series::from_points(points).expect("subset of a valid series is valid");
                (id.clone(), restricted)
            })
            .collect(),
    }
}

/// 0.4·(fraction of engine-referenced indicators with stats) +
/// 0.6·min(mean window / 10, 1).
fn coverage_confidence(
    config: &SnapshotConfig,
    indicators: &BTreeMap<String, TrailingStats>,
) -> f64 {
    let referenced: std::collections::BTreeSet<&str> = config
        .engines
        .iter()
        .flat_map(|m| m.terms.iter().map(|t| t.indicator.as_str()))
        .collect();
    if referenced.is_empty() {
        return 0.0;
    }

    let present: Vec<&TrailingStats> = referenced
        .iter()
        .filter_map(|id| indicators.get(*id))
        .collect();
    let coverage = present.len() as f64 / referenced.len() as f64;
    let avg_window = if present.is_empty() {
        0.0
    } else {
        present.iter().map(|s| s.window_len as f64).sum::<f64>() / present.len() as f64
    };
    0.4 * coverage + 0.6 * (avg_window / 10.0).min(1.0)
}
