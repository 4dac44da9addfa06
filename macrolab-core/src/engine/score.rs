//! Composite scoring: weighted z combination and the bounded display score.
//!
//! The display mapping `round(50 + clamp(z, −2.5, 2.5)/2.5 · 40)` — a 10–90
//! range centred on 50 — is the one convention shared by every consumer of
//! these scores. Do not change it without changing them all.

use crate::domain::PeriodKey;
use crate::engine::model::EngineModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Z clamp applied before display scaling.
pub const DISPLAY_CLAMP: f64 = 2.5;

/// One indicator's normalized reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub z: f64,
    /// Raw value behind the z, kept for explainability output.
    pub raw: f64,
    pub period: PeriodKey,
}

/// Named mapping from indicator id to its current score.
///
/// Backed by a `BTreeMap` so iteration (and everything derived from it —
/// contributions, reports, hashes) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    scores: BTreeMap<String, IndicatorScore>,
}

impl ScoreVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, indicator: impl Into<String>, score: IndicatorScore) {
        self.scores.insert(indicator.into(), score);
    }

    pub fn get(&self, indicator: &str) -> Option<&IndicatorScore> {
        self.scores.get(indicator)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndicatorScore)> {
        self.scores.iter()
    }
}

/// Average several score vectors (e.g. per-hub vectors of one commodity)
/// into one. Z and raw are averaged per indicator over the vectors that
/// carry it; the period is the latest contributor's.
pub fn merge_mean(vectors: &[ScoreVector]) -> ScoreVector {
    let mut grouped: BTreeMap<&str, Vec<&IndicatorScore>> = BTreeMap::new();
    for vector in vectors {
        for (indicator, score) in vector.iter() {
            grouped.entry(indicator).or_default().push(score);
        }
    }
    let mut out = ScoreVector::new();
    for (indicator, scores) in grouped {
        let n = scores.len() as f64;
        let z = scores.iter().map(|s| s.z).sum::<f64>() / n;
        let raw = scores.iter().map(|s| s.raw).sum::<f64>() / n;
        let period = scores
            .iter()
            .map(|s| s.period)
            .max()
            .expect("group is non-empty");
        out.insert(indicator, IndicatorScore { z, raw, period });
    }
    out
}

/// One term's contribution to a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub indicator: String,
    pub weight: f64,
    /// Z after the model's sign flip.
    pub z_adjusted: f64,
    pub contribution: f64,
}

/// Weighted composite of one engine model over one score vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub engine_id: String,
    pub z: f64,
    /// Bounded 10–90 display score.
    pub display_score: i32,
    /// Per-term contributions, sorted by |contribution| descending — the
    /// "top drivers" consumed by reports.
    pub contributions: Vec<Contribution>,
    /// Model terms that had no score available and were skipped.
    pub missing: Vec<String>,
}

/// Map a composite z onto the bounded 10–90 display range.
pub fn display_score(z: f64) -> i32 {
    let clamped = z.clamp(-DISPLAY_CLAMP, DISPLAY_CLAMP);
    (50.0 + clamped / DISPLAY_CLAMP * 40.0).round() as i32
}

/// Score one engine model against a score vector.
///
/// Terms whose indicator has no score are skipped and listed in `missing` —
/// never zero-filled into the sum. A model with no available terms at all
/// scores neutral (z = 0, display 50): unknown, not an error.
pub fn composite(model: &EngineModel, scores: &ScoreVector) -> CompositeScore {
    let mut z = 0.0;
    let mut contributions = Vec::new();
    let mut missing = Vec::new();

    for term in &model.terms {
        match scores.get(&term.indicator) {
            Some(score) => {
                let z_adjusted = if term.flip { -score.z } else { score.z };
                let contribution = term.weight * z_adjusted;
                z += contribution;
                contributions.push(Contribution {
                    indicator: term.indicator.clone(),
                    weight: term.weight,
                    z_adjusted,
                    contribution,
                });
            }
            None => missing.push(term.indicator.clone()),
        }
    }

    if contributions.is_empty() {
        z = 0.0;
    }

    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.indicator.cmp(&b.indicator))
    });

    CompositeScore {
        engine_id: model.id.clone(),
        z,
        display_score: display_score(z),
        contributions,
        missing,
    }
}
