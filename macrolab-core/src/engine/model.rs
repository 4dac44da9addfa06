//! Engine model configuration.
//!
//! A model is an ordered list of `{indicator, weight, flip}` terms. Weights
//! are research priors calibrated offline; they arrive as configuration and
//! are never inferred here. Malformed models are caller programming errors
//! and fail loudly at construction, unlike data-quality conditions which
//! degrade to neutral during scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One weighted term of an engine model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTerm {
    /// Indicator id the term reads its z from.
    pub indicator: String,
    pub weight: f64,
    /// Flip the z before weighting, for indicators where "higher" means the
    /// opposite of what this engine measures (e.g. unemployment in a growth
    /// engine).
    #[serde(default)]
    pub flip: bool,
}

impl EngineTerm {
    pub fn new(indicator: &str, weight: f64) -> Self {
        Self {
            indicator: indicator.to_string(),
            weight,
            flip: false,
        }
    }

    pub fn flipped(indicator: &str, weight: f64) -> Self {
        Self {
            indicator: indicator.to_string(),
            weight,
            flip: true,
        }
    }
}

/// A named engine model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineModel {
    pub id: String,
    pub label: String,
    pub terms: Vec<EngineTerm>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("engine model '{0}' has no terms")]
    EmptyModel(String),

    #[error("engine model '{model}' term '{indicator}' has a non-finite weight")]
    NonFiniteWeight { model: String, indicator: String },

    #[error("engine model '{model}' references indicator '{indicator}' twice")]
    DuplicateIndicator { model: String, indicator: String },

    #[error("duplicate engine model id '{0}'")]
    DuplicateModel(String),
}

impl EngineModel {
    pub fn new(id: &str, label: &str, terms: Vec<EngineTerm>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            terms,
        }
    }

    /// Structural validation. Call once at configuration load.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.terms.is_empty() {
            return Err(ModelError::EmptyModel(self.id.clone()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for term in &self.terms {
            if !term.weight.is_finite() {
                return Err(ModelError::NonFiniteWeight {
                    model: self.id.clone(),
                    indicator: term.indicator.clone(),
                });
            }
            if !seen.insert(term.indicator.as_str()) {
                return Err(ModelError::DuplicateIndicator {
                    model: self.id.clone(),
                    indicator: term.indicator.clone(),
                });
            }
        }
        Ok(())
    }

    /// The generic stress composite: the named fallback applied when an
    /// entity has no calibrated model of its own. Broad dryness/heat terms,
    /// intentionally conservative.
    pub fn stress_default() -> Self {
        Self::new(
            "stress",
            "Stress composite (generic)",
            vec![
                EngineTerm::new("vapour_pressure_deficit", 0.15),
                EngineTerm::new("et0_fao_evapotranspiration", 0.12),
                EngineTerm::new("precipitation", -0.10),
                EngineTerm::new("soil_moisture_9_27cm", -0.12),
                EngineTerm::new("temperature_2m", 0.05),
                EngineTerm::new("wind_speed_100m", 0.03),
            ],
        )
    }
}

/// The four standard macro engines.
pub fn default_macro_models() -> Vec<EngineModel> {
    vec![
        EngineModel::new(
            "growth",
            "Growth",
            vec![
                EngineTerm::new("gdp_growth", 1.0),
                EngineTerm::flipped("unemployment", 0.4),
            ],
        ),
        EngineModel::new(
            "inflation",
            "Inflation",
            vec![EngineTerm::flipped("inflation", 1.0)],
        ),
        EngineModel::new("liquidity", "Liquidity", vec![EngineTerm::new("money", 1.0)]),
        EngineModel::new(
            "external",
            "External",
            vec![EngineTerm::new("current_account", 1.0)],
        ),
    ]
}

/// Validated collection of engine models plus the stress fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineLibrary {
    models: BTreeMap<String, EngineModel>,
    stress: EngineModel,
}

impl EngineLibrary {
    /// Build a library, validating every model (including the fallback).
    pub fn new(models: Vec<EngineModel>) -> Result<Self, ModelError> {
        Self::with_stress(models, EngineModel::stress_default())
    }

    /// Build a library with a custom stress fallback.
    pub fn with_stress(models: Vec<EngineModel>, stress: EngineModel) -> Result<Self, ModelError> {
        stress.validate()?;
        let mut map = BTreeMap::new();
        for model in models {
            model.validate()?;
            let id = model.id.clone();
            if map.insert(id.clone(), model).is_some() {
                return Err(ModelError::DuplicateModel(id));
            }
        }
        Ok(Self {
            models: map,
            stress,
        })
    }

    pub fn get(&self, id: &str) -> Option<&EngineModel> {
        self.models.get(id)
    }

    pub fn models(&self) -> impl Iterator<Item = &EngineModel> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The calibrated model for `id`, or the stress composite when none
    /// exists. The flag reports whether the fallback was used so callers can
    /// surface it rather than pass the substitution off silently.
    pub fn model_or_stress(&self, id: &str) -> (&EngineModel, bool) {
        match self.models.get(id) {
            Some(model) => (model, false),
            None => (&self.stress, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default_models() {
        for model in default_macro_models() {
            assert!(model.validate().is_ok(), "model {} invalid", model.id);
        }
        assert!(EngineModel::stress_default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_model() {
        let model = EngineModel::new("empty", "Empty", vec![]);
        assert_eq!(model.validate(), Err(ModelError::EmptyModel("empty".into())));
    }

    #[test]
    fn validate_rejects_nan_weight() {
        let model = EngineModel::new("bad", "Bad", vec![EngineTerm::new("x", f64::NAN)]);
        assert!(matches!(
            model.validate(),
            Err(ModelError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_indicator() {
        let model = EngineModel::new(
            "dup",
            "Dup",
            vec![EngineTerm::new("x", 1.0), EngineTerm::flipped("x", 0.5)],
        );
        assert!(matches!(
            model.validate(),
            Err(ModelError::DuplicateIndicator { .. })
        ));
    }

    #[test]
    fn library_rejects_duplicate_model_ids() {
        let m = EngineModel::new("growth", "Growth", vec![EngineTerm::new("gdp_growth", 1.0)]);
        let err = EngineLibrary::new(vec![m.clone(), m]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateModel("growth".into()));
    }

    #[test]
    fn library_falls_back_to_stress() {
        let lib = EngineLibrary::new(default_macro_models()).unwrap();
        let (model, fallback) = lib.model_or_stress("growth");
        assert_eq!(model.id, "growth");
        assert!(!fallback);

        let (model, fallback) = lib.model_or_stress("cocoa");
        assert_eq!(model.id, "stress");
        assert!(fallback);
    }

    #[test]
    fn model_toml_roundtrip() {
        let model = EngineModel::new(
            "growth",
            "Growth",
            vec![
                EngineTerm::new("gdp_growth", 1.0),
                EngineTerm::flipped("unemployment", 0.4),
            ],
        );
        let text = toml::to_string(&model).unwrap();
        let back: EngineModel = toml::from_str(&text).unwrap();
        assert_eq!(model, back);
    }
}
