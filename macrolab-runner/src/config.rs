//! Serializable snapshot configuration.
//!
//! One TOML document defines everything a run needs: engine models, the
//! leading-composite model, the regime table, turning-point weights, balance
//! assumptions, and the windowing policies. Every field has a production
//! default, so a partial file (or none at all) is a valid configuration.
//!
//! The `config_id` is a blake3 hash of the canonical JSON serialization —
//! two runs with identical configs carry identical ids, so artifacts can be
//! traced back to the exact parameters that produced them.

use macrolab_core::domain::{Indicator, PeriodKey};
use macrolab_core::engine::{default_leading_model, default_macro_models, EngineLibrary, EngineModel, ModelError};
use macrolab_core::regime::{RegimeTable, TurningPointWeights, FRAGILITY_WEIGHT};
use macrolab_core::scenario::{BalanceInputs, SweepParams};
use macrolab_core::stats::ReturnKind;
use macrolab_core::trend::DEFAULT_LAMBDA;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for a snapshot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Indicator metadata for display (ids not listed here still score —
    /// they just render without labels/units).
    pub indicators: Vec<Indicator>,

    /// Engine models, scored in this order.
    pub engines: Vec<EngineModel>,

    /// Leading-composite model feeding the nowcast.
    pub leading: EngineModel,

    /// Regime centroid table. Must match the engine vector dimension
    /// (growth, inflation, liquidity, external → 4).
    pub regimes: RegimeTable,

    pub turning_weights: TurningPointWeights,

    /// Weight on the growth/inflation disagreement penalty.
    pub fragility_weight: f64,

    pub balance: BalanceInputs,
    pub sweep: SweepParams,

    /// Trailing stats window in calendar years.
    pub lookback_years: i32,

    /// HP smoothing parameter for the output gap.
    pub hp_lambda: f64,

    pub return_kind: ReturnKind,

    /// Drop observations before this period (all series).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_period: Option<PeriodKey>,

    /// Indicator whose trailing stats anchor the nowcast and the GDP-delta
    /// turning feature.
    pub growth_indicator: String,

    /// Indicator whose delta feeds the unemployment turning feature.
    pub unemployment_indicator: String,

    /// Level series (e.g. real GDP, constant prices) for the output gap.
    /// `None` disables the gap block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level_indicator: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            indicators: default_macro_indicators(),
            engines: default_macro_models(),
            leading: default_leading_model(),
            regimes: RegimeTable::default_macro(),
            turning_weights: TurningPointWeights::default(),
            fragility_weight: FRAGILITY_WEIGHT,
            balance: BalanceInputs::default(),
            sweep: SweepParams::default(),
            lookback_years: 10,
            hp_lambda: DEFAULT_LAMBDA,
            return_kind: ReturnKind::Log,
            start_period: None,
            growth_indicator: "gdp_growth".into(),
            unemployment_indicator: "unemployment".into(),
            activity_level_indicator: Some("real_gdp".into()),
        }
    }
}

impl SnapshotConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // EngineLibrary validates each model and duplicate ids.
        EngineLibrary::new(self.engines.clone())?;
        self.leading.validate()?;
        if self.regimes.dimension() != 4 {
            return Err(ConfigError::Invalid(format!(
                "regime table dimension {} does not match the 4-engine state vector",
                self.regimes.dimension()
            )));
        }
        if self.lookback_years < 1 {
            return Err(ConfigError::Invalid(
                "lookback_years must be at least 1".into(),
            ));
        }
        if !(self.hp_lambda.is_finite() && self.hp_lambda >= 0.0) {
            return Err(ConfigError::Invalid(
                "hp_lambda must be a non-negative number".into(),
            ));
        }
        if !self.fragility_weight.is_finite() || self.fragility_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "fragility_weight must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    pub fn config_id(&self) -> String {
        let json = serde_json::to_string(self).expect("SnapshotConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// The standard macro indicator set (World Bank WDI codes in the comments
/// of the bundled config; ids here are engine-facing).
pub fn default_macro_indicators() -> Vec<Indicator> {
    vec![
        Indicator {
            id: "gdp_growth".into(),
            label: "GDP growth (annual %)".into(),
            unit: "%".into(),
            higher_is_good: true,
            decimals: 1,
        },
        Indicator {
            id: "inflation".into(),
            label: "Inflation, CPI (annual %)".into(),
            unit: "%".into(),
            higher_is_good: false,
            decimals: 1,
        },
        Indicator {
            id: "unemployment".into(),
            label: "Unemployment rate (% labour force)".into(),
            unit: "%".into(),
            higher_is_good: false,
            decimals: 1,
        },
        Indicator {
            id: "money".into(),
            label: "Broad money (M2) growth (annual %)".into(),
            unit: "%".into(),
            higher_is_good: true,
            decimals: 1,
        },
        Indicator {
            id: "current_account".into(),
            label: "Current account balance (% of GDP)".into(),
            unit: "% of GDP".into(),
            higher_is_good: true,
            decimals: 1,
        },
        Indicator {
            id: "real_gdp".into(),
            label: "Real GDP level (constant prices)".into(),
            unit: "".into(),
            higher_is_good: true,
            decimals: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SnapshotConfig::default().validate().is_ok());
    }

    #[test]
    fn config_id_deterministic_and_sensitive() {
        let a = SnapshotConfig::default();
        let b = SnapshotConfig::default();
        assert_eq!(a.config_id(), b.config_id());

        let mut c = SnapshotConfig::default();
        c.lookback_years = 15;
        assert_ne!(a.config_id(), c.config_id());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = SnapshotConfig::from_toml_str("lookback_years = 15\n").unwrap();
        assert_eq!(config.lookback_years, 15);
        assert_eq!(config.engines.len(), 4);
        assert_eq!(config.regimes.dimension(), 4);
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let config = SnapshotConfig::from_toml_str("").unwrap();
        assert_eq!(config, SnapshotConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = SnapshotConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back = SnapshotConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn bad_lookback_rejected() {
        let err = SnapshotConfig::from_toml_str("lookback_years = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_engine_model_rejected() {
        let text = r#"
[[engines]]
id = "growth"
label = "Growth"
terms = []
"#;
        let err = SnapshotConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Model(_)));
    }

    #[test]
    fn wrong_regime_dimension_rejected() {
        let text = r#"
[[regimes]]
id = "up"
label = "Up"
centroid = [1.0, 1.0]

[[regimes]]
id = "down"
label = "Down"
centroid = [-1.0, -1.0]
"#;
        let err = SnapshotConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
