//! Regime classification and turning-point risk.

pub mod classifier;
pub mod turning;

pub use classifier::{
    classify, Regime, RegimeError, RegimeProbability, RegimeReport, RegimeTable, FRAGILITY_WEIGHT,
};
pub use turning::{turning_point_probability, TurningPointInputs, TurningPointWeights};
