//! Sample statistics and normalization primitives.
//!
//! Everything here is a pure function or an explicit state machine
//! (`RollingWindow`). Data-quality problems — short samples, degenerate
//! spreads, gaps — degrade to "not available" or neutral values; they never
//! error. See the baseline module for the minimum-sample policies.

pub mod baseline;
pub mod lead;
pub mod rolling;
pub mod seasonality;
pub mod stationarity;
pub mod summary;
pub mod trailing;

pub use baseline::{robust_score, zscore, BaselineStats};
pub use lead::{lead_weight, lead_weighted_mean, LeadWeights};
pub use rolling::{moving_average, returns, rolling_z, ReturnKind, RollingPoint, RollingWindow};
pub use seasonality::{monthly_seasonality, MonthlySeasonality};
pub use stationarity::{adf_screen, StationarityScreen};
pub use summary::{correlation, quantile, SummaryStats};
pub use trailing::{trailing_stats, TrailingStats};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for stats tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
