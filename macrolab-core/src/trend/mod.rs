//! Trend/cycle decomposition.

pub mod hp;
pub mod output_gap;

pub use hp::{hp_filter, TrendCycle, DEFAULT_LAMBDA};
pub use output_gap::{output_gap, OutputGap, MIN_GAP_SAMPLE};
