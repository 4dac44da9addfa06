//! MacroLab Core — series normalization, composite scoring, and regime
//! classification.
//!
//! The heart of the engine:
//! - Domain types (period keys, observations, series, indicator metadata)
//! - Sample statistics, baselines, and z/robust scoring
//! - Lead-weighted aggregation and rolling-window state
//! - Engine models and weighted composite scores
//! - HP trend/cycle decomposition and output gap
//! - Regime probabilities and turning-point risk
//! - Balance-shock scenario engine
//!
//! Everything is a deterministic function of its inputs; the only stateful
//! component is the explicitly-constructed `RollingWindow`. Gaps and short
//! samples degrade to "not available" or neutral values, while malformed
//! configuration (models, regime tables) errors at construction time.

pub mod domain;
pub mod engine;
pub mod regime;
pub mod scenario;
pub mod stats;
pub mod trend;
