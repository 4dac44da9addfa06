//! Engine models and composite scoring.
//!
//! An "engine" is a named weighted combination of indicator z-scores —
//! the Growth engine, the Inflation engine, a per-commodity impact model.
//! Model tables are immutable configuration supplied by the caller; the
//! scoring functions are pure.

pub mod ensemble;
pub mod model;
pub mod nowcast;
pub mod score;

pub use ensemble::{impact_distribution, member_impact, ImpactDistribution};
pub use model::{default_macro_models, EngineLibrary, EngineModel, EngineTerm, ModelError};
pub use nowcast::{composite_history, default_leading_model, leading_composite, nowcast, Nowcast};
pub use score::{
    composite, display_score, merge_mean, CompositeScore, Contribution, IndicatorScore,
    ScoreVector,
};
