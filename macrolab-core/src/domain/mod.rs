//! Domain types: periods, observations, series, indicator metadata.

pub mod indicator;
pub mod observation;

pub use indicator::Indicator;
pub use observation::{Observation, PeriodKey, PeriodParseError, Series, SeriesError};
