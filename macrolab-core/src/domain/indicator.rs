//! Indicator metadata, decoupled from observation data.
//!
//! A series knows nothing about what it measures; the `Indicator` record
//! carries the presentation and interpretation facts (unit, direction,
//! display precision). Replaces the ad hoc per-source property bags of the
//! dashboard era with one fixed shape.

use serde::{Deserialize, Serialize};

/// Metadata for one tracked indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Stable identifier, e.g. `gdp_growth` or a provider code.
    pub id: String,
    /// Human-readable label, e.g. "GDP growth (annual %)".
    pub label: String,
    /// Display unit, e.g. "%", "% of GDP", "$/bbl".
    pub unit: String,
    /// Whether a higher reading is good news in this indicator's own terms.
    /// Engine models apply their own sign flips on top of this.
    pub higher_is_good: bool,
    /// Decimal places for display.
    pub decimals: u8,
}

impl Indicator {
    /// Format a value with this indicator's precision and unit.
    /// Missing values render as "n/a".
    pub fn format_value(&self, value: Option<f64>) -> String {
        match value.filter(|v| v.is_finite()) {
            None => "n/a".to_string(),
            Some(v) => {
                let num = format!("{:.*}", self.decimals as usize, v);
                if self.unit == "%" || self.unit == "% of GDP" {
                    format!("{num}%")
                } else {
                    num
                }
            }
        }
    }
}
