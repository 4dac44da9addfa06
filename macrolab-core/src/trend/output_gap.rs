//! Output gap from a real activity level series.
//!
//! Gap on log levels: `gap_t = (log y_t − log trend_t) · 100`, approximately
//! percent of trend. Trend growth comes from the trend's log differences.

use crate::domain::{PeriodKey, Series};
use crate::trend::hp::{hp_filter, TrendCycle};
use serde::{Deserialize, Serialize};

/// Minimum usable observations for a gap estimate.
pub const MIN_GAP_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputGap {
    pub periods: Vec<PeriodKey>,
    pub log_level: Vec<f64>,
    pub trend: Vec<f64>,
    /// Cycle in percent of trend.
    pub gap_pct: Vec<f64>,
    /// Trend growth in percent per period; `None` at index 0.
    pub trend_growth: Vec<Option<f64>>,
}

impl OutputGap {
    /// Latest trend growth print, if any.
    pub fn latest_trend_growth(&self) -> Option<f64> {
        self.trend_growth.iter().rev().flatten().next().copied()
    }

    /// Latest gap print.
    pub fn latest_gap(&self) -> Option<f64> {
        self.gap_pct.last().copied()
    }
}

/// Estimate the output gap from a level series (e.g. real GDP, constant
/// prices). Non-positive and missing values are dropped; fewer than
/// [`MIN_GAP_SAMPLE`] usable observations yields `None`.
pub fn output_gap(series: &Series, lambda: f64) -> Option<OutputGap> {
    let mut periods = Vec::new();
    let mut log_level = Vec::new();
    for obs in series.iter() {
        if let Some(v) = obs.finite_value().filter(|&v| v > 0.0) {
            periods.push(obs.period);
            log_level.push(v.ln());
        }
    }
    if log_level.len() < MIN_GAP_SAMPLE {
        return None;
    }

    let TrendCycle { trend, cycle } = hp_filter(&log_level, lambda);
    let gap_pct = cycle.iter().map(|c| c * 100.0).collect();
    let trend_growth = std::iter::once(None)
        .chain(trend.windows(2).map(|w| Some((w[1] - w[0]) * 100.0)))
        .collect();

    Some(OutputGap {
        periods,
        log_level,
        trend,
        gap_pct,
        trend_growth,
    })
}
