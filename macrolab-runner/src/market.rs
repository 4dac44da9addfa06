//! Market view over one series or a pair.
//!
//! The single-series / spread / ratio view: derive the level path, optionally
//! smooth it, then attach a rolling z, step returns, calendar-month
//! seasonality, and the stationarity screen. This is the commodity-desk
//! counterpart of the per-country snapshot — one definition, fully scored.
//!
//! Unlike data-quality shortfalls inside the engine, a view that cannot be
//! built at all (no data, no pair for a pair mode, not enough history for
//! the requested z-window) is a caller-visible error: there is nothing
//! sensible to degrade to.

use macrolab_core::domain::{PeriodKey, Series};
use macrolab_core::stats::{
    adf_screen, monthly_seasonality, returns, rolling_z, MonthlySeasonality, ReturnKind,
    StationarityScreen,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested z-windows below this are raised to it.
pub const MIN_Z_WINDOW: usize = 12;

/// Points required beyond the z-window before a view is worth building.
pub const HISTORY_MARGIN: usize = 10;

/// How the level path is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Single,
    Spread,
    Ratio,
}

/// View parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketViewConfig {
    pub mode: ViewMode,
    /// Rolling z-window in observations (floor [`MIN_Z_WINDOW`]).
    pub z_window: usize,
    pub return_kind: ReturnKind,
    /// Trailing moving-average window; `None` leaves the path unsmoothed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<usize>,
}

impl Default for MarketViewConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::Single,
            z_window: 60,
            return_kind: ReturnKind::Log,
            smoothing: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("series '{0}' has no usable observations")]
    EmptySeries(String),

    #[error("view mode needs a second series")]
    MissingPair,

    #[error("'{definition}' has {len} points, needs {required} for a {window}-point z-window")]
    ShortHistory {
        definition: String,
        len: usize,
        window: usize,
        required: usize,
    },
}

/// One scored point of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPoint {
    pub period: PeriodKey,
    pub level: f64,
    /// Rolling z once the window is primed.
    pub z: Option<f64>,
    /// Step return; `None` at the first point.
    pub ret: Option<f64>,
}

/// Fully scored market view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketView {
    /// Human-readable definition, e.g. "Brent − WTI · spread".
    pub definition: String,
    pub mode: ViewMode,
    /// Effective z-window after the floor.
    pub z_window: usize,
    pub points: Vec<MarketPoint>,
    pub seasonality: MonthlySeasonality,
    pub screen: StationarityScreen,
    pub latest_level: f64,
    pub latest_z: f64,
}

/// Build the view. `b` is required for the pair modes and ignored for
/// `Single`.
pub fn build_market_view(
    a: (&str, &Series),
    b: Option<(&str, &Series)>,
    config: &MarketViewConfig,
) -> Result<MarketView, MarketError> {
    let (a_id, a_series) = a;

    let (definition, mut levels) = match config.mode {
        ViewMode::Single => {
            let levels: Vec<(PeriodKey, f64)> = a_series
                .iter()
                .filter_map(|o| o.finite_value().map(|v| (o.period, v)))
                .collect();
            (format!("{a_id} · level"), levels)
        }
        ViewMode::Spread | ViewMode::Ratio => {
            let (b_id, b_series) = b.ok_or(MarketError::MissingPair)?;
            let aligned = Series::align(a_series, b_series);
            match config.mode {
                ViewMode::Spread => (
                    format!("{a_id} − {b_id} · spread"),
                    aligned
                        .into_iter()
                        .map(|(p, va, vb)| (p, va - vb))
                        .collect(),
                ),
                _ => (
                    format!("{a_id} / {b_id} · ratio"),
                    aligned
                        .into_iter()
                        .filter(|&(_, _, vb)| vb != 0.0)
                        .map(|(p, va, vb)| (p, va / vb))
                        .collect(),
                ),
            }
        }
    };
    if levels.is_empty() {
        return Err(MarketError::EmptySeries(a_id.to_string()));
    }

    if let Some(window) = config.smoothing.filter(|&w| w >= 2) {
        levels = smooth(&levels, window);
    }

    let z_window = config.z_window.max(MIN_Z_WINDOW);
    let required = z_window + HISTORY_MARGIN;
    if levels.len() < required {
        return Err(MarketError::ShortHistory {
            definition,
            len: levels.len(),
            window: z_window,
            required,
        });
    }

    let values: Vec<f64> = levels.iter().map(|&(_, v)| v).collect();
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    let z = rolling_z(&wrapped, z_window);
    let step_returns = returns(&wrapped, config.return_kind);

    let points: Vec<MarketPoint> = levels
        .iter()
        .zip(z.iter().zip(&step_returns))
        .map(|(&(period, level), (&z, &ret))| MarketPoint {
            period,
            level,
            z,
            ret,
        })
        .collect();

    let seasonality =
        monthly_seasonality(points.iter().filter_map(|p| p.ret.map(|r| (p.period.month(), r))));
    let screen = adf_screen(&values);

    let latest_level = *values.last().expect("length checked above");
    let latest_z = points
        .iter()
        .rev()
        .find_map(|p| p.z)
        .expect("window primes before the last point");

    Ok(MarketView {
        definition,
        mode: config.mode,
        z_window,
        points,
        seasonality,
        screen,
        latest_level,
        latest_z,
    })
}

/// Trailing moving average over (period, value) pairs, keeping the period of
/// each window's last element. Output starts once the window is primed.
fn smooth(levels: &[(PeriodKey, f64)], window: usize) -> Vec<(PeriodKey, f64)> {
    let values: Vec<f64> = levels.iter().map(|&(_, v)| v).collect();
    let averaged = macrolab_core::stats::moving_average(&values, window);
    levels[window - 1..]
        .iter()
        .zip(averaged)
        .map(|(&(period, _), avg)| (period, avg))
        .collect()
}
