//! Rolling-window statistics over a value stream.
//!
//! `RollingWindow` is the one stateful component in the engine: a
//! fixed-capacity FIFO with running sum and sum-of-squares, emitting
//! mean/variance/stdev/z once primed. The variance is the population form
//! floored at 1e-12, the convention every rolling consumer of this engine
//! shares. Subtract-on-evict keeps each push O(1); the running-sums form is
//! adequate for macro/financial value ranges.
//!
//! Returns are computed separately, once per step, from adjacent levels —
//! they do not depend on the window.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Variance floor applied before the square root.
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// One primed rolling output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub mean: f64,
    pub variance: f64,
    pub stdev: f64,
    /// Z of the just-pushed value against the current window.
    pub z: f64,
}

/// Incremental rolling mean/variance/z over the last `W` values.
///
/// Pushing fewer than `W` values yields `None` (warm-up); from the `W`-th
/// push onward every push evicts the oldest value and emits a point.
/// Values must be finite — gaps are the caller's concern (filter before
/// pushing, or batch via [`rolling_z`]).
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    queue: VecDeque<f64>,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "rolling window needs at least 2 values");
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity + 1),
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether the window has seen at least `capacity` values.
    pub fn is_primed(&self) -> bool {
        self.queue.len() == self.capacity
    }

    /// Push the next value; emits a point once the window is full.
    pub fn push(&mut self, value: f64) -> Option<RollingPoint> {
        debug_assert!(value.is_finite(), "rolling window takes finite values");

        self.queue.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;

        if self.queue.len() > self.capacity {
            let old = self.queue.pop_front().expect("queue non-empty");
            self.sum -= old;
            self.sum_sq -= old * old;
        }

        if !self.is_primed() {
            return None;
        }

        let w = self.capacity as f64;
        let mean = self.sum / w;
        let variance = (self.sum_sq / w - mean * mean).max(VARIANCE_FLOOR);
        let stdev = variance.sqrt();
        Some(RollingPoint {
            mean,
            variance,
            stdev,
            z: (value - mean) / stdev,
        })
    }
}

/// Batch rolling z over a gap-tolerant level array.
///
/// Output is aligned to the input: `None` during warm-up and at gaps. A gap
/// resets nothing — the window keeps its contents and the next finite value
/// continues the stream, matching how irregular series are scored.
pub fn rolling_z(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut rw = RollingWindow::new(window);
    values
        .iter()
        .map(|v| match v.filter(|x| x.is_finite()) {
            Some(x) => rw.push(x).map(|p| p.z),
            None => None,
        })
        .collect()
}

/// Trailing simple moving average, emitted only when primed.
///
/// `output[i]` corresponds to `input[i + window − 1]`; the result is
/// `n − window + 1` long (empty when the input is shorter than the window).
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "moving average window must be >= 1");
    if values.len() < window {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
    }
    out
}

/// Step return convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    Log,
    Simple,
}

/// Per-step returns from a level path. `None` at index 0, at gaps, and
/// wherever the ratio is undefined (non-positive levels for log returns,
/// zero base for simple returns).
pub fn returns(levels: &[Option<f64>], kind: ReturnKind) -> Vec<Option<f64>> {
    let mut out = vec![None; levels.len()];
    for i in 1..levels.len() {
        let (a, b) = match (
            levels[i - 1].filter(|x| x.is_finite()),
            levels[i].filter(|x| x.is_finite()),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        out[i] = match kind {
            ReturnKind::Log => (a > 0.0 && b > 0.0).then(|| (b / a).ln()),
            ReturnKind::Simple => (a != 0.0).then(|| b / a - 1.0),
        };
    }
    out
}
