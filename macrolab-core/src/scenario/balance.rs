//! Supply/demand balance engine.
//!
//! `baseBalance = demand − supply − inventory` (or a direct override), and
//! the implied price move is `balance / (|εd| + εs)`. Linear in the shock by
//! construction; elasticities floor at 0.01 so the denominator never
//! vanishes. Alongside the point estimate: a 1-D sweep around the base
//! balance and a 2-D demand×supply stress grid holding inventory fixed.

use serde::{Deserialize, Serialize};

/// Minimum magnitude either elasticity is allowed to take.
pub const ELASTICITY_FLOOR: f64 = 0.01;

/// Stress grid span (±) and resolution.
const GRID_SPAN: f64 = 3.0;
const GRID_STEPS: usize = 13;

/// Scenario assumptions, in percent (YoY growth, inventory swing) and
/// elasticity units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceInputs {
    pub demand_growth: f64,
    pub supply_growth: f64,
    pub inventory_swing: f64,
    /// Absolute demand elasticity |εd|.
    pub demand_elasticity_abs: f64,
    /// Supply elasticity εs.
    pub supply_elasticity: f64,
    /// Direct override of the net balance shock, bypassing the
    /// demand − supply − inventory arithmetic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_override: Option<f64>,
}

impl Default for BalanceInputs {
    fn default() -> Self {
        Self {
            demand_growth: 0.0,
            supply_growth: 0.0,
            inventory_swing: 0.0,
            demand_elasticity_abs: 0.2,
            supply_elasticity: 0.1,
            balance_override: None,
        }
    }
}

/// 1-D sweep shape around the base balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParams {
    /// Half-width of the sweep (floor 0.5).
    pub range: f64,
    /// Number of evenly spaced scenarios (floor 3).
    pub steps: usize,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            range: 2.0,
            steps: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub balance_shock: f64,
    pub implied_move: f64,
}

/// Demand-shock × supply-shock sensitivity surface.
/// `implied_moves[row][col]` corresponds to `supply_shocks[row]` and
/// `demand_shocks[col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressGrid {
    pub demand_shocks: Vec<f64>,
    pub supply_shocks: Vec<f64>,
    pub implied_moves: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Inputs as evaluated, elasticities post-floor.
    pub inputs: BalanceInputs,
    pub base_balance: f64,
    /// Implied move at the base balance.
    pub implied_move: f64,
    pub scenarios: Vec<ScenarioPoint>,
    pub stress_grid: StressGrid,
}

/// Evenly spaced values from `a` to `b` inclusive.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    assert!(n >= 2, "linspace needs at least 2 points");
    (0..n)
        .map(|i| a + (i as f64) * (b - a) / (n - 1) as f64)
        .collect()
}

/// Evaluate the balance model.
pub fn evaluate(inputs: &BalanceInputs, sweep: &SweepParams) -> BalanceReport {
    let demand_elasticity_abs = inputs.demand_elasticity_abs.max(ELASTICITY_FLOOR);
    let supply_elasticity = inputs.supply_elasticity.max(ELASTICITY_FLOOR);
    let denom = demand_elasticity_abs + supply_elasticity;

    let base_balance = inputs
        .balance_override
        .unwrap_or(inputs.demand_growth - inputs.supply_growth - inputs.inventory_swing);

    let range = sweep.range.max(0.5);
    let steps = sweep.steps.max(3);
    let scenarios = linspace(base_balance - range, base_balance + range, steps)
        .into_iter()
        .map(|balance_shock| ScenarioPoint {
            balance_shock,
            implied_move: balance_shock / denom,
        })
        .collect();

    let demand_shocks = linspace(-GRID_SPAN, GRID_SPAN, GRID_STEPS);
    let supply_shocks = linspace(-GRID_SPAN, GRID_SPAN, GRID_STEPS);
    let implied_moves = supply_shocks
        .iter()
        .map(|s| {
            demand_shocks
                .iter()
                .map(|d| (d - s - inputs.inventory_swing) / denom)
                .collect()
        })
        .collect();

    BalanceReport {
        inputs: BalanceInputs {
            demand_elasticity_abs,
            supply_elasticity,
            ..*inputs
        },
        base_balance,
        implied_move: base_balance / denom,
        scenarios,
        stress_grid: StressGrid {
            demand_shocks,
            supply_shocks,
            implied_moves,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn baseline_scenario_numbers() {
        let inputs = BalanceInputs {
            demand_growth: 2.0,
            supply_growth: 1.5,
            inventory_swing: 0.0,
            demand_elasticity_abs: 0.2,
            supply_elasticity: 0.1,
            balance_override: None,
        };
        let report = evaluate(&inputs, &SweepParams::default());
        assert_approx(report.base_balance, 0.5, DEFAULT_EPSILON);
        assert_approx(report.implied_move, 0.5 / 0.3, 1e-6);
    }

    #[test]
    fn implied_move_linear_in_shock() {
        let report = evaluate(&BalanceInputs::default(), &SweepParams::default());
        let denom = 0.3;
        for point in &report.scenarios {
            assert_approx(point.implied_move, point.balance_shock / denom, DEFAULT_EPSILON);
        }
        // Doubling the shock doubles the move.
        let double = 2.0 * report.scenarios[1].balance_shock;
        assert_approx(
            double / denom,
            2.0 * report.scenarios[1].implied_move,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn override_bypasses_arithmetic() {
        let inputs = BalanceInputs {
            demand_growth: 5.0,
            supply_growth: 1.0,
            balance_override: Some(-0.7),
            ..Default::default()
        };
        let report = evaluate(&inputs, &SweepParams::default());
        assert_approx(report.base_balance, -0.7, DEFAULT_EPSILON);
    }

    #[test]
    fn elasticities_floored() {
        let inputs = BalanceInputs {
            demand_growth: 1.0,
            demand_elasticity_abs: 0.0,
            supply_elasticity: -5.0,
            ..Default::default()
        };
        let report = evaluate(&inputs, &SweepParams::default());
        assert_approx(report.inputs.demand_elasticity_abs, 0.01, DEFAULT_EPSILON);
        assert_approx(report.inputs.supply_elasticity, 0.01, DEFAULT_EPSILON);
        assert!(report.implied_move.is_finite());
        assert_approx(report.implied_move, 1.0 / 0.02, 1e-6);
    }

    #[test]
    fn sweep_centered_on_base() {
        let inputs = BalanceInputs {
            demand_growth: 1.0,
            ..Default::default()
        };
        let sweep = SweepParams {
            range: 2.0,
            steps: 9,
        };
        let report = evaluate(&inputs, &sweep);
        assert_eq!(report.scenarios.len(), 9);
        assert_approx(report.scenarios[0].balance_shock, -1.0, DEFAULT_EPSILON);
        assert_approx(report.scenarios[4].balance_shock, 1.0, DEFAULT_EPSILON);
        assert_approx(report.scenarios[8].balance_shock, 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sweep_floors_applied() {
        let sweep = SweepParams {
            range: 0.1,
            steps: 1,
        };
        let report = evaluate(&BalanceInputs::default(), &sweep);
        assert_eq!(report.scenarios.len(), 3);
        let spread =
            report.scenarios.last().unwrap().balance_shock - report.scenarios[0].balance_shock;
        assert_approx(spread, 1.0, DEFAULT_EPSILON); // 2 × floored range 0.5
    }

    #[test]
    fn stress_grid_shape_and_values() {
        let inputs = BalanceInputs {
            inventory_swing: 0.5,
            ..Default::default()
        };
        let report = evaluate(&inputs, &SweepParams::default());
        let grid = &report.stress_grid;
        assert_eq!(grid.demand_shocks.len(), 13);
        assert_eq!(grid.supply_shocks.len(), 13);
        assert_eq!(grid.implied_moves.len(), 13);
        assert!(grid.implied_moves.iter().all(|row| row.len() == 13));
        assert_approx(grid.demand_shocks[0], -3.0, DEFAULT_EPSILON);
        assert_approx(grid.demand_shocks[12], 3.0, DEFAULT_EPSILON);
        // Corner check: demand +3, supply −3, inventory 0.5 → (3+3−0.5)/0.3.
        assert_approx(grid.implied_moves[0][12], 5.5 / 0.3, 1e-6);
    }
}
