//! Deterministic balance-shock scenarios.

pub mod balance;

pub use balance::{
    evaluate, linspace, BalanceInputs, BalanceReport, ScenarioPoint, StressGrid, SweepParams,
    ELASTICITY_FLOOR,
};
