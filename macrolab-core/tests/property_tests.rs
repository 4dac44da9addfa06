//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Degenerate-baseline neutrality — z is exactly 0 under a collapsed spread
//! 2. Display score bounds — 10..=90 for any composite z
//! 3. Lead-weight monotonicity — strictly decreasing, 1.0 at lag zero
//! 4. Regime probabilities form a distribution and confidence stays in [0, 1]
//! 5. Scenario linearity — implied move scales with the balance shock
//! 6. Rolling-window priming — nothing before W values, always after
//! 7. HP filter reproduces any line exactly (cycle ≈ 0)

use proptest::prelude::*;

use macrolab_core::engine::{composite, display_score, EngineModel, EngineTerm, ScoreVector};
use macrolab_core::engine::IndicatorScore;
use macrolab_core::domain::PeriodKey;
use macrolab_core::regime::{classify, RegimeTable, FRAGILITY_WEIGHT};
use macrolab_core::scenario::{evaluate, BalanceInputs, SweepParams};
use macrolab_core::stats::{lead_weight, quantile, zscore, RollingWindow};
use macrolab_core::trend::hp_filter;

fn arb_z() -> impl Strategy<Value = f64> {
    -10.0..10.0_f64
}

proptest! {
    /// A spread at or below the 1e-9 floor normalizes to exactly zero for
    /// any value and mean.
    #[test]
    fn zscore_neutral_on_degenerate_sigma(
        x in -1e6..1e6_f64,
        mu in -1e6..1e6_f64,
        sigma in -1e-9..1e-9_f64,
    ) {
        prop_assert_eq!(zscore(x, mu, sigma), 0.0);
    }

    /// Display scores never leave the 10–90 band, whatever the composite z.
    #[test]
    fn display_score_bounded(z in -1e4..1e4_f64) {
        let s = display_score(z);
        prop_assert!((10..=90).contains(&s));
    }

    /// Lead weights are 1 at lag zero and strictly decreasing after.
    /// τ is kept ≥ 1 so the exponent stays representable over the tested
    /// lag range (exp(−t/τ) underflows to 0 past t/τ ≈ 709).
    #[test]
    fn lead_weights_decay(tau in 1.0..500.0_f64, t in 0usize..500) {
        prop_assert_eq!(lead_weight(0, tau), 1.0);
        let w0 = lead_weight(t, tau);
        let w1 = lead_weight(t + 1, tau);
        prop_assert!(w1 < w0);
        prop_assert!(w1 > 0.0);
    }

    /// Regime probabilities sum to one and confidence stays a probability,
    /// for any state vector.
    #[test]
    fn regime_probabilities_form_distribution(
        g in arb_z(), i in arb_z(), l in arb_z(), e in arb_z(),
    ) {
        let table = RegimeTable::default_macro();
        let report = classify(&[g, i, l, e], &table, FRAGILITY_WEIGHT).unwrap();
        let total: f64 = report.probabilities.iter().map(|r| r.p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(report.probabilities.iter().all(|r| (0.0..=1.0).contains(&r.p)));
        prop_assert!((0.0..=1.0).contains(&report.confidence));
    }

    /// The implied move is linear in the balance shock at fixed elasticities.
    #[test]
    fn scenario_linear_in_shock(
        shock in -50.0..50.0_f64,
        ed in 0.0..5.0_f64,
        es in 0.0..5.0_f64,
    ) {
        let base = BalanceInputs {
            balance_override: Some(shock),
            demand_elasticity_abs: ed,
            supply_elasticity: es,
            ..Default::default()
        };
        let doubled = BalanceInputs {
            balance_override: Some(2.0 * shock),
            ..base
        };
        let r1 = evaluate(&base, &SweepParams::default());
        let r2 = evaluate(&doubled, &SweepParams::default());
        prop_assert!((r2.implied_move - 2.0 * r1.implied_move).abs() < 1e-9);
    }

    /// A W-window emits nothing for the first W−1 pushes and a point for
    /// every push after.
    #[test]
    fn rolling_window_priming(w in 2usize..40, extra in 0usize..40) {
        let mut rw = RollingWindow::new(w);
        for i in 0..(w - 1) {
            prop_assert!(rw.push(i as f64).is_none());
        }
        prop_assert!(rw.push(0.5).is_some());
        for i in 0..extra {
            prop_assert!(rw.push(i as f64 * 0.25).is_some());
        }
    }

    /// The HP trend of any line is the line itself.
    #[test]
    fn hp_filter_reproduces_lines(
        intercept in -100.0..100.0_f64,
        slope in -5.0..5.0_f64,
        n in 6usize..80,
        lambda in 1.0..2000.0_f64,
    ) {
        let y: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();
        let tc = hp_filter(&y, lambda);
        for c in &tc.cycle {
            prop_assert!(c.abs() < 1e-5, "cycle {c} should vanish on a line");
        }
    }

    /// Quantiles stay inside the sample range for any p in [0, 1].
    #[test]
    fn quantile_within_range(
        mut values in prop::collection::vec(-1e3..1e3_f64, 1..60),
        p in 0.0..=1.0_f64,
    ) {
        let q = quantile(&values, p).unwrap();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert!(q >= values[0] - 1e-12);
        prop_assert!(q <= values[values.len() - 1] + 1e-12);
    }

    /// Composite scoring is a pure function: scoring twice gives identical
    /// results, and the composite equals the sum of its contributions.
    #[test]
    fn composite_pure_and_additive(z1 in arb_z(), z2 in arb_z(), z3 in arb_z()) {
        let model = EngineModel::new(
            "growth",
            "Growth",
            vec![
                EngineTerm::new("a", 1.0),
                EngineTerm::flipped("b", 0.4),
                EngineTerm::new("c", -0.25),
            ],
        );
        let mut sv = ScoreVector::new();
        for (id, z) in [("a", z1), ("b", z2), ("c", z3)] {
            sv.insert(id, IndicatorScore { z, raw: z, period: PeriodKey::Year(2020) });
        }
        let first = composite(&model, &sv);
        let second = composite(&model, &sv);
        prop_assert_eq!(&first, &second);
        let sum: f64 = first.contributions.iter().map(|c| c.contribution).sum();
        prop_assert!((first.z - sum).abs() < 1e-12);
    }
}
