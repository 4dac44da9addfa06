//! Criterion benchmarks for MacroLab hot paths.
//!
//! Benchmarks:
//! 1. HP filter solve across series lengths (the O(n³) dense solve is the
//!    one expensive kernel in the engine)
//! 2. Rolling-window z over a long stream
//! 3. Composite scoring of a full engine library
//! 4. Regime classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use macrolab_core::domain::PeriodKey;
use macrolab_core::engine::{composite, default_macro_models, IndicatorScore, ScoreVector};
use macrolab_core::regime::{classify, RegimeTable, FRAGILITY_WEIGHT};
use macrolab_core::stats::RollingWindow;
use macrolab_core::trend::hp_filter;

fn make_levels(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 0.4 * i as f64 + 3.0 * (i as f64 * 0.7).sin())
        .collect()
}

fn bench_hp_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("hp_filter");
    for n in [30, 60, 120, 240] {
        let y = make_levels(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &y, |b, y| {
            b.iter(|| hp_filter(black_box(y), black_box(100.0)));
        });
    }
    group.finish();
}

fn bench_rolling_window(c: &mut Criterion) {
    let levels = make_levels(5000);
    c.bench_function("rolling_window_60_over_5000", |b| {
        b.iter(|| {
            let mut rw = RollingWindow::new(60);
            let mut last = None;
            for &v in &levels {
                last = rw.push(black_box(v));
            }
            last
        });
    });
}

fn bench_composite(c: &mut Criterion) {
    let models = default_macro_models();
    let mut sv = ScoreVector::new();
    for (i, id) in ["gdp_growth", "inflation", "unemployment", "money", "current_account"]
        .iter()
        .enumerate()
    {
        sv.insert(
            *id,
            IndicatorScore {
                z: (i as f64 - 2.0) * 0.6,
                raw: i as f64,
                period: PeriodKey::Year(2024),
            },
        );
    }
    c.bench_function("composite_four_engines", |b| {
        b.iter(|| {
            models
                .iter()
                .map(|m| composite(black_box(m), black_box(&sv)).z)
                .sum::<f64>()
        });
    });
}

fn bench_regime(c: &mut Criterion) {
    let table = RegimeTable::default_macro();
    c.bench_function("regime_classify", |b| {
        b.iter(|| {
            classify(
                black_box(&[0.4, -0.8, 0.3, -0.2]),
                black_box(&table),
                FRAGILITY_WEIGHT,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_hp_filter,
    bench_rolling_window,
    bench_composite,
    bench_regime
);
criterion_main!(benches);
