//! Markdown report generator.
//!
//! Renders scored snapshots into the analyst-facing briefing: engine table
//! with risk bands, regime probabilities, turning-point note, nowcast,
//! output gap, top drivers, and the balance scenario table. Pure text out —
//! everything beyond markdown is the consumer's job.

use macrolab_core::engine::CompositeScore;
use macrolab_core::regime::RegimeReport;

use crate::config::SnapshotConfig;
use crate::snapshot::EntitySnapshot;

/// Risk band from an engine z. The 0.5/1.0 cutoffs are the house
/// convention for "worth a second look" and "worth a call".
pub fn risk_level(z: f64) -> &'static str {
    if !z.is_finite() {
        return "n/a";
    }
    let abs = z.abs();
    if abs < 0.5 {
        "low"
    } else if abs < 1.0 {
        "medium"
    } else {
        "high"
    }
}

/// One-line read of an engine's z.
fn engine_read(z: f64) -> String {
    if !z.is_finite() {
        return "Insufficient data for this engine.".to_string();
    }
    let abs = z.abs();
    let side = if z > 0.0 { "above" } else { "below" };
    if abs < 0.5 {
        "Near its own history, likely low signal for repricing unless the slope changes."
            .to_string()
    } else if abs < 1.0 {
        format!("Moderately {side} history, watch whether this persists into next prints.")
    } else {
        format!(
            "Meaningfully {side} history, this is where markets tend to reprice narratives and risk premia."
        )
    }
}

/// Commentary for the turning-point block.
fn turn_note(p: f64, growth_z: f64, liquidity_z: f64, external_z: f64) -> &'static str {
    if p >= 0.65 {
        "Turning risk is elevated. If this persists, risk premia tends to move before the macro narrative catches up."
    } else if p >= 0.45 {
        "Turning risk is medium. The next step is whether liquidity/external tension worsens or stabilises."
    } else if growth_z > 0.5 && liquidity_z > 0.5 && external_z > -0.2 {
        "Turning risk is low. Cycle looks supported unless a shock hits liquidity or the external channel."
    } else {
        "Turning risk is low-to-mixed. Watch slope changes rather than level prints."
    }
}

fn pct(p: f64) -> String {
    format!("{}%", (p.clamp(0.0, 1.0) * 100.0).round() as i64)
}

/// Render the full report for a set of snapshots.
pub fn render_report(snapshots: &[EntitySnapshot], config: &SnapshotConfig) -> String {
    let mut out = String::new();
    out.push_str("# MacroLab Snapshot Report\n\n");
    out.push_str(&format!("Config: `{}`\n", config.config_id()));
    out.push_str(&format!("Entities: {}\n", snapshots.len()));

    for snap in snapshots {
        render_entity(&mut out, snap, config);
    }

    out.push_str(
        "\n## Notes\n\
- Engine scores map composite z onto a bounded 10\u{2013}90 scale centred on 50.\n\
- The stationarity screen and turning-point scorecard are screening heuristics, not fitted models.\n",
    );
    out
}

fn render_entity(out: &mut String, snap: &EntitySnapshot, config: &SnapshotConfig) {
    out.push_str(&format!("\n## {} (`{}`)\n\n", snap.label, snap.entity));
    out.push_str(&format!(
        "Data confidence: {} \u{00b7} regime confidence: {}\n",
        pct(snap.confidence),
        pct(snap.regime.confidence)
    ));

    // Engines.
    out.push_str("\n### Engines\n\n");
    out.push_str("| Engine | z | Score | Risk | Read |\n");
    out.push_str("|--------|----:|------:|------|------|\n");
    for engine in &snap.engines {
        out.push_str(&format!(
            "| {} | {:+.2} | {} | {} | {} |\n",
            engine.engine_id,
            engine.z,
            engine.display_score,
            risk_level(engine.z),
            engine_read(engine.z)
        ));
    }

    if let Some(drivers) = top_drivers(&snap.engines) {
        out.push_str("\n### Top drivers\n\n");
        out.push_str("| Indicator | Engine | Weight | z (adj) | Contribution |\n");
        out.push_str("|-----------|--------|-------:|--------:|-------------:|\n");
        out.push_str(&drivers);
    }

    render_regime(out, &snap.regime);

    // Turning point.
    let (g, l, e) = (
        engine_z(snap, "growth"),
        engine_z(snap, "liquidity"),
        engine_z(snap, "external"),
    );
    out.push_str(&format!(
        "\n### Turning point\n\nProbability: **{}** \u{2014} {}\n",
        pct(snap.turning_point),
        turn_note(snap.turning_point, g, l, e)
    ));

    // Nowcast vs trend.
    out.push_str("\n### Nowcast\n\n");
    match &snap.nowcast {
        Some(nc) => {
            out.push_str(&format!(
                "Nowcast {:.2}% (composite z {:+.2}, history mean {:.2}%)",
                nc.value, nc.composite, nc.mean
            ));
            match snap.output_gap.as_ref().and_then(|g| g.latest_trend_growth()) {
                Some(tg) => out.push_str(&format!(
                    " \u{00b7} trend growth {:.2}% \u{00b7} gap {:+.2}pp\n",
                    tg,
                    nc.value - tg
                )),
                None => out.push('\n'),
            }
        }
        None => out.push_str("n/a (growth indicator unavailable)\n"),
    }

    if let Some(gap) = &snap.output_gap {
        if let Some(latest) = gap.latest_gap() {
            out.push_str(&format!("\nOutput gap (latest): {latest:+.2}% of trend\n"));
        }
    }

    // Analogues from the configured growth indicator.
    if let Some(stats) = snap.indicators.get(&config.growth_indicator) {
        if !stats.analogues.is_empty() {
            let years: Vec<String> =
                stats.analogues.iter().map(|p| p.to_string()).collect();
            out.push_str(&format!("\nClosest analogue periods: {}\n", years.join(", ")));
        }
    }

    // Balance scenarios.
    out.push_str("\n### Balance scenarios\n\n");
    out.push_str(&format!(
        "Base balance {:+.2} \u{2192} implied move {:+.2}%\n\n",
        snap.balance.base_balance, snap.balance.implied_move
    ));
    out.push_str("| Balance shock | Implied move |\n");
    out.push_str("|--------------:|-------------:|\n");
    for point in &snap.balance.scenarios {
        out.push_str(&format!(
            "| {:+.2} | {:+.2}% |\n",
            point.balance_shock, point.implied_move
        ));
    }
}

fn render_regime(out: &mut String, regime: &RegimeReport) {
    out.push_str("\n### Regime probabilities\n\n");
    out.push_str("| Regime | Probability |\n");
    out.push_str("|--------|------------:|\n");
    for r in &regime.probabilities {
        out.push_str(&format!("| {} | {} |\n", r.label, pct(r.p)));
    }
}

/// Top five contributions across all engines, by |contribution|.
fn top_drivers(engines: &[CompositeScore]) -> Option<String> {
    let mut rows: Vec<(String, &str, f64, f64, f64)> = Vec::new();
    for engine in engines {
        for c in &engine.contributions {
            rows.push((
                c.indicator.clone(),
                engine.engine_id.as_str(),
                c.weight,
                c.z_adjusted,
                c.contribution,
            ));
        }
    }
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| {
        b.4.abs()
            .partial_cmp(&a.4.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut out = String::new();
    for (indicator, engine, weight, z, contribution) in rows.into_iter().take(5) {
        out.push_str(&format!(
            "| {indicator} | {engine} | {weight:.2} | {z:+.2} | {contribution:+.2} |\n"
        ));
    }
    Some(out)
}

fn engine_z(snap: &EntitySnapshot, id: &str) -> f64 {
    snap.engine(id).map_or(0.0, |e| e.z)
}
