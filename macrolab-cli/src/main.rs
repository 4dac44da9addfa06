//! MacroLab CLI — snapshot, market, balance, and decompose commands.
//!
//! Commands:
//! - `snapshot` — score every entity CSV in a directory and write the
//!   artifact bundle (per-entity JSON, config, markdown report)
//! - `market` — build a single/spread/ratio market view from one CSV
//! - `balance` — evaluate supply/demand balance scenarios
//! - `decompose` — HP trend/cycle decomposition of a level series

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use macrolab_core::scenario::{evaluate, BalanceInputs, SweepParams};
use macrolab_core::stats::ReturnKind;
use macrolab_core::trend::output_gap;
use macrolab_runner::data_loader::load_csv;
use macrolab_runner::market::{build_market_view, MarketViewConfig, ViewMode};
use macrolab_runner::{
    load_entity_dir, run_snapshots, save_artifacts, EntitySnapshot, LoadOptions, SnapshotConfig,
};

#[derive(Parser)]
#[command(name = "macrolab", about = "MacroLab CLI — macro/commodity scoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every entity CSV in a directory and write artifacts.
    Snapshot {
        /// Directory of per-entity CSV files (long or wide layout).
        data_dir: PathBuf,

        /// TOML configuration file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the artifact bundle.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Drop series with fewer present observations than this.
        #[arg(long, default_value_t = 1)]
        min_points: usize,
    },
    /// Build a market view (level, spread, or ratio) from one CSV.
    Market {
        /// CSV file holding the series.
        file: PathBuf,

        /// Series id for leg A (column name or long-format indicator).
        #[arg(long)]
        series_a: String,

        /// Series id for leg B (required for spread/ratio).
        #[arg(long)]
        series_b: Option<String>,

        /// View mode: single, spread, ratio.
        #[arg(long, default_value = "single")]
        mode: String,

        /// Rolling z-window in observations.
        #[arg(long, default_value_t = 60)]
        z_window: usize,

        /// Return convention: log, simple.
        #[arg(long, default_value = "log")]
        returns: String,

        /// Trailing moving-average window (3, 6, 12...). Off by default.
        #[arg(long)]
        smooth: Option<usize>,
    },
    /// Evaluate supply/demand balance scenarios.
    Balance {
        /// Demand growth, % YoY.
        #[arg(long, default_value_t = 2.0)]
        demand: f64,

        /// Supply growth, % YoY.
        #[arg(long, default_value_t = 1.5)]
        supply: f64,

        /// Inventory swing, % of demand.
        #[arg(long, default_value_t = 0.0)]
        inventory: f64,

        /// Absolute demand elasticity |εd|.
        #[arg(long, default_value_t = 0.2)]
        demand_elasticity: f64,

        /// Supply elasticity εs.
        #[arg(long, default_value_t = 0.1)]
        supply_elasticity: f64,

        /// Direct balance-shock override, bypassing the arithmetic.
        #[arg(long = "override")]
        balance_override: Option<f64>,

        /// Sweep half-width around the base balance.
        #[arg(long, default_value_t = 2.0)]
        range: f64,

        /// Sweep steps.
        #[arg(long, default_value_t = 9)]
        steps: usize,

        /// Emit the full report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// HP trend/cycle decomposition of a level series (log scale).
    Decompose {
        /// CSV file holding the series.
        file: PathBuf,

        /// Series id (column name or long-format indicator).
        #[arg(long)]
        indicator: String,

        /// HP smoothing parameter.
        #[arg(long, default_value_t = 100.0)]
        lambda: f64,

        /// Emit the decomposition as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot {
            data_dir,
            config,
            output_dir,
            min_points,
        } => run_snapshot_cmd(&data_dir, config.as_deref(), &output_dir, min_points),
        Commands::Market {
            file,
            series_a,
            series_b,
            mode,
            z_window,
            returns,
            smooth,
        } => run_market_cmd(&file, &series_a, series_b.as_deref(), &mode, z_window, &returns, smooth),
        Commands::Balance {
            demand,
            supply,
            inventory,
            demand_elasticity,
            supply_elasticity,
            balance_override,
            range,
            steps,
            json,
        } => run_balance_cmd(
            demand,
            supply,
            inventory,
            demand_elasticity,
            supply_elasticity,
            balance_override,
            range,
            steps,
            json,
        ),
        Commands::Decompose {
            file,
            indicator,
            lambda,
            json,
        } => run_decompose_cmd(&file, &indicator, lambda, json),
    }
}

fn run_snapshot_cmd(
    data_dir: &Path,
    config_path: Option<&Path>,
    output_dir: &Path,
    min_points: usize,
) -> Result<()> {
    let config = match config_path {
        Some(path) => SnapshotConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SnapshotConfig::default(),
    };

    let entities = load_entity_dir(data_dir, &LoadOptions { min_points })?;
    println!(
        "Loaded {} entit{} from {}",
        entities.len(),
        if entities.len() == 1 { "y" } else { "ies" },
        data_dir.display()
    );

    let mut snapshots = Vec::with_capacity(entities.len());
    for result in run_snapshots(&entities, &config) {
        snapshots.push(result?);
    }

    for snap in &snapshots {
        print_snapshot_summary(snap);
    }

    let run_dir = save_artifacts(&snapshots, &config, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn print_snapshot_summary(snap: &EntitySnapshot) {
    println!();
    println!("=== {} ({}) ===", snap.label, snap.entity);
    for engine in &snap.engines {
        println!(
            "{:<12} z {:+.2}  score {:>2}",
            engine.engine_id, engine.z, engine.display_score
        );
    }
    let top = snap.regime.top();
    println!(
        "Regime:      {} ({:.0}%)  confidence {:.0}%",
        top.label,
        top.p * 100.0,
        snap.regime.confidence * 100.0
    );
    println!("Turning:     {:.0}%", snap.turning_point * 100.0);
    if let Some(nc) = &snap.nowcast {
        println!("Nowcast:     {:.2}% (composite z {:+.2})", nc.value, nc.composite);
    }
    if let Some(gap) = snap.output_gap.as_ref().and_then(|g| g.latest_gap()) {
        println!("Output gap:  {gap:+.2}%");
    }
    println!("Confidence:  {:.0}%", snap.confidence * 100.0);
}

fn run_market_cmd(
    file: &Path,
    series_a: &str,
    series_b: Option<&str>,
    mode: &str,
    z_window: usize,
    returns: &str,
    smooth: Option<usize>,
) -> Result<()> {
    let mode = match mode {
        "single" => ViewMode::Single,
        "spread" => ViewMode::Spread,
        "ratio" => ViewMode::Ratio,
        other => bail!("unknown mode '{other}'. Valid: single, spread, ratio"),
    };
    let return_kind = match returns {
        "log" => ReturnKind::Log,
        "simple" => ReturnKind::Simple,
        other => bail!("unknown return kind '{other}'. Valid: log, simple"),
    };

    let series = load_csv(file, &LoadOptions::default())?;
    let pick = |id: &str| {
        series
            .get(id)
            .with_context(|| format!("series '{id}' not found in {}", file.display()))
    };
    let a = pick(series_a)?;
    let b = match series_b {
        Some(id) => Some((id, pick(id)?)),
        None => None,
    };

    let config = MarketViewConfig {
        mode,
        z_window,
        return_kind,
        smoothing: smooth,
    };
    let view = build_market_view((series_a, a), b, &config)?;

    println!("=== {} ===", view.definition);
    println!("Points:      {}", view.points.len());
    println!("Latest:      {:.3}", view.latest_level);
    println!("Latest z:    {:+.2} (window {})", view.latest_z, view.z_window);
    match (view.screen.t_stat, view.screen.stationary) {
        (Some(t), Some(stationary)) => println!(
            "ADF screen:  t = {:.2} → {} (rough 5% cutoff, screening heuristic)",
            t,
            if stationary { "stationary" } else { "non-stationary" }
        ),
        _ => println!(
            "ADF screen:  n/a ({})",
            view.screen.reason.as_deref().unwrap_or("not run")
        ),
    }

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    println!();
    println!("Seasonality (avg step return by month):");
    for (i, name) in MONTHS.iter().enumerate() {
        match view.seasonality.avg[i] {
            Some(avg) => println!("  {name}  {avg:+.4}  (n={})", view.seasonality.n[i]),
            None => println!("  {name}  n/a"),
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_balance_cmd(
    demand: f64,
    supply: f64,
    inventory: f64,
    demand_elasticity: f64,
    supply_elasticity: f64,
    balance_override: Option<f64>,
    range: f64,
    steps: usize,
    json: bool,
) -> Result<()> {
    let inputs = BalanceInputs {
        demand_growth: demand,
        supply_growth: supply,
        inventory_swing: inventory,
        demand_elasticity_abs: demand_elasticity,
        supply_elasticity,
        balance_override,
    };
    let report = evaluate(&inputs, &SweepParams { range, steps });

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Balance scenarios ===");
    println!(
        "Base balance:  {:+.2} (demand {:+.2} − supply {:+.2} − inventory {:+.2}{})",
        report.base_balance,
        demand,
        supply,
        inventory,
        if balance_override.is_some() {
            ", overridden"
        } else {
            ""
        }
    );
    println!(
        "Elasticities:  |εd| {:.2} + εs {:.2}",
        report.inputs.demand_elasticity_abs, report.inputs.supply_elasticity
    );
    println!("Implied move:  {:+.2}%", report.implied_move);
    println!();
    println!("{:>14} {:>14}", "balance shock", "implied move");
    for point in &report.scenarios {
        println!("{:>14.2} {:>13.2}%", point.balance_shock, point.implied_move);
    }
    Ok(())
}

fn run_decompose_cmd(file: &Path, indicator: &str, lambda: f64, json: bool) -> Result<()> {
    let series = load_csv(file, &LoadOptions::default())?;
    let series = series
        .get(indicator)
        .with_context(|| format!("series '{indicator}' not found in {}", file.display()))?;

    let Some(gap) = output_gap(series, lambda) else {
        bail!("series '{indicator}' needs at least 10 positive observations for a decomposition");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&gap)?);
        return Ok(());
    }

    println!("=== Trend/cycle decomposition (λ = {lambda}) ===");
    println!("{:>10} {:>12} {:>12} {:>10}", "period", "log level", "trend", "gap %");
    for i in 0..gap.periods.len() {
        println!(
            "{:>10} {:>12.4} {:>12.4} {:>9.2}%",
            gap.periods[i].to_string(),
            gap.log_level[i],
            gap.trend[i],
            gap.gap_pct[i]
        );
    }
    if let Some(tg) = gap.latest_trend_growth() {
        println!();
        println!("Latest trend growth: {tg:.2}% per period");
    }
    Ok(())
}
