//! MacroLab Runner — snapshot orchestration over `macrolab-core`.
//!
//! This crate wires the pure engine into a usable pipeline:
//! - TOML run configuration with a content-addressed config id
//! - CSV series ingestion (long and wide layouts, per-entity files)
//! - Per-entity snapshot: trailing stats → score vector → engines →
//!   regime / turning point / nowcast / output gap / balance scenarios
//! - Market view for a single series or a pair (spread/ratio)
//! - JSON artifacts and a markdown report

pub mod config;
pub mod data_loader;
pub mod export;
pub mod market;
pub mod report;
pub mod snapshot;

pub use config::{ConfigError, SnapshotConfig};
pub use data_loader::{load_entity_dir, load_long_csv, load_wide_csv, DataError, LoadOptions};
pub use export::save_artifacts;
pub use market::{build_market_view, MarketError, MarketView, MarketViewConfig, ViewMode};
pub use report::render_report;
pub use snapshot::{run_snapshot, run_snapshots, EntityInput, EntitySnapshot, SnapshotError};
