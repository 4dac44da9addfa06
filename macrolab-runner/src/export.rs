//! Artifact export — JSON snapshots plus the markdown report.
//!
//! Each run writes one directory named after the config hash, so re-running
//! with identical parameters lands in the same place and two artifact sets
//! are comparable by name alone:
//!
//! - `config.json` — the full configuration that produced the run
//! - `<entity>.json` — one `EntitySnapshot` per entity
//! - `report.md` — the rendered briefing

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::SnapshotConfig;
use crate::report::render_report;
use crate::snapshot::EntitySnapshot;

/// Serialize one snapshot to pretty JSON.
pub fn export_json(snapshot: &EntitySnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("failed to serialize EntitySnapshot to JSON")
}

/// Deserialize a snapshot back from JSON.
pub fn import_json(json: &str) -> Result<EntitySnapshot> {
    serde_json::from_str(json).context("failed to deserialize EntitySnapshot from JSON")
}

/// Save the full artifact set for a run. Returns the run directory.
pub fn save_artifacts(
    snapshots: &[EntitySnapshot],
    config: &SnapshotConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    let config_id = config.config_id();
    let run_dir = output_dir.join(format!("run_{}", &config_id[..12]));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("cannot create {}", run_dir.display()))?;

    let config_json =
        serde_json::to_string_pretty(config).context("failed to serialize SnapshotConfig")?;
    std::fs::write(run_dir.join("config.json"), config_json)?;

    for snapshot in snapshots {
        let path = run_dir.join(format!("{}.json", snapshot.entity));
        std::fs::write(&path, export_json(snapshot)?)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }

    std::fs::write(run_dir.join("report.md"), render_report(snapshots, config))?;

    Ok(run_dir)
}
