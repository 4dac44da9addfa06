//! CSV series ingestion.
//!
//! Two layouts are accepted, detected from the header:
//!
//! - **long**: `indicator,period,value` — one row per observation, the
//!   shape API dumps arrive in.
//! - **wide**: `period,<id>,<id>,...` (first column may also be named
//!   `date`) — one row per period, one column per indicator, the shape
//!   spreadsheet exports arrive in.
//!
//! Blank cells are null observations. Periods parse as `YYYY`, `YYYYMM`,
//! `YYYY-MM`, or `YYYY-MM-DD`. Sparse columns can be dropped via
//! `LoadOptions::min_points` (uploaded workbooks conventionally use 24).

use macrolab_core::domain::{Observation, PeriodParseError, Series, SeriesError};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::snapshot::EntityInput;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read data: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Period(#[from] PeriodParseError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("file has no header row")]
    MissingHeader,

    #[error("wide layout needs a leading 'period' or 'date' column, found '{0}'")]
    MissingPeriodColumn(String),

    #[error("row {row}: cannot parse value '{value}' in column '{column}'")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("no usable series in {0}")]
    Empty(String),
}

/// Ingestion policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop series with fewer than this many present observations.
    pub min_points: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { min_points: 1 }
    }
}

fn parse_cell(row: usize, column: &str, cell: &str) -> Result<Option<f64>, DataError> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "n/a" || cell == "NA" || cell == "null" {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(|v| if v.is_finite() { Some(v) } else { None })
        .map_err(|_| DataError::BadValue {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// Load a long-format CSV (`indicator,period,value`).
pub fn load_long_csv(path: &Path, opts: &LoadOptions) -> Result<BTreeMap<String, Series>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut buckets: BTreeMap<String, Vec<Observation>> = BTreeMap::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 2; // 1-based, after the header
        let indicator = record.get(0).unwrap_or("").trim().to_string();
        let period = record.get(1).unwrap_or("").trim().parse()?;
        let value = parse_cell(row, &indicator, record.get(2).unwrap_or(""))?;
        buckets
            .entry(indicator)
            .or_default()
            .push(Observation::new(period, value));
    }

    collect_series(buckets, opts, path)
}

/// Load a wide-format CSV (`period` or `date` first, one column per
/// indicator).
pub fn load_wide_csv(path: &Path, opts: &LoadOptions) -> Result<BTreeMap<String, Series>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|_| DataError::MissingHeader)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let Some(first) = headers.first() else {
        return Err(DataError::MissingHeader);
    };
    if !first.eq_ignore_ascii_case("period") && !first.eq_ignore_ascii_case("date") {
        return Err(DataError::MissingPeriodColumn(first.clone()));
    }

    let mut buckets: BTreeMap<String, Vec<Observation>> = BTreeMap::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 2;
        let period = record.get(0).unwrap_or("").trim().parse()?;
        for (col, header) in headers.iter().enumerate().skip(1) {
            if header.is_empty() {
                continue;
            }
            let value = parse_cell(row, header, record.get(col).unwrap_or(""))?;
            buckets
                .entry(header.clone())
                .or_default()
                .push(Observation::new(period, value));
        }
    }

    collect_series(buckets, opts, path)
}

/// Load one CSV, detecting the layout from the header.
pub fn load_csv(path: &Path, opts: &LoadOptions) -> Result<BTreeMap<String, Series>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let first = reader
        .headers()
        .map_err(|_| DataError::MissingHeader)?
        .get(0)
        .unwrap_or("")
        .trim()
        .to_string();
    drop(reader);

    if first.eq_ignore_ascii_case("indicator") {
        load_long_csv(path, opts)
    } else {
        load_wide_csv(path, opts)
    }
}

/// Load every `*.csv` in a directory as one entity each (entity id = file
/// stem). Files are sorted by name for deterministic ordering.
pub fn load_entity_dir(dir: &Path, opts: &LoadOptions) -> Result<Vec<EntityInput>, DataError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut entities = Vec::with_capacity(paths.len());
    for path in paths {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "entity".to_string());
        let series = load_csv(&path, opts)?;
        entities.push(EntityInput {
            id: id.clone(),
            label: id,
            series,
        });
    }
    if entities.is_empty() {
        return Err(DataError::Empty(dir.display().to_string()));
    }
    Ok(entities)
}

fn collect_series(
    buckets: BTreeMap<String, Vec<Observation>>,
    opts: &LoadOptions,
    path: &Path,
) -> Result<BTreeMap<String, Series>, DataError> {
    let mut out = BTreeMap::new();
    for (indicator, points) in buckets {
        let series = Series::from_points(points)?;
        if series.finite_values().len() >= opts.min_points.max(1) {
            out.insert(indicator, series);
        }
    }
    if out.is_empty() {
        return Err(DataError::Empty(path.display().to_string()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn long_format_loads_and_buckets() {
        let f = write_temp(
            "indicator,period,value\n\
             gdp_growth,2019,2.2\n\
             gdp_growth,2020,-3.4\n\
             inflation,2019,1.8\n\
             inflation,2020,\n",
        );
        let series = load_csv(f.path(), &LoadOptions::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["gdp_growth"].len(), 2);
        assert_eq!(series["inflation"].points()[1].value, None);
    }

    #[test]
    fn wide_format_loads_columns() {
        let f = write_temp(
            "period,gdp_growth,inflation\n\
             2019,2.2,1.8\n\
             2020,-3.4,\n\
             2021,5.9,4.7\n",
        );
        let series = load_csv(f.path(), &LoadOptions::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["gdp_growth"].finite_values(), vec![2.2, -3.4, 5.9]);
        assert_eq!(series["inflation"].finite_values(), vec![1.8, 4.7]);
    }

    #[test]
    fn wide_format_accepts_date_header_and_monthly_periods() {
        let f = write_temp(
            "date,brent\n\
             2020-01,63.7\n\
             2020-02,55.5\n",
        );
        let series = load_csv(f.path(), &LoadOptions::default()).unwrap();
        assert_eq!(series["brent"].len(), 2);
    }

    #[test]
    fn min_points_drops_sparse_series() {
        let f = write_temp(
            "period,dense,sparse\n\
             2019,1.0,\n\
             2020,2.0,\n\
             2021,3.0,9.9\n",
        );
        let series = load_csv(f.path(), &LoadOptions { min_points: 2 }).unwrap();
        assert!(series.contains_key("dense"));
        assert!(!series.contains_key("sparse"));
    }

    #[test]
    fn bad_value_reports_row_and_column() {
        let f = write_temp("period,x\n2019,notanumber\n");
        let err = load_csv(f.path(), &LoadOptions::default()).unwrap_err();
        match err {
            DataError::BadValue { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "x");
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn bad_period_column_rejected() {
        let f = write_temp("banana,x\n2019,1.0\n");
        let err = load_csv(f.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingPeriodColumn(_)));
    }

    #[test]
    fn duplicate_period_rejected() {
        let f = write_temp("period,x\n2019,1.0\n2019,2.0\n");
        let err = load_csv(f.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::Series(_)));
    }

    #[test]
    fn entity_dir_loads_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("br.csv"), "period,gdp_growth\n2020,1.0\n").unwrap();
        std::fs::write(dir.path().join("ar.csv"), "period,gdp_growth\n2020,2.0\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let entities = load_entity_dir(dir.path(), &LoadOptions::default()).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, "ar");
        assert_eq!(entities[1].id, "br");
    }
}
