//! Observation — the fundamental series data unit.
//!
//! Sources report at mixed granularity: annual prints (World Bank WDI),
//! monthly prints (GEM commodity series), and daily dates. `PeriodKey` is one
//! totally-ordered key across all three so that a `Series` never has to know
//! its own frequency. Consumers must tolerate gaps and must not assume fixed
//! spacing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Totally-ordered time key: a year, a year-month, or a calendar date.
///
/// Annual keys sort at year end, monthly keys at the first of the month.
/// Comparison goes through a canonical date so mixed-granularity series
/// interleave sensibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodKey {
    Year(i32),
    YearMonth { year: i32, month: u32 },
    Date(NaiveDate),
}

impl PeriodKey {
    /// Year-month key. Panics on an out-of-range month (caller bug).
    pub fn year_month(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be 1..=12");
        Self::YearMonth { year, month }
    }

    /// Canonical date used for ordering.
    pub fn as_date(&self) -> NaiveDate {
        match *self {
            Self::Year(y) => NaiveDate::from_ymd_opt(y, 12, 31).expect("valid year-end date"),
            Self::YearMonth { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).expect("month validated at construction")
            }
            Self::Date(d) => d,
        }
    }

    pub fn year(&self) -> i32 {
        match *self {
            Self::Year(y) => y,
            Self::YearMonth { year, .. } => year,
            Self::Date(d) => d.year(),
        }
    }

    /// Calendar month 1–12. Annual keys report December (year-end stamp).
    pub fn month(&self) -> u32 {
        match *self {
            Self::Year(_) => 12,
            Self::YearMonth { month, .. } => month,
            Self::Date(d) => d.month(),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Self::Year(_) => 0,
            Self::YearMonth { .. } => 1,
            Self::Date(_) => 2,
        }
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Tie-break on variant so Ord stays consistent with Eq when two
        // different granularities share a canonical date.
        (self.as_date(), self.variant_rank()).cmp(&(other.as_date(), other.variant_rank()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Year(y) => write!(f, "{y}"),
            Self::YearMonth { year, month } => write!(f, "{year}-{month:02}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized period '{0}' (expected YYYY, YYYYMM, YYYY-MM, or YYYY-MM-DD)")]
pub struct PeriodParseError(pub String);

impl std::str::FromStr for PeriodKey {
    type Err = PeriodParseError;

    /// Accepts the formats sources actually emit: `YYYY`, `YYYYMM`,
    /// `YYYY-MM`, `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || PeriodParseError(s.to_string());

        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            return s.parse::<i32>().map(Self::Year).map_err(|_| err());
        }
        if s.len() == 6 && s.chars().all(|c| c.is_ascii_digit()) {
            let year = s[..4].parse::<i32>().map_err(|_| err())?;
            let month = s[4..].parse::<u32>().map_err(|_| err())?;
            if !(1..=12).contains(&month) {
                return Err(err());
            }
            return Ok(Self::YearMonth { year, month });
        }
        if s.len() == 7 && s.as_bytes().get(4) == Some(&b'-') {
            let year = s[..4].parse::<i32>().map_err(|_| err())?;
            let month = s[5..].parse::<u32>().map_err(|_| err())?;
            if !(1..=12).contains(&month) {
                return Err(err());
            }
            return Ok(Self::YearMonth { year, month });
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| err())
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(p: PeriodKey) -> Self {
        p.to_string()
    }
}

/// One observed value for one period. `None` marks a gap the source reported
/// explicitly (consumers filter, never error).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: PeriodKey,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(period: PeriodKey, value: Option<f64>) -> Self {
        Self { period, value }
    }

    /// Value if present and finite. NaN from a source counts as a gap.
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("duplicate period {0} in series")]
    DuplicatePeriod(String),
}

/// Ordered sequence of observations, strictly increasing by period.
///
/// Construction sorts the input; duplicate periods are rejected rather than
/// silently merged. Gaps (missing periods, null values) are legal everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<Observation>,
}

impl Series {
    /// Build a series from unordered points. Sorts ascending and rejects
    /// duplicate periods.
    pub fn from_points(mut points: Vec<Observation>) -> Result<Self, SeriesError> {
        points.sort_by(|a, b| a.period.cmp(&b.period));
        for pair in points.windows(2) {
            if pair[0].period == pair[1].period {
                return Err(SeriesError::DuplicatePeriod(pair[0].period.to_string()));
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.points.iter()
    }

    /// All present, finite values in period order.
    pub fn finite_values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.finite_value()).collect()
    }

    /// Values with gaps preserved as `None`.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.finite_value()).collect()
    }

    /// Latest observation carrying a finite value.
    pub fn latest(&self) -> Option<&Observation> {
        self.points.iter().rev().find(|p| p.finite_value().is_some())
    }

    /// Observations at or after the cutoff period.
    pub fn window_from(&self, cutoff: PeriodKey) -> Vec<Observation> {
        self.points
            .iter()
            .filter(|p| p.period >= cutoff)
            .copied()
            .collect()
    }

    /// Inner-join two series on exact period match, keeping only rows where
    /// both sides have a finite value.
    pub fn align(a: &Series, b: &Series) -> Vec<(PeriodKey, f64, f64)> {
        let mut out = Vec::new();
        let mut j = 0;
        for pa in &a.points {
            while j < b.points.len() && b.points[j].period < pa.period {
                j += 1;
            }
            if j >= b.points.len() {
                break;
            }
            if b.points[j].period == pa.period {
                if let (Some(va), Some(vb)) = (pa.finite_value(), b.points[j].finite_value()) {
                    out.push((pa.period, va, vb));
                }
            }
        }
        out
    }

    /// Difference view `a - b` over aligned periods.
    pub fn spread(a: &Series, b: &Series) -> Series {
        let points = Self::align(a, b)
            .into_iter()
            .map(|(period, va, vb)| Observation::new(period, Some(va - vb)))
            .collect();
        Series { points }
    }

    /// Ratio view `a / b` over aligned periods. Zero denominators become gaps.
    pub fn ratio(a: &Series, b: &Series) -> Series {
        let points = Self::align(a, b)
            .into_iter()
            .map(|(period, va, vb)| {
                let value = if vb == 0.0 { None } else { Some(va / vb) };
                Observation::new(period, value)
            })
            .collect();
        Series { points }
    }
}
