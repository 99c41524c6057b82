//! Shared domain types.
//!
//! These types are deliberately small and serializable so they can be:
//!
//! - produced by ingest and the synthetic generator
//! - enriched with calendar fields for charting
//! - exported to CSV/JSON

use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use serde::{Serialize, Serializer};

/// Categorical traffic pattern of a calendar day.
///
/// The codes come from the hub's open-data export. Anything that is not one of
/// the four known codes is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayTypeCode {
    /// Ordinary working day outside school holidays.
    Johv,
    /// Saturday.
    Sa,
    /// Sunday or public holiday.
    Dijfp,
    /// Working day during school holidays.
    Jovs,
    Other(String),
}

impl DayTypeCode {
    /// Parse a raw code. Matching is exact after trimming whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "JOHV" => DayTypeCode::Johv,
            "SA" => DayTypeCode::Sa,
            "DIJFP" => DayTypeCode::Dijfp,
            "JOVS" => DayTypeCode::Jovs,
            other => DayTypeCode::Other(other.to_string()),
        }
    }

    /// Code assigned to generated days: Saturday and Sunday get their own
    /// codes, every other weekday is an ordinary working day.
    pub fn for_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => DayTypeCode::Sa,
            Weekday::Sun => DayTypeCode::Dijfp,
            _ => DayTypeCode::Johv,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DayTypeCode::Johv => "JOHV",
            DayTypeCode::Sa => "SA",
            DayTypeCode::Dijfp => "DIJFP",
            DayTypeCode::Jovs => "JOVS",
            DayTypeCode::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> DayLabel {
        match self {
            DayTypeCode::Johv => DayLabel::Ouvre,
            DayTypeCode::Sa => DayLabel::Samedi,
            DayTypeCode::Dijfp => DayLabel::DimancheFerie,
            DayTypeCode::Jovs => DayLabel::Vacances,
            DayTypeCode::Other(_) => DayLabel::Autre,
        }
    }
}

impl std::fmt::Display for DayTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DayTypeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Human-readable (French) label for a day-type code.
///
/// Variant order is the display order used by the charts and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayLabel {
    Ouvre,
    Samedi,
    DimancheFerie,
    Vacances,
    Autre,
}

impl DayLabel {
    pub const ALL: [DayLabel; 5] = [
        DayLabel::Ouvre,
        DayLabel::Samedi,
        DayLabel::DimancheFerie,
        DayLabel::Vacances,
        DayLabel::Autre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayLabel::Ouvre => "Ouvré",
            DayLabel::Samedi => "Samedi",
            DayLabel::DimancheFerie => "Dimanche/Férié",
            DayLabel::Vacances => "Vacances",
            DayLabel::Autre => "Autre",
        }
    }
}

impl std::fmt::Display for DayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DayLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One day's aggregate footfall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub date: NaiveDate,
    pub day_type: DayTypeCode,
    pub total: u64,
}

/// An observation augmented with derived calendar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub day_type: DayTypeCode,
    pub total: u64,
    pub year: i32,
    /// English month name (`January`).
    pub month: &'static str,
    /// English weekday name (`Saturday`).
    pub weekday: &'static str,
    pub label: DayLabel,
}

/// Operational service level shown next to the live gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadLevel {
    /// Below 50%: free-flowing.
    Nominal,
    /// 50% to 80%: sustained load, slow-downs possible at the accesses.
    Densification,
    /// Above 80%: alert threshold, flow regulation measures apply.
    Saturation,
}

impl LoadLevel {
    pub fn from_pct(pct: u8) -> Self {
        match pct {
            0..50 => LoadLevel::Nominal,
            50..=80 => LoadLevel::Densification,
            _ => LoadLevel::Saturation,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LoadLevel::Nominal => "Régime Nominal",
            LoadLevel::Densification => "Densification",
            LoadLevel::Saturation => "Saturation Critique",
        }
    }
}

/// A simulated live occupancy reading for the station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveReading {
    pub hour: u32,
    pub load_factor: f64,
    /// Occupancy in percent, always within `0..=100`.
    pub load_pct: u8,
    pub pax_per_minute: u32,
    pub level: LoadLevel,
}

/// A fixed point of interest on the hub map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hotspot {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    /// Estimated passage volume; drives the marker size.
    pub flux: u32,
    pub kind: &'static str,
}

/// Which years the analysis views should keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSelection {
    /// The `n` most recent years present in the series.
    Latest(usize),
    /// Explicit list of years.
    Explicit(Vec<i32>),
    /// No filtering.
    All,
}

impl Default for YearSelection {
    fn default() -> Self {
        YearSelection::Latest(2)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags, `.env` and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Optional historical CSV; a missing file means "no history".
    pub input: PathBuf,
    /// Noise seed. `None` draws from OS entropy, so every build differs.
    pub seed: Option<u64>,
    pub years: YearSelection,
}
