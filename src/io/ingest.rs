//! CSV ingest of the historical footfall file.
//!
//! The file is the hub's open-data export: semicolon separated, one row per
//! day, with at least a `date`, a day-type code and a `Total` column.
//!
//! - A **missing file** is not an error: the dashboard runs on synthetic data.
//! - A **malformed row** (bad date or total) aborts the run with its line number.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{DayTypeCode, Observation};

const DATE_COLUMN: &str = "date";
const DAY_TYPE_COLUMNS: [&str; 3] = ["type_jour", "day_type", "day_type_code"];
const TOTAL_COLUMN: &str = "total";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open input '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read CSV headers: {0}")]
    Headers(#[source] csv::Error),

    #[error("Missing required column: `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: CSV parse error: {source}")]
    Record {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: invalid total '{value}'")]
    InvalidTotal { line: usize, value: String },
}

/// Rows loaded from an input file.
#[derive(Debug, Clone)]
pub struct History {
    pub path: PathBuf,
    pub observations: Vec<Observation>,
}

/// Load the history at `path`; `Ok(None)` when the file does not exist.
pub fn load_history(path: &Path) -> Result<Option<History>, IngestError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no history file, using synthetic data only");
            return Ok(None);
        }
        Err(source) => {
            return Err(IngestError::Open {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let observations = read_history(file)?;
    info!(path = %path.display(), rows = observations.len(), "loaded history");

    Ok(Some(History {
        path: path.to_path_buf(),
        observations,
    }))
}

/// Parse semicolon-separated history rows from any reader.
pub fn read_history<R: Read>(reader: R) -> Result<Vec<Observation>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(IngestError::Headers)?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|source| IngestError::Record { line, source })?;
        out.push(columns.parse(&record, line)?);
    }

    debug!(rows = out.len(), "parsed history rows");
    Ok(out)
}

/// Column positions of the required fields.
struct Columns {
    date: usize,
    day_type: usize,
    total: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header_name(name), idx))
            .collect();

        let date = *map
            .get(DATE_COLUMN)
            .ok_or(IngestError::MissingColumn(DATE_COLUMN))?;
        let day_type = DAY_TYPE_COLUMNS
            .iter()
            .find_map(|name| map.get(*name).copied())
            .ok_or(IngestError::MissingColumn("Type_Jour"))?;
        let total = *map
            .get(TOTAL_COLUMN)
            .ok_or(IngestError::MissingColumn("Total"))?;

        Ok(Self { date, day_type, total })
    }

    fn parse(&self, record: &StringRecord, line: usize) -> Result<Observation, IngestError> {
        let raw_date = record.get(self.date).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| IngestError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let raw_total = record.get(self.total).unwrap_or("");
        let total = parse_total(raw_total).ok_or_else(|| IngestError::InvalidTotal {
            line,
            value: raw_total.to_string(),
        })?;

        Ok(Observation {
            date,
            day_type: DayTypeCode::parse(record.get(self.day_type).unwrap_or("")),
            total,
        })
    }
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

/// Parse a calendar date; datetimes are accepted and truncated to the day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a daily total. Decimals are rounded, negatives clamp to zero.
pub fn parse_total(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v.max(0) as u64);
    }
    let v = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(v.round().max(0.0) as u64)
}
