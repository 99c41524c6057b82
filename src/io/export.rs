//! Export the enriched series to CSV.
//!
//! Same separator as the input file so the export can be reloaded as history.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::DayRecord;
use crate::error::AppError;

#[derive(Serialize)]
struct ExportRow<'a> {
    date: String,
    #[serde(rename = "Type_Jour")]
    day_type: &'a str,
    #[serde(rename = "Total")]
    total: u64,
    year: i32,
    month: &'a str,
    weekday: &'a str,
    label: &'a str,
}

/// Write `records` to `path` as semicolon-separated CSV.
pub fn write_series_csv(path: &Path, records: &[DayRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(file, records)?;
    info!(path = %path.display(), rows = records.len(), "exported series");
    Ok(())
}

/// Write `records` as semicolon-separated CSV to any writer.
pub fn write_series<W: Write>(writer: W, records: &[DayRecord]) -> Result<(), AppError> {
    let mut csv = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    for r in records {
        csv.serialize(ExportRow {
            date: r.date.format("%Y-%m-%d").to_string(),
            day_type: r.day_type.as_str(),
            total: r.total,
            year: r.year,
            month: r.month,
            weekday: r.weekday,
            label: r.label.as_str(),
        })
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    csv.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enrich;
    use crate::domain::{DayTypeCode, Observation};
    use chrono::NaiveDate;

    #[test]
    fn export_has_header_and_enriched_columns() {
        let records = enrich(vec![Observation {
            date: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(),
            day_type: DayTypeCode::Dijfp,
            total: 125_500,
        }]);

        let mut buf = Vec::new();
        write_series(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date;Type_Jour;Total;year;month;weekday;label")
        );
        assert_eq!(
            lines.next(),
            Some("2022-01-02;DIJFP;125500;2022;January;Sunday;Dimanche/Férié")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_reloads_as_history() {
        let records = enrich(vec![
            Observation {
                date: NaiveDate::from_ymd_opt(2023, 3, 4).unwrap(),
                day_type: DayTypeCode::Sa,
                total: 1,
            },
            Observation {
                date: NaiveDate::from_ymd_opt(2023, 3, 6).unwrap(),
                day_type: DayTypeCode::Other("GREVE".into()),
                total: 2,
            },
        ]);
        let mut buf = Vec::new();
        write_series(&mut buf, &records).unwrap();

        let reloaded = crate::io::ingest::read_history(buf.as_slice()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].day_type, DayTypeCode::Sa);
        assert_eq!(reloaded[1].day_type, DayTypeCode::Other("GREVE".into()));
        assert_eq!(reloaded[1].total, 2);
    }
}
