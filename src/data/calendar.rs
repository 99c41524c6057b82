//! Calendar enrichment: derived year/month/weekday fields and day labels.

use chrono::{Datelike, Month, NaiveDate};

use crate::domain::{DayRecord, Observation};

// chrono has no `&'static str` full weekday name.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn month_name(date: NaiveDate) -> &'static str {
    u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

impl From<Observation> for DayRecord {
    fn from(obs: Observation) -> Self {
        let label = obs.day_type.label();
        DayRecord {
            year: obs.date.year(),
            month: month_name(obs.date),
            weekday: weekday_name(obs.date),
            label,
            date: obs.date,
            day_type: obs.day_type,
            total: obs.total,
        }
    }
}

/// Enrich every row and sort the result ascending by date (stable).
pub fn enrich(observations: Vec<Observation>) -> Vec<DayRecord> {
    let mut records: Vec<DayRecord> = observations.into_iter().map(DayRecord::from).collect();
    records.sort_by_key(|r| r.date);
    records
}
