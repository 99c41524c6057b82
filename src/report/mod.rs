//! Reporting utilities: year filtering and per-label aggregates.
//!
//! One `label_stats` pass feeds the TUI mean bars and share table as well as
//! the plain-text/JSON `summary` output.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DayLabel, DayRecord, YearSelection};

pub mod format;

pub use format::format_summary;

/// Aggregates for one day label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStats {
    pub label: DayLabel,
    pub days: usize,
    pub sum: u64,
    pub mean: f64,
    /// Fraction of the overall total carried by this label (`0..=1`).
    pub share: f64,
}

/// Distinct years present in `records`, most recent first.
pub fn available_years(records: &[DayRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Resolve a selection against the years actually present.
///
/// An empty result means "no filter".
pub fn resolve_years(available: &[i32], selection: &YearSelection) -> Vec<i32> {
    match selection {
        YearSelection::Latest(n) => available.iter().take(*n).copied().collect(),
        YearSelection::Explicit(years) => available
            .iter()
            .copied()
            .filter(|y| years.contains(y))
            .collect(),
        YearSelection::All => Vec::new(),
    }
}

/// Rows whose year is in `selected`; an empty selection keeps everything.
pub fn filter_years(records: &[DayRecord], selected: &[i32]) -> Vec<DayRecord> {
    if selected.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selected.contains(&r.year))
        .cloned()
        .collect()
}

/// Per-label day count, sum, mean and share, in display order.
///
/// Labels without any row are omitted.
pub fn label_stats(records: &[DayRecord]) -> Vec<LabelStats> {
    let mut acc: BTreeMap<DayLabel, (usize, u64)> = BTreeMap::new();
    for r in records {
        let entry = acc.entry(r.label).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += r.total;
    }

    let grand_total: u64 = acc.values().map(|(_, sum)| *sum).sum();

    acc.into_iter()
        .map(|(label, (days, sum))| LabelStats {
            label,
            days,
            sum,
            mean: sum as f64 / days as f64,
            share: if grand_total == 0 {
                0.0
            } else {
                sum as f64 / grand_total as f64
            },
        })
        .collect()
}

/// Everything the `summary` command prints.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub history_rows: usize,
    pub generated_rows: usize,
    pub seed: Option<u64>,
    pub years_available: Vec<i32>,
    /// Empty when the full series is shown.
    pub years_selected: Vec<i32>,
    pub filtered_rows: usize,
    pub labels: Vec<LabelStats>,
}
