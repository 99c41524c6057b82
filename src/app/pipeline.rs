//! Shared data pipeline used by both the CLI and the TUI front-ends.
//!
//! history CSV (optional) -> synthetic continuation -> calendar enrichment
//! -> year filter -> per-label aggregates
//!
//! Building the series is cheap but not free, so front-ends that redraw often
//! keep a `SeriesMemo` and only rebuild when the input path or seed changes.

use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::data::{build_series, enrich, series_rng};
use crate::domain::{DayRecord, FlowConfig, YearSelection};
use crate::error::AppError;
use crate::io::ingest::load_history;
use crate::report::{self, LabelStats, Summary};

/// The enriched series plus provenance counters.
#[derive(Debug, Clone)]
pub struct SeriesOutput {
    /// Sorted ascending by date.
    pub records: Vec<DayRecord>,
    pub history_rows: usize,
    pub generated_rows: usize,
    /// Set when the history file was found.
    pub history_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// Load history, extend it through the horizon and enrich every row.
pub fn build_dataset(config: &FlowConfig) -> Result<SeriesOutput, AppError> {
    let history = load_history(&config.input)?;
    let history_path = history.as_ref().map(|h| h.path.clone());
    let observations = history.map(|h| h.observations).unwrap_or_default();

    let mut rng = series_rng(config.seed);
    let built = build_series(observations, &mut rng)?;

    Ok(SeriesOutput {
        records: enrich(built.observations),
        history_rows: built.history_rows,
        generated_rows: built.generated_rows,
        history_path,
        seed: config.seed,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    input: PathBuf,
    seed: Option<u64>,
}

impl MemoKey {
    fn of(config: &FlowConfig) -> Self {
        Self {
            input: config.input.clone(),
            seed: config.seed,
        }
    }
}

/// Caller-owned memo of the last built series.
///
/// Unseeded builds are memoised too: the series stays stable across redraws
/// until the caller invalidates it or changes the key.
#[derive(Debug, Default)]
pub struct SeriesMemo {
    entry: Option<(MemoKey, Rc<SeriesOutput>)>,
}

impl SeriesMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, config: &FlowConfig) -> Result<Rc<SeriesOutput>, AppError> {
        let key = MemoKey::of(config);
        if let Some((cached_key, series)) = &self.entry {
            if *cached_key == key {
                debug!("series memo hit");
                return Ok(Rc::clone(series));
            }
        }

        debug!(input = %key.input.display(), seed = ?key.seed, "series memo miss");
        let series = Rc::new(build_dataset(config)?);
        self.entry = Some((key, Rc::clone(&series)));
        Ok(series)
    }

    /// Forget the cached series so the next `get_or_build` rereads the input.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Year-filtered view of a series with its chart aggregates.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Years present in the series, most recent first.
    pub years: Vec<i32>,
    /// Empty when the whole series is shown.
    pub selected: Vec<i32>,
    pub filtered: Vec<DayRecord>,
    pub labels: Vec<LabelStats>,
}

pub fn dashboard_view(records: &[DayRecord], selected: &[i32]) -> DashboardView {
    let filtered = report::filter_years(records, selected);
    let labels = report::label_stats(&filtered);
    DashboardView {
        years: report::available_years(records),
        selected: selected.to_vec(),
        filtered,
        labels,
    }
}

/// Resolve `selection` against `series` and build the view.
pub fn view_for_selection(series: &SeriesOutput, selection: &YearSelection) -> DashboardView {
    let years = report::available_years(&series.records);
    let selected = report::resolve_years(&years, selection);
    if selected.is_empty() && *selection != YearSelection::All {
        tracing::warn!(?selection, "year selection matches no data, showing all years");
    }
    dashboard_view(&series.records, &selected)
}

pub fn summarize(series: &SeriesOutput, view: &DashboardView) -> Summary {
    Summary {
        rows: series.records.len(),
        first_date: series.records.first().map(|r| r.date),
        last_date: series.records.last().map(|r| r.date),
        history_rows: series.history_rows,
        generated_rows: series.generated_rows,
        seed: series.seed,
        years_available: view.years.clone(),
        years_selected: view.selected.clone(),
        filtered_rows: view.filtered.len(),
        labels: view.labels.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: Option<u64>) -> FlowConfig {
        FlowConfig {
            input: PathBuf::from("no/such/dir/history.csv"),
            seed,
            years: YearSelection::default(),
        }
    }

    #[test]
    fn dataset_without_history_is_fully_synthetic() {
        let series = build_dataset(&config(Some(1))).unwrap();
        assert_eq!(series.history_rows, 0);
        assert_eq!(series.generated_rows, 1461);
        assert!(series.history_path.is_none());
        assert_eq!(series.records.len(), 1461);
    }

    #[test]
    fn memo_reuses_until_key_changes() {
        let mut memo = SeriesMemo::new();

        let a = memo.get_or_build(&config(None)).unwrap();
        let b = memo.get_or_build(&config(None)).unwrap();
        assert!(Rc::ptr_eq(&a, &b));

        let c = memo.get_or_build(&config(Some(5))).unwrap();
        assert!(!Rc::ptr_eq(&a, &c));

        memo.invalidate();
        let d = memo.get_or_build(&config(Some(5))).unwrap();
        assert!(!Rc::ptr_eq(&c, &d));
        assert_eq!(c.records, d.records);
    }

    #[test]
    fn default_view_keeps_two_latest_years() {
        let series = build_dataset(&config(Some(2))).unwrap();
        let view = view_for_selection(&series, &YearSelection::default());
        assert_eq!(view.years, vec![2025, 2024, 2023, 2022]);
        assert_eq!(view.selected, vec![2025, 2024]);
        assert_eq!(view.filtered.len(), 365 + 366);

        let summary = summarize(&series, &view);
        assert_eq!(summary.rows, 1461);
        assert_eq!(summary.filtered_rows, 731);
        assert_eq!(summary.labels.len(), 3);
    }

    #[test]
    fn unmatched_selection_falls_back_to_all() {
        let series = build_dataset(&config(Some(2))).unwrap();
        let view = view_for_selection(&series, &YearSelection::Explicit(vec![1990]));
        assert!(view.selected.is_empty());
        assert_eq!(view.filtered.len(), series.records.len());
    }
}
