//! End-to-end: history CSV on disk -> series -> export -> reload.

use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;

use transit_flow::app::pipeline::{SeriesMemo, build_dataset, summarize, view_for_selection};
use transit_flow::domain::{DayTypeCode, FlowConfig, YearSelection};
use transit_flow::error::EXIT_INPUT;
use transit_flow::io::export::write_series_csv;
use transit_flow::io::ingest::load_history;

const HISTORY: &str = "\u{feff}Date;Type_Jour;Total\n\
2025-12-29;JOHV;401234\n\
30/12/2025;JOHV;399876.6\n\
2025-12-28T00:00:00;DIJFP;98000\n";

fn config(input: std::path::PathBuf, seed: u64) -> FlowConfig {
    FlowConfig {
        input,
        seed: Some(seed),
        years: YearSelection::All,
    }
}

#[test]
fn history_is_extended_and_exported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("history.csv");
    fs::write(&input, HISTORY).unwrap();

    let series = build_dataset(&config(input.clone(), 3)).unwrap();
    assert_eq!(series.history_rows, 3);
    assert_eq!(series.generated_rows, 1);
    assert_eq!(series.history_path.as_deref(), Some(input.as_path()));

    let dates: Vec<NaiveDate> = series.records.iter().map(|r| r.date).collect();
    assert_eq!(dates.first(), NaiveDate::from_ymd_opt(2025, 12, 28).as_ref());
    assert_eq!(dates.last(), NaiveDate::from_ymd_opt(2025, 12, 31).as_ref());
    assert_eq!(series.records[2].total, 399_877);
    assert_eq!(series.records[3].day_type, DayTypeCode::Johv);

    let out = dir.path().join("export.csv");
    write_series_csv(&out, &series.records).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("date;Type_Jour;Total;year;month;weekday;label\n"));

    let reloaded = load_history(&out).unwrap().unwrap();
    assert_eq!(reloaded.observations.len(), 4);
    assert_eq!(reloaded.observations[0].total, 98_000);
}

#[test]
fn missing_history_means_projection_only() {
    let dir = tempdir().unwrap();
    let series = build_dataset(&config(dir.path().join("absent.csv"), 1)).unwrap();
    assert!(series.history_path.is_none());
    assert_eq!(series.records.len(), 1461);

    let view = view_for_selection(&series, &YearSelection::Latest(2));
    assert_eq!(view.selected, vec![2025, 2024]);
    let summary = summarize(&series, &view);
    assert_eq!(summary.filtered_rows, 365 + 366);
    assert_eq!(summary.generated_rows, 1461);
}

#[test]
fn malformed_date_is_an_input_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "Date;Type_Jour;Total\nyesterday;JOHV;10\n").unwrap();

    let err = build_dataset(&config(input, 1)).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.message().contains("line 2"), "{}", err.message());
}

#[test]
fn memo_rebuilds_only_on_key_change() {
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path().join("absent.csv"), 5);
    let mut memo = SeriesMemo::new();

    let a = memo.get_or_build(&cfg).unwrap();
    let b = memo.get_or_build(&cfg).unwrap();
    assert!(std::rc::Rc::ptr_eq(&a, &b));

    cfg.seed = Some(6);
    let c = memo.get_or_build(&cfg).unwrap();
    assert!(!std::rc::Rc::ptr_eq(&a, &c));
    assert_ne!(a.records, c.records);

    memo.invalidate();
    let d = memo.get_or_build(&cfg).unwrap();
    assert!(!std::rc::Rc::ptr_eq(&c, &d));
    assert_eq!(c.records, d.records);
}
