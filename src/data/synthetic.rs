//! Synthetic continuation of the daily footfall series.
//!
//! Starting the day after the last historical observation, every day up to the
//! horizon gets a volume from a weekday/weekend base, a linear yearly growth
//! trend and Gaussian noise.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

use crate::domain::{DayTypeCode, Observation};
use crate::error::AppError;

/// Last day of the projection horizon.
pub const HORIZON_END: NaiveDate = ymd(2025, 12, 31);

/// Treated as the last historical day when no history is available.
pub const FALLBACK_LAST_DATE: NaiveDate = ymd(2021, 12, 31);

/// Daily volume on a Monday-Friday.
pub const WEEKDAY_BASE: f64 = 380_000.0;
/// Daily volume on a Saturday or Sunday.
pub const WEEKEND_BASE: f64 = 120_000.0;

/// Year at which the growth factor is exactly 1.
pub const GROWTH_BASE_YEAR: i32 = 2021;
/// Growth added per year after `GROWTH_BASE_YEAR`.
pub const GROWTH_PER_YEAR: f64 = 0.05;

/// Standard deviation of the per-day noise.
pub const NOISE_STD_DEV: f64 = 40_000.0;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar constant"),
    }
}

/// Lazy, finite, inclusive sequence of consecutive days.
///
/// Once exhausted it stays exhausted; build a new range to iterate again.
#[derive(Debug)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    /// Days from `start` to `end` inclusive (empty when `start > end`).
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    pub fn empty() -> Self {
        Self {
            next: None,
            end: NaiveDate::MIN,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|d| (self.end - d).num_days() as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}
impl FusedIterator for DateRange {}

/// Output of a series build.
#[derive(Debug, Clone)]
pub struct BuiltSeries {
    /// History followed by the continuation, sorted ascending by date.
    pub observations: Vec<Observation>,
    pub history_rows: usize,
    pub generated_rows: usize,
    /// First generated day, if any day was generated.
    pub continuation_start: Option<NaiveDate>,
}

/// First day to generate: the day after the latest historical date, or the day
/// after `FALLBACK_LAST_DATE` without history.
pub fn continuation_start(history: &[Observation]) -> Option<NaiveDate> {
    history
        .iter()
        .map(|o| o.date)
        .max()
        .unwrap_or(FALLBACK_LAST_DATE)
        .succ_opt()
}

/// Days to generate after `history`, through `HORIZON_END`.
pub fn continuation_range(history: &[Observation]) -> DateRange {
    match continuation_start(history) {
        Some(start) => DateRange::inclusive(start, HORIZON_END),
        None => DateRange::empty(),
    }
}

pub fn base_volume(date: NaiveDate) -> f64 {
    if date.weekday().num_days_from_monday() >= 5 {
        WEEKEND_BASE
    } else {
        WEEKDAY_BASE
    }
}

pub fn growth_factor(year: i32) -> f64 {
    1.0 + f64::from(year - GROWTH_BASE_YEAR) * GROWTH_PER_YEAR
}

/// Expected volume plus `noise`, rounded and floored at zero.
pub fn synthetic_total(date: NaiveDate, noise: f64) -> u64 {
    let value = (base_volume(date) * growth_factor(date.year()) + noise).round();
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Generate one observation per day of `dates`, with independent noise draws.
pub fn generate<R: Rng + ?Sized>(dates: DateRange, rng: &mut R) -> Result<Vec<Observation>, AppError> {
    let normal = Normal::new(0.0, NOISE_STD_DEV)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(dates.len());
    for date in dates {
        let noise = normal.sample(rng);
        out.push(Observation {
            date,
            day_type: DayTypeCode::for_weekday(date.weekday()),
            total: synthetic_total(date, noise),
        });
    }
    Ok(out)
}

/// Extend `history` through `HORIZON_END` and return the combined series
/// sorted ascending by date.
///
/// Historical rows are kept as-is (including their own ordering among equal
/// dates); only the continuation is synthetic.
pub fn build_series<R: Rng + ?Sized>(history: Vec<Observation>, rng: &mut R) -> Result<BuiltSeries, AppError> {
    let range = continuation_range(&history);
    let continuation_start = continuation_start(&history).filter(|_| range.len() > 0);

    let generated = generate(range, rng)?;
    let history_rows = history.len();
    let generated_rows = generated.len();

    let mut observations = history;
    observations.extend(generated);
    observations.sort_by_key(|o| o.date);

    debug!(
        history_rows,
        generated_rows,
        start = ?continuation_start,
        "built footfall series"
    );

    Ok(BuiltSeries {
        observations,
        history_rows,
        generated_rows,
        continuation_start,
    })
}

/// RNG for the noise draws: seeded when a seed is configured, otherwise
/// seeded from OS entropy.
pub fn series_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
