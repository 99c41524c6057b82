//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - day-type codes and their labels (`DayTypeCode`, `DayLabel`)
//! - raw and enriched daily rows (`Observation`, `DayRecord`)
//! - live gauge and map types (`LiveReading`, `LoadLevel`, `Hotspot`)
//! - run configuration (`FlowConfig`, `YearSelection`)

pub mod types;

pub use types::*;
