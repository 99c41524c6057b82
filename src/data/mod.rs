//! Data sources for the dashboard: the synthetic footfall series, its
//! calendar enrichment, the live gauge simulator and the hotspot catalogue.

pub mod calendar;
pub mod hotspots;
pub mod live;
pub mod synthetic;

pub use calendar::enrich;
pub use hotspots::HOTSPOTS;
pub use live::{live_reading, load_factor};
pub use synthetic::{BuiltSeries, DateRange, build_series, series_rng};
