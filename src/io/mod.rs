//! Input/output helpers.
//!
//! - optional history CSV ingest (`ingest`)
//! - enriched series export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
