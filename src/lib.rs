//! `transit-flow` library crate.
//!
//! The binary (`flow`) is a thin wrapper around this library so that:
//!
//! - the series builder and reports are testable without spawning processes
//! - the same pipeline serves the TUI and the plain CLI commands

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
