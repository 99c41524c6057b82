//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and `.env` defaults
//! - initialises logging
//! - builds the series (history + projection)
//! - prints summaries, writes exports, or hands over to the TUI

use chrono::{Local, Timelike};
use clap::Parser;
use tracing::info;

use crate::cli::{Command, DataArgs, ExportArgs, LiveArgs, SummaryArgs};
use crate::config::{EnvSettings, flow_config_from_args};
use crate::data::{live_reading, series_rng};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `flow` binary.
pub fn run() -> Result<(), AppError> {
    // `flow` and `flow --seed 7` behave like `flow tui ...`; clap needs the
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; stay quiet unless RUST_LOG asks otherwise.
    let default_log = match cli.command {
        Command::Tui(_) => "off",
        _ => "warn",
    };
    crate::logging::init(default_log);

    let env = EnvSettings::from_env()?;

    match cli.command {
        Command::Tui(args) => handle_tui(args, &env),
        Command::Summary(args) => handle_summary(args, &env),
        Command::Export(args) => handle_export(args, &env),
        Command::Live(args) => handle_live(args),
    }
}

fn handle_tui(args: DataArgs, env: &EnvSettings) -> Result<(), AppError> {
    let config = flow_config_from_args(&args, env);
    crate::tui::run(config)
}

fn handle_summary(args: SummaryArgs, env: &EnvSettings) -> Result<(), AppError> {
    let config = flow_config_from_args(&args.data, env);
    let series = pipeline::build_dataset(&config)?;
    let view = pipeline::view_for_selection(&series, &config.years);
    let summary = pipeline::summarize(&series, &view);

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::runtime(format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_summary(&summary));
    }
    Ok(())
}

fn handle_export(args: ExportArgs, env: &EnvSettings) -> Result<(), AppError> {
    let config = flow_config_from_args(&args.data, env);
    let series = pipeline::build_dataset(&config)?;
    let view = pipeline::view_for_selection(&series, &config.years);

    crate::io::export::write_series_csv(&args.out, &view.filtered)?;
    info!(rows = view.filtered.len(), "export complete");
    println!("Wrote {} rows to {}", view.filtered.len(), args.out.display());
    Ok(())
}

fn handle_live(args: LiveArgs) -> Result<(), AppError> {
    let hour = args.hour.unwrap_or_else(|| Local::now().hour());
    let mut rng = series_rng(args.seed);
    let reading = live_reading(hour, &mut rng);
    println!("{}", crate::report::format::format_live(&reading));
    Ok(())
}

/// Rewrite argv so `flow` defaults to `flow tui`.
///
/// Rules:
/// - `flow`                       -> `flow tui`
/// - `flow --seed 7 ...`          -> `flow tui --seed 7 ...`
/// - `flow --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "summary" | "export" | "live");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
