//! Command-line parsing for the passenger-flow dashboard.
//!
//! Argument parsing and dispatch stay separate from the data pipeline; flags are
//! turned into a `FlowConfig` by `crate::config`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "flow", version, about = "La Défense passenger-flow dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DataArgs),
    /// Print a summary of the (year-filtered) series.
    Summary(SummaryArgs),
    /// Write the enriched, year-filtered series to a semicolon CSV.
    Export(ExportArgs),
    /// Print one simulated live occupancy reading.
    Live(LiveArgs),
}

/// Options shared by every command that builds the series.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Historical CSV (semicolon separated). Missing file = synthetic only.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Seed for the projection noise (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Years to analyse, comma separated (default: two most recent).
    #[arg(long, value_delimiter = ',', conflicts_with = "all_years")]
    pub years: Vec<i32>,

    /// Analyse the whole series.
    #[arg(long)]
    pub all_years: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct LiveArgs {
    /// Hour of day (0-23); defaults to the local clock.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,

    /// Seed for the gauge jitter.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_years_list() {
        let cli = Cli::parse_from(["flow", "summary", "--years", "2024,2025", "--seed", "3"]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.data.years, vec![2024, 2025]);
        assert_eq!(args.data.seed, Some(3));
        assert!(!args.json);
    }

    #[test]
    fn years_conflict_with_all_years() {
        let res = Cli::try_parse_from(["flow", "summary", "--years", "2024", "--all-years"]);
        assert!(res.is_err());
    }

    #[test]
    fn live_hour_is_range_checked() {
        assert!(Cli::try_parse_from(["flow", "live", "--hour", "24"]).is_err());
        let cli = Cli::parse_from(["flow", "live", "--hour", "17"]);
        let Command::Live(args) = cli.command else {
            panic!("expected live");
        };
        assert_eq!(args.hour, Some(17));
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["flow", "export"]).is_err());
        assert!(Cli::try_parse_from(["flow", "export", "-o", "series.csv"]).is_ok());
    }
}
