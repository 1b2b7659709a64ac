//! Command-line parsing for the growth analysis.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the normalization/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::covidtracking::{AGGREGATE_URL, DAILY_URL, INFO_URL};
use crate::domain::{DEFAULT_AGGREGATE_KEY, DEFAULT_REGION_FIELD};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "Daily case growth vs. cumulative cases, per US state")]
pub struct Cli {
    /// Log per-region decisions (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full summary: selected regions, slopes, and percent positive.
    Report(RunArgs),
    /// Print the slope ranking only (useful for scripting).
    Slopes(RunArgs),
    /// Rank regions by the trailing average of any field.
    Rank(RankArgs),
}

/// Common options for every run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Region to highlight.
    #[arg(short = 'r', long, env = "GROWTH_REGION", default_value = "NM")]
    pub region: String,

    /// Regions to compare against (comma separated).
    #[arg(
        short = 'c',
        long,
        env = "GROWTH_COMPARE",
        value_delimiter = ',',
        default_value = "WA,MN,LA,NY,CA,NJ,ME,MS,GU,ND,OH,TX,FL"
    )]
    pub compare: Vec<String>,

    /// Moving-average window (days).
    #[arg(long, default_value_t = 5)]
    pub avg_window: usize,

    /// Number of trailing points used for the slope fit.
    #[arg(long, default_value_t = 15)]
    pub slope_window: usize,

    /// Days averaged for percent positive (defaults to the slope window).
    #[arg(long)]
    pub pct_window: Option<usize>,

    /// Per-state daily data.
    #[arg(long, env = "GROWTH_DAILY_URL", default_value = DAILY_URL)]
    pub daily_url: String,

    /// Per-state info.
    #[arg(long, env = "GROWTH_INFO_URL", default_value = INFO_URL)]
    pub info_url: String,

    /// National daily data.
    #[arg(long, env = "GROWTH_AGGREGATE_URL", default_value = AGGREGATE_URL)]
    pub aggregate_url: String,

    /// Do not fetch the national series.
    #[arg(long)]
    pub no_aggregate: bool,

    /// Key the national series is stored under.
    #[arg(long, default_value = DEFAULT_AGGREGATE_KEY)]
    pub aggregate_key: String,

    /// Region identifier field in the source records.
    #[arg(long, default_value = DEFAULT_REGION_FIELD)]
    pub region_field: String,

    /// HTTP timeout per request (seconds).
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Read daily.json, info.json and us_daily.json from this directory instead of fetching.
    #[arg(long, value_name = "DIR")]
    pub from_dir: Option<PathBuf>,

    /// Export curves, slopes and the summary to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export the summary table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

/// Options for `growth rank`.
#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Field to rank by.
    #[arg(long, default_value = "percentPositive")]
    pub field: String,

    /// Number of trailing values averaged (1 = latest value).
    #[arg(long, default_value_t = 1)]
    pub window: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["growth", "report"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.avg_window, 5);
        assert_eq!(args.slope_window, 15);
        assert_eq!(args.pct_window, None);
    }

    #[test]
    fn compare_list_splits_on_commas() {
        let cli = Cli::try_parse_from(["growth", "slopes", "--compare", "NY,CA", "-r", "WA"]).unwrap();
        let Command::Slopes(args) = cli.command else {
            panic!("expected slopes");
        };
        assert_eq!(args.compare, vec!["NY", "CA"]);
        assert_eq!(args.region, "WA");
    }

    #[test]
    fn rank_takes_field_and_window() {
        let cli = Cli::try_parse_from(["growth", "rank", "--field", "death", "--window", "7", "-v"]).unwrap();
        assert!(cli.verbose);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.field, "death");
        assert_eq!(args.window, 7);
    }
}
