//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - runs the analysis pipeline
//! - prints reports
//! - writes optional exports

use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, RankArgs, RunArgs};
use crate::domain::{AnalysisConfig, MetricFields, SourceConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `growth` and `growth -r NY` behave like `growth report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Slopes(args) => handle_slopes(args),
        Command::Rank(args) => handle_rank(args),
    }
}

fn handle_report(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    write_exports(&run, &config)
}

fn handle_slopes(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!(
        "{}",
        crate::report::format_rankings("Slope (daily increase vs. cumulative), ascending:", &run.slope_ranking)
    );
    write_exports(&run, &config)
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.run);
    config.validate()?;
    let snapshot = pipeline::load_snapshot(&config)?;
    let (dataset, _info) = pipeline::normalize_snapshot(&config, snapshot)?;

    let ranked = crate::report::rank_by_field_average(&dataset, &args.field, args.window)?;
    info!(field = args.field.as_str(), regions = ranked.len(), "ranked");
    let title = format!("{} (trailing {} average), ascending:", args.field, args.window);
    println!("{}", crate::report::format_rankings(&title, &ranked));
    Ok(())
}

fn write_exports(run: &pipeline::RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    if let Some(path) = &config.export_json {
        crate::io::export::write_results_json(path, run, config)?;
        info!(path = %path.display(), "wrote JSON export");
    }
    if let Some(path) = &config.export_csv {
        crate::io::export::write_summary_csv(path, run)?;
        info!(path = %path.display(), "wrote CSV export");
    }
    Ok(())
}

pub fn analysis_config_from_args(args: &RunArgs) -> AnalysisConfig {
    AnalysisConfig {
        source: SourceConfig {
            daily_url: args.daily_url.clone(),
            info_url: args.info_url.clone(),
            aggregate_url: (!args.no_aggregate).then(|| args.aggregate_url.clone()),
            timeout: Duration::from_secs(args.timeout_secs),
            from_dir: args.from_dir.clone(),
        },
        region_field: args.region_field.clone(),
        aggregate_key: args.aggregate_key.clone(),
        fields: MetricFields::default(),
        focus_region: args.region.trim().to_string(),
        comparison_regions: args
            .compare
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        avg_window: args.avg_window,
        slope_window: args.slope_window,
        pct_window: args.pct_window.unwrap_or(args.slope_window),
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
    }
}

/// Rewrite argv so `growth` defaults to `growth report`.
///
/// Rules:
/// - `growth`                      -> `growth report`
/// - `growth -r NY ...`            -> `growth report -r NY ...`
/// - `growth --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "slopes" | "rank");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}
