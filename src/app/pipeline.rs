//! Shared analysis pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> normalize -> derived metrics -> growth curves -> slopes -> rankings
//!
//! The subcommands can then focus on presentation.

use tracing::info;

use crate::data::CovidTrackingClient;
use crate::domain::{AnalysisConfig, GrowthCurve, GrowthSummary, RankedRegion, RegionDataset, SlopeTable};
use crate::error::AppError;
use crate::fit::{growth_curves, slope_table};
use crate::io::normalize::{normalize_records, normalize_with_aggregate};
use crate::io::source::{SourceSnapshot, load_snapshot_from_dir};
use crate::metrics::with_derived_metrics;
use crate::report::{rank_slopes, select_regions, summarize_growth};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Per-region daily data (plus the aggregate), with derived series.
    pub dataset: RegionDataset,
    /// Static per-region information.
    pub info: RegionDataset,
    pub curves: Vec<GrowthCurve>,
    pub slopes: SlopeTable,
    pub slope_ranking: Vec<RankedRegion>,
    /// Aggregate, focus region, then comparison regions.
    pub selected: Vec<String>,
    pub summaries: Vec<GrowthSummary>,
}

/// Fetch (or load) the snapshot, then run the analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    config.validate()?;
    let snapshot = load_snapshot(config)?;
    run_with_snapshot(config, snapshot)
}

pub fn load_snapshot(config: &AnalysisConfig) -> Result<SourceSnapshot, AppError> {
    match &config.source.from_dir {
        Some(dir) => load_snapshot_from_dir(dir),
        None => CovidTrackingClient::new(config.source.timeout)?.fetch_snapshot(&config.source),
    }
}

/// Normalize and analyze a pre-fetched snapshot.
pub fn normalize_snapshot(
    config: &AnalysisConfig,
    snapshot: SourceSnapshot,
) -> Result<(RegionDataset, RegionDataset), AppError> {
    let dataset = normalize_with_aggregate(
        snapshot.daily,
        snapshot.aggregate,
        &config.region_field,
        &config.aggregate_key,
    )?;
    let dataset = with_derived_metrics(dataset, &config.fields)?;
    let info = normalize_records(snapshot.info, &config.region_field)?;
    info!(
        regions = dataset.len(),
        series = dataset.iter_series().count(),
        info = info.len(),
        "normalized snapshot"
    );
    Ok((dataset, info))
}

/// Execute the pipeline on a pre-fetched snapshot.
pub fn run_with_snapshot(config: &AnalysisConfig, snapshot: SourceSnapshot) -> Result<RunOutput, AppError> {
    config.validate()?;
    let (dataset, info) = normalize_snapshot(config, snapshot)?;

    let curves = growth_curves(&dataset, &config.fields, config.avg_window)?;
    let slopes = slope_table(&curves, config.slope_window)?;
    info!(curves = curves.len(), slopes = slopes.len(), "fitted slopes");

    let slope_ranking = rank_slopes(&slopes);
    let selected = select_regions(
        &dataset,
        &config.focus_region,
        &config.comparison_regions,
        &config.aggregate_key,
    )?;
    let summaries = summarize_growth(&dataset, &info, &slopes, &config.fields, config.pct_window);

    Ok(RunOutput {
        dataset,
        info,
        curves,
        slopes,
        slope_ranking,
        selected,
        summaries,
    })
}
