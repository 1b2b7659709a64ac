//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{AnalysisConfig, GrowthSummary, RankedRegion};

/// Format the full run summary (dataset stats + selected regions + growth table).
pub fn format_run_summary(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== growth - case growth vs. cumulative cases ===\n");
    match run.dataset.latest_date() {
        Some(date) => out.push_str(&format!("Latest data: {date}\n")),
        None => out.push_str("Latest data: unknown\n"),
    }
    let series_count = run.dataset.iter_series().count();
    out.push_str(&format!(
        "Regions: {} ({} series, {} single-entry)\n",
        run.dataset.len(),
        series_count,
        run.dataset.len() - series_count,
    ));
    out.push_str(&format!(
        "Windows: moving average={}d | slope={}pts | percent-positive={}d\n",
        config.avg_window, config.slope_window, config.pct_window,
    ));
    out.push_str(&format!(
        "Slopes: {} regions with a positive cumulative count\n",
        run.slopes.len()
    ));

    out.push_str(&format!("\nSelected regions (focus: {}):\n", config.focus_region));
    out.push_str(&format_selected(run));
    out.push('\n');

    out.push_str("Slope vs. percent positive (ascending slope):\n");
    out.push_str(&format_summary_table(&run.summaries, &config.focus_region));

    out
}

/// Format a generic `(region, value)` ranking.
pub fn format_rankings(title: &str, rows: &[RankedRegion]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("{:>4} {:<8} {:>14}", "#", "region", "value"));
    out.push('\n');
    out.push_str(&format!("{:->4} {:-<8} {:->14}", "", "", ""));
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("{:>4} {:<8} {:>14.6}", i + 1, truncate(&row.region, 8), row.value));
        out.push('\n');
    }
    out
}

fn format_selected(run: &RunOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:>12} {:>12}\n", "region", "slope", "latest"));
    out.push_str(&format!("{:-<8} {:->12} {:->12}\n", "", "", ""));
    for region in &run.selected {
        let slope = run
            .slopes
            .get(region)
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let latest = run
            .curves
            .iter()
            .find(|c| &c.region == region)
            .and_then(|c| c.latest_cumulative())
            .map(|v| format!("{v:.0}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<8} {:>12} {:>12}\n", truncate(region, 8), slope, latest));
    }
    out
}

fn format_summary_table(rows: &[GrowthSummary], focus: &str) -> String {
    let mut out = String::new();
    out.push_str(
        format!("  {:<8} {:<22} {:>10} {:>10}", "region", "name", "slope", "pct_pos")
            .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("  {:-<8} {:-<22} {:->10} {:->10}", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        let marker = if r.region == focus { '*' } else { ' ' };
        out.push_str(
            format!(
                "{marker} {:<8} {:<22} {:>10.4} {:>9.1}%",
                truncate(&r.region, 8),
                truncate(r.name.as_deref().unwrap_or(""), 22),
                r.slope,
                r.percent_positive * 100.0,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
