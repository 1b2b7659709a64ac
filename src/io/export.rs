//! Export run results for an external renderer or spreadsheet.
//!
//! - JSON: selected regions, growth curves, slopes, and the growth summary
//! - CSV: the growth summary table

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{AnalysisConfig, GrowthCurve, GrowthSummary, SlopeTable};
use crate::error::{AppError, ErrorKind};

/// Saved results file (JSON).
#[derive(Debug, Serialize)]
pub struct ResultsFile<'a> {
    pub tool: &'static str,
    pub latest_date: Option<NaiveDate>,
    pub avg_window: usize,
    pub slope_window: usize,
    pub pct_window: usize,
    pub focus_region: &'a str,
    pub selected: &'a [String],
    pub slopes: &'a SlopeTable,
    pub summaries: &'a [GrowthSummary],
    pub curves: &'a [GrowthCurve],
}

pub fn write_results_json(path: &Path, run: &RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let results = ResultsFile {
        tool: "growth",
        latest_date: run.dataset.latest_date(),
        avg_window: config.avg_window,
        slope_window: config.slope_window,
        pct_window: config.pct_window,
        focus_region: &config.focus_region,
        selected: &run.selected,
        slopes: &run.slopes,
        summaries: &run.summaries,
        curves: &run.curves,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &results)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write '{}': {e}", path.display())))
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    region: &'a str,
    name: &'a str,
    slope: f64,
    percent_positive: f64,
    selected: bool,
}

pub fn write_summary_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    write_summary(file, &run.summaries, &run.selected)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write '{}': {e}", path.display())))
}

fn write_summary<W: std::io::Write>(writer: W, rows: &[GrowthSummary], selected: &[String]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(SummaryRow {
            region: &r.region,
            name: r.name.as_deref().unwrap_or(""),
            slope: r.slope,
            percent_positive: r.percent_positive,
            selected: selected.iter().any(|s| s == &r.region),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(ErrorKind::Io, format!("Failed to create '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_csv_has_header_and_rows() {
        let rows = vec![GrowthSummary {
            region: "NM".to_string(),
            name: Some("New Mexico".to_string()),
            slope: 0.5,
            percent_positive: 0.25,
        }];
        let mut buf = Vec::new();
        write_summary(&mut buf, &rows, &["NM".to_string()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("region,name,slope,percent_positive,selected"));
        assert_eq!(lines.next(), Some("NM,New Mexico,0.5,0.25,true"));
    }
}
