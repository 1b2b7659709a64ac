use std::path::PathBuf;
use std::time::Duration;

use growth_curves::app::pipeline::{run_analysis, run_with_snapshot};
use growth_curves::domain::{AnalysisConfig, MetricFields, RawRecord, SourceConfig};
use growth_curves::error::ErrorKind;
use growth_curves::io::source::SourceSnapshot;
use serde_json::{Value, json};

const DAYS: usize = 20;

fn config(avg_window: usize, slope_window: usize) -> AnalysisConfig {
    AnalysisConfig {
        source: SourceConfig {
            daily_url: String::new(),
            info_url: String::new(),
            aggregate_url: None,
            timeout: Duration::from_secs(1),
            from_dir: None,
        },
        region_field: "state".to_string(),
        aggregate_key: "US".to_string(),
        fields: MetricFields::default(),
        focus_region: "AA".to_string(),
        comparison_regions: vec!["BB".to_string()],
        avg_window,
        slope_window,
        pct_window: slope_window,
        export_json: None,
        export_csv: None,
    }
}

fn object(v: Value) -> RawRecord {
    match v {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn increases_aa() -> Vec<f64> {
    (0..DAYS).map(|d| 10.0 + (d * d) as f64).collect()
}

fn tests_aa() -> Vec<f64> {
    (0..DAYS).map(|d| 100.0 + 5.0 * d as f64).collect()
}

/// Two regions, 20 days, delivered newest-first and interleaved.
/// `BB` never reports a positive case.
fn synthetic_snapshot() -> SourceSnapshot {
    let inc = increases_aa();
    let tests = tests_aa();
    let mut cumulative = 0.0;
    let mut per_day = Vec::new();
    for d in 0..DAYS {
        cumulative += inc[d];
        let date = 20200301 + d as i64;
        let bb_tests = if d % 2 == 0 { 0 } else { 20 };
        per_day.push((
            object(json!({
                "date": date,
                "state": "AA",
                "positive": cumulative,
                "positiveIncrease": inc[d],
                "totalTestResultsIncrease": tests[d],
            })),
            object(json!({
                "date": date,
                "state": "BB",
                "positive": null,
                "positiveIncrease": 0,
                "totalTestResultsIncrease": bb_tests,
            })),
        ));
    }

    let mut daily = Vec::new();
    for (aa, bb) in per_day.into_iter().rev() {
        daily.push(aa);
        daily.push(bb);
    }

    SourceSnapshot {
        daily,
        info: vec![
            object(json!({"state": "AA", "name": "Region A"})),
            object(json!({"state": "BB", "name": "Region B"})),
        ],
        aggregate: None,
    }
}

fn moving_average(data: &[f64], n: usize) -> Vec<f64> {
    (0..=data.len() - n)
        .map(|i| data[i..i + n].iter().sum::<f64>() / n as f64)
        .collect()
}

/// Closed-form least squares slope.
fn ls_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let sxx: f64 = x.iter().map(|a| (a - mx) * (a - mx)).sum();
    sxy / sxx
}

#[test]
fn end_to_end_slopes_match_independent_fit() {
    let run = run_with_snapshot(&config(5, 15), synthetic_snapshot()).unwrap();

    // Only the region with a positive latest cumulative count gets a slope.
    assert_eq!(run.slopes.len(), 1);
    assert!(!run.slopes.contains("BB"));

    let inc = increases_aa();
    let cumulative: Vec<f64> = inc
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect();
    let x = moving_average(&cumulative, 5);
    let y = moving_average(&inc, 5);
    assert_eq!(x.len(), DAYS - 4);
    let start = x.len() - 15;
    let expected = ls_slope(&x[start..], &y[start..]);

    let got = run.slopes.get("AA").unwrap();
    assert!(
        (got - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "slope {got} vs expected {expected}"
    );
}

#[test]
fn end_to_end_series_are_aligned_and_derived() {
    let run = run_with_snapshot(&config(5, 15), synthetic_snapshot()).unwrap();
    let fields = MetricFields::default();

    let aa = run.dataset.series("AA").unwrap();
    assert_eq!(aa.len(), DAYS);
    for name in aa.field_names() {
        assert_eq!(aa.field(name).unwrap().len(), DAYS, "field {name}");
    }
    // Oldest first.
    assert_eq!(aa.field(&fields.increase).unwrap()[0], 10.0);

    let pct = aa.field(&fields.percent_positive).unwrap();
    let (inc, tests) = (increases_aa(), tests_aa());
    for i in 0..DAYS {
        assert!((pct[i] - inc[i] / tests[i]).abs() < 1e-15);
    }

    let bb = run.dataset.series("BB").unwrap();
    assert!(bb.field(&fields.cumulative).unwrap().iter().all(|v| *v == 0.0));
    assert!(bb.field(&fields.percent_positive).unwrap().iter().all(|v| *v == 0.0));

    // Info has one record per region, so it is all snapshots.
    assert_eq!(run.info.snapshot("AA").unwrap().text("name"), Some("Region A"));
    assert!(run.info.series("AA").is_none());

    assert_eq!(run.selected, vec!["AA", "BB"]);
    assert_eq!(run.summaries.len(), 1);
    assert_eq!(run.summaries[0].name.as_deref(), Some("Region A"));
}

#[test]
fn record_without_region_field_aborts_the_run() {
    let mut snapshot = synthetic_snapshot();
    snapshot.daily.push(object(json!({"date": 20200220, "positive": 1})));
    let err = run_with_snapshot(&config(5, 15), snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.message().contains("[date, positive]"));
}

#[test]
fn slope_window_longer_than_smoothed_series_is_insufficient_data() {
    let err = run_with_snapshot(&config(5, 17), synthetic_snapshot()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
    assert!(err.message().contains("AA"));
}

#[test]
fn short_region_without_signal_does_not_abort_the_run() {
    let mut snapshot = synthetic_snapshot();
    for date in [20200320, 20200319, 20200318] {
        snapshot.daily.push(object(json!({
            "date": date,
            "state": "ZZ",
            "positive": 0,
            "positiveIncrease": 0,
            "totalTestResultsIncrease": 4,
        })));
    }

    let run = run_with_snapshot(&config(5, 15), snapshot).unwrap();
    assert_eq!(run.slopes.len(), 1);
    assert!(run.slopes.contains("AA"));
    assert!(run.curves.iter().all(|c| c.region != "ZZ"));
    assert_eq!(run.dataset.series("ZZ").unwrap().len(), 3);
}

#[test]
fn offline_fixture_directory() {
    let mut cfg = config(2, 3);
    cfg.focus_region = "NM".to_string();
    cfg.comparison_regions = vec!["NY".to_string(), "NM".to_string()];
    cfg.source.from_dir = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot"));

    let run = run_analysis(&cfg).unwrap();
    assert_eq!(run.selected, vec!["US", "NM", "NY"]);
    assert_eq!(run.slopes.len(), 3);

    // NM cumulative [3, 8, 16, 28, 43], increase [3, 5, 8, 12, 15], window 2.
    let x = [12.0, 22.0, 35.5];
    let y = [6.5, 10.0, 13.5];
    let got = run.slopes.get("NM").unwrap();
    assert!((got - ls_slope(&x, &y)).abs() < 1e-9);

    let ny = run.dataset.series("NY").unwrap();
    let pct = ny.field("percentPositive").unwrap();
    assert_eq!(pct[2], 0.0);
    assert!(!ny.has_field("hash"));
    assert_eq!(ny.field("negative").unwrap(), &[0.0; 5]);
    assert_eq!(
        run.dataset.latest_date(),
        chrono::NaiveDate::from_ymd_opt(2020, 4, 5)
    );

    let names: Vec<Option<&str>> = run.summaries.iter().map(|s| s.name.as_deref()).collect();
    assert!(names.contains(&Some("New Mexico")));
    assert!(names.contains(&Some("New York")));
}
