//! Slope vs. recent test positivity, per region.

use crate::domain::{FIELD_NAME, GrowthSummary, MetricFields, RegionDataset, SlopeTable};
use crate::report::rank::{rank_slopes, trailing_mean};

/// One row per region that has both a slope and a percent-positive series,
/// ordered by ascending slope. Display names come from `info` when present.
pub fn summarize_growth(
    dataset: &RegionDataset,
    info: &RegionDataset,
    slopes: &SlopeTable,
    fields: &MetricFields,
    pct_window: usize,
) -> Vec<GrowthSummary> {
    rank_slopes(slopes)
        .into_iter()
        .filter_map(|ranked| {
            let pct = dataset.series(&ranked.region)?.field(&fields.percent_positive)?;
            let percent_positive = trailing_mean(pct, pct_window.max(1))?;
            let name = info
                .snapshot(&ranked.region)
                .and_then(|s| s.text(FIELD_NAME))
                .map(str::to_string);
            Some(GrowthSummary {
                region: ranked.region,
                name,
                slope: ranked.value,
                percent_positive,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RegionData, RegionSeriesSet, RegionSnapshot};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn joins_slope_positivity_and_name() {
        let fields = MetricFields::default();
        let mut regions = BTreeMap::new();
        for (name, pct) in [("NM", vec![0.1, 0.2, 0.3]), ("NY", vec![0.4, 0.4, 0.4])] {
            let mut set = RegionSeriesSet::new(name, 3);
            set.insert_field(fields.percent_positive.as_str(), pct).unwrap();
            regions.insert(name.to_string(), RegionData::Series(set));
        }
        // No percent-positive series: left out.
        regions.insert("GU".to_string(), RegionData::Series(RegionSeriesSet::new("GU", 3)));
        let dataset = RegionDataset::new(regions);

        let mut info = BTreeMap::new();
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), json!("New Mexico"));
        info.insert("NM".to_string(), RegionData::Snapshot(RegionSnapshot::new("NM", values)));
        let info = RegionDataset::new(info);

        let mut slopes = SlopeTable::new();
        slopes.insert("NM", 0.05);
        slopes.insert("NY", -0.02);
        slopes.insert("GU", 0.01);

        let rows = summarize_growth(&dataset, &info, &slopes, &fields, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "NY");
        assert_eq!(rows[0].name, None);
        assert_eq!(rows[1].region, "NM");
        assert_eq!(rows[1].name.as_deref(), Some("New Mexico"));
        assert!((rows[1].percent_positive - 0.25).abs() < 1e-12);
    }
}
