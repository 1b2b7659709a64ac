//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input records (`RawRecord`)
//! - normalized per-region data (`RegionSeriesSet`, `RegionSnapshot`, `RegionDataset`)
//! - analysis outputs (`SlopeTable`, `GrowthCurve`, `RankedRegion`, `GrowthSummary`)
//! - run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
