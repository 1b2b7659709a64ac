//! Growth-curve construction and trend fitting.
//!
//! Responsibilities:
//!
//! - smooth cumulative and daily-increase series per region
//! - fit a trailing-window slope per region

pub mod curve;
pub mod slope;

pub use curve::*;
pub use slope::*;
