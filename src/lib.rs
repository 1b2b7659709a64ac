//! `growth-curves` library crate.
//!
//! The binary (`growth`) is a thin wrapper around this library so that:
//!
//! - the normalization and fitting pipeline is testable without spawning processes
//! - an external renderer can consume `app::pipeline::RunOutput` directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod metrics;
pub mod report;
