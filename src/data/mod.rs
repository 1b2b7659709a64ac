//! External data sources.

pub mod covidtracking;

pub use covidtracking::CovidTrackingClient;
