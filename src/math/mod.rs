//! Numeric utilities: moving averages and least squares.

pub mod ols;
pub mod smooth;

pub use ols::*;
pub use smooth::*;
