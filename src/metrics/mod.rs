//! Derived metrics computed from normalized fields.

pub mod derived;

pub use derived::*;
