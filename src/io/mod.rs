//! Input/output helpers.
//!
//! - raw JSON documents and offline loading (`source`)
//! - record normalization (`normalize`)
//! - JSON/CSV exports (`export`)

pub mod export;
pub mod normalize;
pub mod source;

pub use export::*;
pub use normalize::*;
pub use source::*;
