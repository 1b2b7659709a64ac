//! Reporting utilities: rankings, growth summaries, and formatted output.

pub mod format;
pub mod rank;
pub mod summary;

pub use format::*;
pub use rank::*;
pub use summary::*;
