//! Output Generation
//!
//! Snapshot generation, statistics, the voyage report and status text.

pub mod snapshot;
pub mod stats;
pub mod status;

pub use snapshot::*;
pub use stats::*;
pub use status::*;
