//! Shared event types and serialization for the Ship of Fools simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Everything the simulation writes to disk is defined here.

pub mod event;
pub mod report;
pub mod snapshot;

// Re-export event types
pub use event::*;

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AllianceSnapshot, CharacterSnapshot, EmotionsSnapshot, GroupSnapshot,
    RelationshipSnapshot, ShipStateSnapshot, VoyageSnapshot,
};

// Re-export report types
pub use report::{generate_run_id, VoyageOutcome, VoyageReport};
