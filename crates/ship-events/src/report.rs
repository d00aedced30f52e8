//! End-of-voyage report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Generates a unique identifier for one simulation run.
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// How the voyage ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoyageOutcome {
    /// The ship hit the icebergs
    Sunk,
    /// Someone finally turned the ship south
    TurnedSouth,
    /// The simulated days ran out with the ship still heading north
    StillSailing,
}

/// Summary statistics written when the simulation finishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageReport {
    pub run_id: String,
    pub seed: u64,
    pub days_survived: u32,
    pub outcome: VoyageOutcome,
    pub protests: usize,
    pub mutinies_attempted: usize,
    pub mutinies_succeeded: usize,
    pub leadership_changes: usize,
    pub alliances_formed: usize,
    pub alliances_broken: usize,
    pub final_captain_authority: f32,
    pub average_stress: f32,
    /// Critical needs still unmet when the voyage ended
    #[serde(default)]
    pub unresolved_demands: Vec<String>,
    #[serde(default)]
    pub events_by_type: BTreeMap<String, usize>,
    pub total_events: usize,
}

impl VoyageReport {
    pub fn sunk(&self) -> bool {
        self.outcome == VoyageOutcome::Sunk
    }
}
