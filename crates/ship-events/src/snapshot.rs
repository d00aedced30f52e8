//! Snapshot Types
//!
//! Serialization structs for voyage snapshots.
//!
//! A snapshot captures the full state of the ship and its crew on a given day,
//! used for analysis and debugging.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Physical and institutional state of the ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipStateSnapshot {
    pub day: u32,
    pub heading: f32,
    pub temperature: f32,
    pub danger_level: f32,
    pub captain_authority: f32,
    pub social_cohesion: f32,
    pub philosophical_tension: f32,
    pub sunk: bool,
    #[serde(default)]
    pub captain: Option<u32>,
}

/// Emotional state of a character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionsSnapshot {
    pub anger: f32,
    pub hope: f32,
    pub fear: f32,
    pub happiness: f32,
}

/// Full character snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub character_id: u32,
    pub name: String,
    pub role: String,
    pub ideology: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub needs: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_needs: Vec<String>,
    pub satisfaction: f32,
    pub stress: f32,
    pub trust_in_captain: f32,
    pub influence: f32,
    pub speaking_ability: f32,
    #[serde(default)]
    pub is_spokesperson: bool,
    pub psychological_state: String,
    #[serde(default)]
    pub emotions: EmotionsSnapshot,
    pub hidden_agenda: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allies: Vec<u32>,
    #[serde(default)]
    pub memory_count: usize,
}

/// Alliance snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllianceSnapshot {
    pub alliance_id: String,
    pub members: Vec<u32>,
    pub purpose: String,
    pub strength: f32,
    pub created_day: u32,
    pub broken: bool,
}

/// Identity group snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub identity: String,
    pub members: Vec<u32>,
    #[serde(default)]
    pub spokesperson: Option<u32>,
}

/// One undirected edge of the social graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub a: u32,
    pub b: u32,
    pub strength: f32,
    pub relationship_type: String,
}

/// Complete voyage snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageSnapshot {
    pub snapshot_id: String,
    pub day: u32,
    pub triggered_by: String,
    pub ship: ShipStateSnapshot,
    #[serde(default)]
    pub characters: Vec<CharacterSnapshot>,
    #[serde(default)]
    pub alliances: Vec<AllianceSnapshot>,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSnapshot>,
}

impl VoyageSnapshot {
    pub fn new(snapshot_id: impl Into<String>, day: u32, triggered_by: impl Into<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            day,
            triggered_by: triggered_by.into(),
            ship: ShipStateSnapshot::default(),
            characters: Vec::new(),
            alliances: Vec::new(),
            groups: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Mean stress across the crew, 0 for an empty ship
    pub fn average_stress(&self) -> f32 {
        if self.characters.is_empty() {
            return 0.0;
        }
        self.characters.iter().map(|c| c.stress).sum::<f32>() / self.characters.len() as f32
    }

    pub fn active_alliances(&self) -> impl Iterator<Item = &AllianceSnapshot> {
        self.alliances.iter().filter(|a| !a.broken)
    }

    pub fn character(&self, character_id: u32) -> Option<&CharacterSnapshot> {
        self.characters.iter().find(|c| c.character_id == character_id)
    }
}
