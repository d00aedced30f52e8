//! Alliance Registry
//!
//! Alliances are loose coalitions of characters bound by shared ideology,
//! identity or grievances. They strengthen as members join and fall apart
//! when strength or membership runs out.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Strength gained when a new member joins
pub const JOIN_BONUS: f32 = 5.0;
/// Strength lost when a member leaves
pub const LEAVE_PENALTY: f32 = 10.0;

/// What holds an alliance together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlliancePurpose {
    SharedIdeology,
    SharedIdentity,
    SharedGrievances,
}

impl AlliancePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlliancePurpose::SharedIdeology => "shared_ideology",
            AlliancePurpose::SharedIdentity => "shared_identity",
            AlliancePurpose::SharedGrievances => "shared_grievances",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AlliancePurpose::SharedIdeology => "Shared ideology",
            AlliancePurpose::SharedIdentity => "Shared identity",
            AlliancePurpose::SharedGrievances => "Shared grievances",
        }
    }
}

/// A coalition of characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
    pub alliance_id: String,
    pub members: BTreeSet<u32>,
    pub purpose: AlliancePurpose,
    /// 0..100
    pub strength: f32,
    pub created_day: u32,
    pub broken: bool,
}

impl Alliance {
    pub fn new(
        alliance_id: impl Into<String>,
        members: impl IntoIterator<Item = u32>,
        purpose: AlliancePurpose,
        strength: f32,
        created_day: u32,
    ) -> Self {
        Self {
            alliance_id: alliance_id.into(),
            members: members.into_iter().collect(),
            purpose,
            strength: strength.clamp(0.0, 100.0),
            created_day,
            broken: false,
        }
    }

    /// Add a member. Only a genuinely new member strengthens the alliance.
    pub fn add_member(&mut self, id: u32) -> bool {
        if self.members.insert(id) {
            self.strength = (self.strength + JOIN_BONUS).min(100.0);
            true
        } else {
            false
        }
    }

    /// Remove a member; fewer than two members breaks the alliance
    pub fn remove_member(&mut self, id: u32) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.strength = (self.strength - LEAVE_PENALTY).max(0.0);
        if self.members.len() < 2 {
            self.broken = true;
        }
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.contains(&id)
    }

    pub fn is_active(&self) -> bool {
        !self.broken
    }
}

/// Resource: every alliance ever formed, in creation order
#[derive(Resource, Debug)]
pub struct AllianceRegistry {
    alliances: Vec<Alliance>,
    next_id: u64,
}

impl Default for AllianceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AllianceRegistry {
    pub fn new() -> Self {
        Self {
            alliances: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a new alliance and return its id
    pub fn create(
        &mut self,
        members: impl IntoIterator<Item = u32>,
        purpose: AlliancePurpose,
        strength: f32,
        day: u32,
    ) -> String {
        let alliance_id = format!("alliance_{:03}", self.next_id);
        self.next_id += 1;
        self.alliances
            .push(Alliance::new(alliance_id.clone(), members, purpose, strength, day));
        alliance_id
    }

    /// First active alliance containing either character
    pub fn find_for_either_mut(&mut self, a: u32, b: u32) -> Option<&mut Alliance> {
        self.alliances
            .iter_mut()
            .find(|al| al.is_active() && (al.contains(a) || al.contains(b)))
    }

    pub fn get(&self, alliance_id: &str) -> Option<&Alliance> {
        self.alliances.iter().find(|a| a.alliance_id == alliance_id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Alliance> {
        self.alliances.iter().filter(|a| a.is_active())
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Alliance> {
        self.alliances.iter_mut().filter(|a| a.is_active())
    }

    pub fn all(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn broken_count(&self) -> usize {
        self.alliances.iter().filter(|a| a.broken).count()
    }

    pub fn len(&self) -> usize {
        self.alliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_only_rewards_newcomers() {
        let mut alliance = Alliance::new("a", [1, 2], AlliancePurpose::SharedIdeology, 50.0, 1);
        assert!(alliance.add_member(3));
        assert!(!alliance.add_member(3));
        assert_eq!(alliance.strength, 55.0);
    }

    #[test]
    fn test_remove_member_breaks_small_alliance() {
        let mut alliance = Alliance::new("a", [1, 2, 3], AlliancePurpose::SharedIdentity, 50.0, 1);
        assert!(alliance.remove_member(3));
        assert!(!alliance.broken);
        assert_eq!(alliance.strength, 40.0);

        assert!(alliance.remove_member(2));
        assert!(alliance.broken);
        assert!(!alliance.remove_member(9));
    }

    #[test]
    fn test_registry_finds_active_alliance_of_either() {
        let mut registry = AllianceRegistry::new();
        let first = registry.create([1, 2], AlliancePurpose::SharedGrievances, 50.0, 1);
        assert_eq!(first, "alliance_001");

        let found = registry.find_for_either_mut(5, 2).map(|a| a.alliance_id.clone());
        assert_eq!(found.as_deref(), Some("alliance_001"));
        assert!(registry.find_for_either_mut(5, 6).is_none());

        if let Some(alliance) = registry.find_for_either_mut(1, 2) {
            alliance.broken = true;
        }
        assert!(registry.find_for_either_mut(1, 2).is_none());
        assert_eq!(registry.broken_count(), 1);
        assert_eq!(registry.active().count(), 0);
    }
}
