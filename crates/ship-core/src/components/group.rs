//! Identity Groups
//!
//! Every identity group on board elects a spokesperson: the member with the
//! best combination of speaking ability and influence.

use bevy_ecs::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use super::character::GroupIdentity;

/// An identity group and its current voice
#[derive(Debug, Clone)]
pub struct Group {
    pub identity: GroupIdentity,
    pub members: BTreeSet<u32>,
    pub spokesperson: Option<u32>,
}

impl Group {
    pub fn new(identity: GroupIdentity) -> Self {
        Self {
            identity,
            members: BTreeSet::new(),
            spokesperson: None,
        }
    }

    pub fn add_member(&mut self, id: u32) {
        self.members.insert(id);
    }

    pub fn remove_member(&mut self, id: u32) {
        self.members.remove(&id);
        if self.spokesperson == Some(id) {
            self.spokesperson = None;
        }
    }

    /// Elect the member with the highest oratory score. Ties go to the lowest id.
    /// Members without a score are not eligible.
    pub fn elect_spokesperson(&mut self, oratory: &BTreeMap<u32, f32>) -> Option<u32> {
        let mut best: Option<(u32, f32)> = None;
        for id in &self.members {
            let Some(&score) = oratory.get(id) else {
                continue;
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*id, score));
            }
        }
        self.spokesperson = best.map(|(id, _)| id);
        self.spokesperson
    }
}

/// Resource: all identity groups
#[derive(Resource, Debug, Clone)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupIdentity, Group>,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry {
    /// One (empty) group per identity
    pub fn new() -> Self {
        Self {
            groups: GroupIdentity::all()
                .iter()
                .map(|identity| (*identity, Group::new(*identity)))
                .collect(),
        }
    }

    pub fn add_member(&mut self, identity: GroupIdentity, id: u32) {
        self.groups
            .entry(identity)
            .or_insert_with(|| Group::new(identity))
            .add_member(id);
    }

    pub fn get(&self, identity: GroupIdentity) -> Option<&Group> {
        self.groups.get(&identity)
    }

    pub fn all(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.groups.values_mut()
    }

    /// Distinct current spokespersons
    pub fn spokespersons(&self) -> BTreeSet<u32> {
        self.groups.values().filter_map(|g| g.spokesperson).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_has_no_spokesperson() {
        let mut group = Group::new(GroupIdentity::Workers);
        assert!(group.members.is_empty());
        assert_eq!(group.elect_spokesperson(&BTreeMap::new()), None);
    }

    #[test]
    fn test_elect_spokesperson_picks_best_orator() {
        let mut group = Group::new(GroupIdentity::Workers);
        group.add_member(1);
        group.add_member(2);
        let oratory = BTreeMap::from([(1, 100.0), (2, 160.0)]);
        assert_eq!(group.elect_spokesperson(&oratory), Some(2));
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let mut group = Group::new(GroupIdentity::Women);
        group.add_member(7);
        group.add_member(3);
        let oratory = BTreeMap::from([(3, 100.0), (7, 100.0)]);
        assert_eq!(group.elect_spokesperson(&oratory), Some(3));
    }

    #[test]
    fn test_registry_tracks_spokespersons() {
        let mut registry = GroupRegistry::new();
        registry.add_member(GroupIdentity::Workers, 3);
        registry.add_member(GroupIdentity::Indigenous, 3);
        registry.add_member(GroupIdentity::Authority, 1);
        let oratory = BTreeMap::from([(1, 170.0), (3, 90.0)]);
        for group in registry.all_mut() {
            group.elect_spokesperson(&oratory);
        }
        assert_eq!(registry.spokespersons(), BTreeSet::from([1, 3]));
        assert_eq!(registry.all().count(), GroupIdentity::all().len());
    }
}
