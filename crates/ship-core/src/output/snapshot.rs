//! Snapshot Generation
//!
//! Captures the ship, crew, alliances, groups and relationships on a given
//! day and writes them out as pretty JSON.

use bevy_ecs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::components::alliance::AllianceRegistry;
use crate::components::character::{
    Allies, CharacterId, CharacterName, Emotions, Groups, HiddenAgenda, Ideology, Mood, Needs,
    Psyche, Role, Standing,
};
use crate::components::group::GroupRegistry;
use crate::components::memory::Memories;
use crate::components::ship::ShipState;
use crate::components::social::RelationshipGraph;
use crate::error::Result;
use crate::events::{
    generate_snapshot_id, AllianceSnapshot, CharacterSnapshot, EmotionsSnapshot, GroupSnapshot,
    RelationshipSnapshot, ShipStateSnapshot, VoyageSnapshot,
};
use crate::systems::roster::Roster;

/// Resource to track snapshot generation
#[derive(Resource, Debug)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u32,
}

impl SnapshotGenerator {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    pub fn should_snapshot(&self, day: u32) -> bool {
        day % self.snapshot_interval == 0
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Generate a complete voyage snapshot with the next snapshot id
pub fn generate_snapshot(world: &mut World, triggered_by: &str) -> VoyageSnapshot {
    let snapshot_id = world.resource_mut::<SnapshotGenerator>().next_id();
    capture(world, snapshot_id, triggered_by)
}

/// Capture the current state under the given id
pub fn capture(world: &mut World, snapshot_id: String, triggered_by: &str) -> VoyageSnapshot {
    let ship = world.resource::<ShipState>();
    let captain = world.resource::<Roster>().captain();
    let mut snapshot = VoyageSnapshot::new(snapshot_id, ship.day, triggered_by);
    snapshot.ship = ShipStateSnapshot {
        day: ship.day,
        heading: ship.heading,
        temperature: ship.temperature,
        danger_level: ship.danger_level,
        captain_authority: ship.captain_authority,
        social_cohesion: ship.social_cohesion,
        philosophical_tension: ship.philosophical_tension,
        sunk: ship.sunk,
        captain,
    };

    {
        let mut query = world.query::<(
            &CharacterId,
            &CharacterName,
            &Role,
            &Ideology,
            &Groups,
            &Needs,
            &Mood,
            &Standing,
            &Psyche,
            &Emotions,
            &HiddenAgenda,
            &Allies,
            &Memories,
        )>();

        for (id, name, role, ideology, groups, needs, mood, standing, psyche, emotions, agenda, allies, memories) in
            query.iter(world)
        {
            snapshot.characters.push(CharacterSnapshot {
                character_id: id.0,
                name: name.0.clone(),
                role: role.as_str().to_string(),
                ideology: ideology.as_str().to_string(),
                groups: groups.names(),
                needs: needs
                    .needs
                    .iter()
                    .map(|(need, value)| (need.clone(), value.value))
                    .collect(),
                critical_needs: needs.critical(),
                satisfaction: needs.satisfaction(),
                stress: mood.stress,
                trust_in_captain: mood.trust_in_captain,
                influence: standing.influence,
                speaking_ability: standing.speaking_ability,
                is_spokesperson: standing.is_spokesperson,
                psychological_state: psyche.state.as_str().to_string(),
                emotions: EmotionsSnapshot {
                    anger: emotions.anger,
                    hope: emotions.hope,
                    fear: emotions.fear,
                    happiness: emotions.happiness,
                },
                hidden_agenda: agenda.as_str().to_string(),
                allies: allies.0.iter().copied().collect(),
                memory_count: memories.len(),
            });
        }
    }
    snapshot.characters.sort_by_key(|c| c.character_id);

    snapshot.alliances = world
        .resource::<AllianceRegistry>()
        .all()
        .iter()
        .map(|alliance| AllianceSnapshot {
            alliance_id: alliance.alliance_id.clone(),
            members: alliance.members.iter().copied().collect(),
            purpose: alliance.purpose.as_str().to_string(),
            strength: alliance.strength,
            created_day: alliance.created_day,
            broken: alliance.broken,
        })
        .collect();

    snapshot.groups = world
        .resource::<GroupRegistry>()
        .all()
        .filter(|group| !group.members.is_empty())
        .map(|group| GroupSnapshot {
            identity: group.identity.as_str().to_string(),
            members: group.members.iter().copied().collect(),
            spokesperson: group.spokesperson,
        })
        .collect();

    snapshot.relationships = world
        .resource::<RelationshipGraph>()
        .edges()
        .map(|(a, b, rel)| RelationshipSnapshot {
            a,
            b,
            strength: rel.strength,
            relationship_type: rel.relationship_type.as_str().to_string(),
        })
        .collect();

    snapshot
}

/// Write a snapshot as `<dir>/<snapshot_id>.json`, creating the directory if needed
pub fn write_snapshot(dir: &Path, snapshot: &VoyageSnapshot) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json)?;
    Ok(path)
}
