//! Roster System
//!
//! Indexes characters by id so later systems can visit them in a stable
//! order, and tracks who currently commands the ship.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use crate::components::character::{Character, CharacterId, Role};

/// Resource: characters on board, ascending by id
#[derive(Resource, Debug, Default)]
pub struct Roster {
    entities: BTreeMap<u32, Entity>,
    captain: Option<u32>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn entity(&self, id: u32) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// Character ids in ascending order
    pub fn ids(&self) -> Vec<u32> {
        self.entities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Entity)> + '_ {
        self.entities.iter().map(|(&id, &e)| (id, e))
    }

    pub fn captain(&self) -> Option<u32> {
        self.captain
    }

    pub fn set_captain(&mut self, id: Option<u32>) {
        self.captain = id;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// System: rebuild the roster from the current entities
pub fn build_roster(
    mut roster: ResMut<Roster>,
    query: Query<(Entity, &CharacterId, &Role), With<Character>>,
) {
    roster.entities.clear();
    roster.captain = None;
    for (entity, id, role) in query.iter() {
        roster.entities.insert(id.0, entity);
        if role.is_captain() && roster.captain.map_or(true, |c| id.0 < c) {
            roster.captain = Some(id.0);
        }
    }
}
