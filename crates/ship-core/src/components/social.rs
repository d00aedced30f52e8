//! Social Graph
//!
//! Undirected weighted graph of relationships between characters. Edge
//! strength runs from 0.0 to 1.0 and each edge carries a relationship type.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Nature of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Friendship,
    Conflict,
    Romantic,
    #[default]
    Neutral,
    Alliance,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Friendship => "friendship",
            RelationshipType::Conflict => "conflict",
            RelationshipType::Romantic => "romantic",
            RelationshipType::Neutral => "neutral",
            RelationshipType::Alliance => "alliance",
        }
    }
}

/// Kinds of interaction that reshape a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Cooperation,
    Conflict,
}

impl Interaction {
    /// Type a neutral relationship turns into after this interaction
    pub fn resulting_type(&self) -> RelationshipType {
        match self {
            Interaction::Cooperation => RelationshipType::Friendship,
            Interaction::Conflict => RelationshipType::Conflict,
        }
    }
}

/// A single edge of the graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub strength: f32,
    pub relationship_type: RelationshipType,
}

/// Resource: the crew's social network
#[derive(Resource, Debug, Clone)]
pub struct RelationshipGraph {
    nodes: BTreeSet<u32>,
    /// Keyed by (lower id, higher id)
    edges: BTreeMap<(u32, u32), Relationship>,
    cooperation_delta: f32,
    conflict_delta: f32,
}

impl Default for RelationshipGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::with_deltas(0.2, -0.3)
    }

    /// Graph whose interactions move strength by the given amounts
    pub fn with_deltas(cooperation_delta: f32, conflict_delta: f32) -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
            cooperation_delta,
            conflict_delta,
        }
    }

    /// Add a character as a node. Returns false if already present.
    pub fn add_character(&mut self, id: u32) -> bool {
        if !self.nodes.insert(id) {
            tracing::warn!(character = id, "character already in the social graph");
            return false;
        }
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.nodes.contains(&id)
    }

    /// Add or overwrite a relationship. Both characters must be nodes.
    pub fn add_relationship(
        &mut self,
        a: u32,
        b: u32,
        strength: f32,
        relationship_type: RelationshipType,
    ) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            tracing::error!(a, b, "cannot relate characters missing from the social graph");
            return false;
        }
        self.edges.insert(
            edge_key(a, b),
            Relationship {
                strength: strength.clamp(0.0, 1.0),
                relationship_type,
            },
        );
        true
    }

    pub fn get(&self, a: u32, b: u32) -> Option<&Relationship> {
        self.edges.get(&edge_key(a, b))
    }

    /// Strengthen or weaken a relationship after an interaction.
    ///
    /// Neutral relationships take on the interaction's type. A missing edge
    /// is created with the (clamped) delta as its strength.
    pub fn update_relationship(&mut self, a: u32, b: u32, interaction: Interaction) {
        let delta = match interaction {
            Interaction::Cooperation => self.cooperation_delta,
            Interaction::Conflict => self.conflict_delta,
        };

        match self.edges.get_mut(&edge_key(a, b)) {
            Some(rel) => {
                rel.strength = (rel.strength + delta).clamp(0.0, 1.0);
                if rel.relationship_type == RelationshipType::Neutral {
                    rel.relationship_type = interaction.resulting_type();
                }
            }
            None => {
                self.add_relationship(a, b, delta.clamp(0.0, 1.0), interaction.resulting_type());
            }
        }
    }

    /// Weaken every relationship; edges that reach zero are removed and returned
    pub fn decay(&mut self, rate: f32) -> Vec<(u32, u32)> {
        let mut removed = Vec::new();
        for (key, rel) in self.edges.iter_mut() {
            rel.strength = (rel.strength - rate).max(0.0);
            if rel.strength <= 0.0 {
                removed.push(*key);
            }
        }
        for key in &removed {
            self.edges.remove(key);
        }
        removed
    }

    /// All relationships of a character, by neighbour id
    pub fn relationships_of(&self, id: u32) -> BTreeMap<u32, Relationship> {
        self.edges
            .iter()
            .filter_map(|(&(a, b), rel)| {
                if a == id {
                    Some((b, *rel))
                } else if b == id {
                    Some((a, *rel))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn degree(&self, id: u32) -> usize {
        self.edges.keys().filter(|(a, b)| *a == id || *b == id).count()
    }

    /// Character with the highest degree + extraversion score.
    /// Ties go to the lowest id.
    pub fn most_influential(&self, extraversion: &BTreeMap<u32, f32>) -> Option<u32> {
        self.rank_influence(extraversion, None)
    }

    /// Like [`most_influential`](Self::most_influential), never returning `exclude`
    pub fn most_influential_other(&self, extraversion: &BTreeMap<u32, f32>, exclude: u32) -> Option<u32> {
        self.rank_influence(extraversion, Some(exclude))
    }

    fn rank_influence(&self, extraversion: &BTreeMap<u32, f32>, exclude: Option<u32>) -> Option<u32> {
        let mut best: Option<(u32, f32)> = None;
        for &id in &self.nodes {
            if Some(id) == exclude {
                continue;
            }
            let score = self.degree(id) as f32 + extraversion.get(&id).copied().unwrap_or(0.0);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, &Relationship)> {
        self.edges.iter().map(|(&(a, b), rel)| (a, b, rel))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
