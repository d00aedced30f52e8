//! Memory Components
//!
//! Each character keeps a subjective record of what happened: the same event
//! is stored with a different interpretation and a different culprit depending
//! on who remembers it.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::character::{Mood, Psyche};

/// Share of a memory's emotional impact that turns into stress
pub const STRESS_PER_IMPACT: f32 = 0.5;

/// A single remembered event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub day: u32,
    /// What happened, as described at the time
    pub event: String,
    /// How this character made sense of it
    pub interpretation: String,
    pub emotional_impact: f32,
    /// Characters this one believes saw it happen
    pub witnesses: Vec<u32>,
    /// Characters this one holds responsible
    #[serde(default)]
    pub believed_responsible: BTreeSet<u32>,
}

impl Memory {
    pub fn new(
        day: u32,
        event: impl Into<String>,
        interpretation: impl Into<String>,
        emotional_impact: f32,
    ) -> Self {
        Self {
            day,
            event: event.into(),
            interpretation: interpretation.into(),
            emotional_impact,
            witnesses: Vec::new(),
            believed_responsible: BTreeSet::new(),
        }
    }

    pub fn with_witnesses(mut self, witnesses: Vec<u32>) -> Self {
        self.witnesses = witnesses;
        self
    }

    pub fn blaming(mut self, culprits: impl IntoIterator<Item = u32>) -> Self {
        self.believed_responsible.extend(culprits);
        self
    }
}

/// A character's memories, oldest first
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memories {
    pub memories: Vec<Memory>,
}

impl Memories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a memory; its emotional impact raises stress and, through
    /// the psyche's resilience, trauma.
    pub fn record(&mut self, memory: Memory, mood: &mut Mood, psyche: &mut Psyche) {
        mood.add_stress(memory.emotional_impact * STRESS_PER_IMPACT);
        psyche.absorb(memory.emotional_impact);
        self.memories.push(memory);
    }

    /// Memories whose event text contains the keyword (case-insensitive)
    pub fn recall(&self, keyword: &str) -> Vec<&Memory> {
        let needle = keyword.to_lowercase();
        self.memories
            .iter()
            .filter(|m| m.event.to_lowercase().contains(&needle))
            .collect()
    }

    /// How often each character has been blamed in this character's memories
    pub fn grievances(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for memory in &self.memories {
            for culprit in &memory.believed_responsible {
                *counts.entry(*culprit).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}
