//! Event Types
//!
//! Everything that happens on board is recorded as a [`VoyageEvent`] and
//! appended to the voyage log as one JSON object per line.

use serde::{Deserialize, Serialize};

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Incident,
    Crisis,
    Interaction,
    Alliance,
    Discourse,
    Protest,
    Mutiny,
    Leadership,
    Sinking,
}

impl EventType {
    /// Returns the valid subtypes for this event type.
    pub fn valid_subtypes(&self) -> &'static [&'static str] {
        match self {
            EventType::Incident => &["theft", "fight", "accident", "dog_abuse", "scarcity", "ration_cut"],
            EventType::Crisis => &["food_shortage", "silent_rebellion", "engine_breakdown", "philosophical_dilemma"],
            EventType::Interaction => &["cooperate", "rebel"],
            EventType::Alliance => &["formed", "joined", "broken", "member_left"],
            EventType::Discourse => &["philosophical_discussion"],
            EventType::Protest => &["organized"],
            EventType::Mutiny => &["succeeded", "failed"],
            EventType::Leadership => &["spokesperson_elected", "captain_deposed"],
            EventType::Sinking => &["iceberg"],
        }
    }

    /// Checks if the given subtype is valid for this event type.
    pub fn is_valid_subtype(&self, subtype: &str) -> bool {
        self.valid_subtypes().contains(&subtype)
    }

    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::Incident,
            EventType::Crisis,
            EventType::Interaction,
            EventType::Alliance,
            EventType::Discourse,
            EventType::Protest,
            EventType::Mutiny,
            EventType::Leadership,
            EventType::Sinking,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Incident => "incident",
            EventType::Crisis => "crisis",
            EventType::Interaction => "interaction",
            EventType::Alliance => "alliance",
            EventType::Discourse => "discourse",
            EventType::Protest => "protest",
            EventType::Mutiny => "mutiny",
            EventType::Leadership => "leadership",
            EventType::Sinking => "sinking",
        }
    }
}

/// Common drama tags for categorizing events.
pub mod drama_tags {
    /// The captain is directly involved
    pub const CAPTAIN_INVOLVED: &str = "captain_involved";
    /// Event concerns the ship's physical danger
    pub const EXISTENTIAL_THREAT: &str = "existential_threat";
    /// Event pits authority against the crew
    pub const POWER_STRUGGLE: &str = "power_struggle";
    /// Event involves scarce supplies
    pub const RESOURCE_SCARCITY: &str = "resource_scarcity";
    /// Authority bought calm with a small concession
    pub const CONCESSION: &str = "concession";
    /// A warning about the real danger was dismissed
    pub const IGNORED_WARNING: &str = "ignored_warning";
    /// Crew members remember the event differently
    pub const CONFLICTING_NARRATIVES: &str = "conflicting_narratives";
    /// Ideologies clashed openly
    pub const IDEOLOGICAL_CLASH: &str = "ideological_clash";
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// A character taking part in an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRef {
    pub character_id: u32,
    pub name: String,
    pub role: String,
}

impl ActorRef {
    pub fn new(character_id: u32, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            character_id,
            name: name.into(),
            role: role.into(),
        }
    }
}

/// A named effect an event had, e.g. `trust: -5`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub kind: String,
    pub value: f32,
}

impl Impact {
    pub fn new(kind: impl Into<String>, value: f32) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// A single logged occurrence on the voyage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageEvent {
    pub event_id: String,
    pub day: u32,
    pub event_type: EventType,
    pub subtype: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<ActorRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impacts: Vec<Impact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drama_tags: Vec<String>,
}

impl VoyageEvent {
    pub fn new(
        event_id: impl Into<String>,
        day: u32,
        event_type: EventType,
        subtype: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            day,
            event_type,
            subtype: subtype.into(),
            description: description.into(),
            actors: Vec::new(),
            affected_groups: Vec::new(),
            impacts: Vec::new(),
            outcome: None,
            drama_tags: Vec::new(),
        }
    }

    pub fn with_actor(mut self, actor: ActorRef) -> Self {
        self.actors.push(actor);
        self
    }

    pub fn with_actors(mut self, actors: impl IntoIterator<Item = ActorRef>) -> Self {
        self.actors.extend(actors);
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.affected_groups.extend(groups);
        self
    }

    pub fn with_impacts(mut self, impacts: impl IntoIterator<Item = Impact>) -> Self {
        self.impacts.extend(impacts);
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        if !self.has_tag(tag) {
            self.drama_tags.push(tag.to_string());
        }
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.drama_tags.iter().any(|t| t == tag)
    }

    /// Whether the given character appears among the actors
    pub fn involves(&self, character_id: u32) -> bool {
        self.actors.iter().any(|a| a.character_id == character_id)
    }

    /// Sum of all impact values; its magnitude is the emotional weight of the event
    pub fn total_impact(&self) -> f32 {
        self.impacts.iter().map(|i| i.value).sum()
    }
}
