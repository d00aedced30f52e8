//! Character Components
//!
//! Components for individual characters: identity, needs, mood, personality,
//! emotions and psychological state.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::memory::Memories;

/// Marker component identifying an entity as a character aboard the ship
#[derive(Component, Debug, Clone, Default)]
pub struct Character;

/// Unique identifier for a character
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

/// Human-readable name for a character
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct CharacterName(pub String);

/// Position in the ship's hierarchy
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Captain,
    Officer,
    Worker,
    Passenger,
    Intellectual,
    Steward,
    /// A former captain stripped of command
    Deposed,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Captain => "captain",
            Role::Officer => "officer",
            Role::Worker => "worker",
            Role::Passenger => "passenger",
            Role::Intellectual => "intellectual",
            Role::Steward => "steward",
            Role::Deposed => "deposed",
        }
    }

    pub fn is_captain(&self) -> bool {
        matches!(self, Role::Captain)
    }
}

/// Political outlook, which colours how a character interprets events
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ideology {
    Authoritarian,
    Reformist,
    Revolutionary,
    Conservative,
    Liberal,
    Anarchist,
}

impl Ideology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ideology::Authoritarian => "authoritarian",
            Ideology::Reformist => "reformist",
            Ideology::Revolutionary => "revolutionary",
            Ideology::Conservative => "conservative",
            Ideology::Liberal => "liberal",
            Ideology::Anarchist => "anarchist",
        }
    }

    /// Ideologies willing to overthrow the captain
    pub fn is_radical(&self) -> bool {
        matches!(self, Ideology::Revolutionary | Ideology::Anarchist)
    }
}

/// Social identity groups a character can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupIdentity {
    Authority,
    Workers,
    Women,
    Lgbtq,
    Religious,
    Indigenous,
    Merchants,
}

impl GroupIdentity {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupIdentity::Authority => "authority",
            GroupIdentity::Workers => "workers",
            GroupIdentity::Women => "women",
            GroupIdentity::Lgbtq => "lgbtq",
            GroupIdentity::Religious => "religious",
            GroupIdentity::Indigenous => "indigenous",
            GroupIdentity::Merchants => "merchants",
        }
    }

    pub fn all() -> &'static [GroupIdentity] {
        &[
            GroupIdentity::Authority,
            GroupIdentity::Workers,
            GroupIdentity::Women,
            GroupIdentity::Lgbtq,
            GroupIdentity::Religious,
            GroupIdentity::Indigenous,
            GroupIdentity::Merchants,
        ]
    }
}

/// The identity groups a character belongs to
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Groups(pub BTreeSet<GroupIdentity>);

impl Groups {
    pub fn new(groups: impl IntoIterator<Item = GroupIdentity>) -> Self {
        Self(groups.into_iter().collect())
    }

    pub fn contains(&self, identity: GroupIdentity) -> bool {
        self.0.contains(&identity)
    }

    pub fn shares_any(&self, other: &Groups) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    /// Whether any of the given identities is one of ours
    pub fn intersects(&self, identities: &[GroupIdentity]) -> bool {
        identities.iter().any(|g| self.0.contains(g))
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|g| g.as_str().to_string()).collect()
    }
}

/// Value below which a need counts as critical
pub const DEFAULT_CRITICAL_THRESHOLD: f32 = 30.0;

/// A single named need, 0 (deprived) to 100 (satisfied)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub value: f32,
    pub critical_threshold: f32,
}

impl Need {
    pub fn new(value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 100.0),
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.value < self.critical_threshold
    }
}

/// Named needs of a character ("warmth", "wage", "dignity", ...)
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Needs {
    pub needs: BTreeMap<String, Need>,
}

impl Needs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.needs.insert(name.into(), Need::new(value));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.needs.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.needs.get(name).map(|n| n.value)
    }

    /// Adjust a single need, clamped to 0..100. Unknown needs are ignored.
    pub fn adjust(&mut self, name: &str, delta: f32) -> bool {
        match self.needs.get_mut(name) {
            Some(need) => {
                need.value = (need.value + delta).clamp(0.0, 100.0);
                true
            }
            None => false,
        }
    }

    /// Apply several changes at once
    pub fn update(&mut self, changes: &[(&str, f32)]) {
        for (name, delta) in changes {
            self.adjust(name, *delta);
        }
    }

    /// Names of needs below their critical threshold
    pub fn critical(&self) -> Vec<String> {
        self.needs
            .iter()
            .filter(|(_, need)| need.is_critical())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn has_critical(&self) -> bool {
        self.needs.values().any(Need::is_critical)
    }

    /// Mean need value, 50 when the character has no needs
    pub fn satisfaction(&self) -> f32 {
        if self.needs.is_empty() {
            return 50.0;
        }
        self.needs.values().map(|n| n.value).sum::<f32>() / self.needs.len() as f32
    }

    /// The least satisfied need
    pub fn lowest(&self) -> Option<&str> {
        self.needs
            .iter()
            .min_by(|a, b| {
                a.1.value
                    .partial_cmp(&b.1.value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(name, _)| name.as_str())
    }
}

/// Stress and faith in the captain, both 0..100
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Mood {
    pub stress: f32,
    pub trust_in_captain: f32,
}

impl Default for Mood {
    fn default() -> Self {
        Self {
            stress: 50.0,
            trust_in_captain: 70.0,
        }
    }
}

impl Mood {
    pub fn new(stress: f32) -> Self {
        Self {
            stress: stress.clamp(0.0, 100.0),
            ..Default::default()
        }
    }

    pub fn add_stress(&mut self, delta: f32) {
        self.stress = (self.stress + delta).clamp(0.0, 100.0);
    }

    pub fn adjust_trust(&mut self, delta: f32) {
        self.trust_in_captain = (self.trust_in_captain + delta).clamp(0.0, 100.0);
    }
}

/// How much weight a character carries in public life
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub influence: f32,
    pub speaking_ability: f32,
    pub is_spokesperson: bool,
}

impl Default for Standing {
    fn default() -> Self {
        Self {
            influence: 50.0,
            speaking_ability: 50.0,
            is_spokesperson: false,
        }
    }
}

impl Standing {
    pub fn new(influence: f32, speaking_ability: f32) -> Self {
        Self {
            influence,
            speaking_ability,
            is_spokesperson: false,
        }
    }

    pub fn adjust_influence(&mut self, delta: f32) {
        self.influence = (self.influence + delta).clamp(0.0, 100.0);
    }

    /// Score used when a group picks its spokesperson
    pub fn oratory(&self) -> f32 {
        self.speaking_ability + self.influence
    }
}

/// Big Five personality traits - fixed at creation
/// All values are 0.0 to 1.0
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Personality {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            openness: 0.5,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.5,
            neuroticism: 0.5,
        }
    }
}

/// Current emotions, each 0.0 to 1.0
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Emotions {
    pub anger: f32,
    pub hope: f32,
    pub fear: f32,
    pub happiness: f32,
}

impl Emotions {
    pub fn raise_anger(&mut self, delta: f32) {
        self.anger = (self.anger + delta).clamp(0.0, 1.0);
    }

    pub fn raise_hope(&mut self, delta: f32) {
        self.hope = (self.hope + delta).clamp(0.0, 1.0);
    }

    pub fn raise_happiness(&mut self, delta: f32) {
        self.happiness = (self.happiness + delta).clamp(0.0, 1.0);
    }
}

/// Broad wellbeing, 0.0 (depleted) to 1.0 (fulfilled); decays every day
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Wellbeing {
    pub physiological: f32,
    pub social: f32,
    pub psychological: f32,
}

impl Default for Wellbeing {
    fn default() -> Self {
        Self {
            physiological: 1.0,
            social: 1.0,
            psychological: 1.0,
        }
    }
}

impl Wellbeing {
    pub fn decay(&mut self, amount: f32) {
        self.physiological = (self.physiological - amount).max(0.0);
        self.social = (self.social - amount).max(0.0);
        self.psychological = (self.psychological - amount).max(0.0);
    }

    pub fn restore_social(&mut self, amount: f32) {
        self.social = (self.social + amount).clamp(0.0, 1.0);
    }
}

/// Leanings pushed around by crises, fading back toward zero
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dispositions {
    pub cooperation_bias: f32,
    pub rebellion_bias: f32,
}

impl Dispositions {
    pub fn shift_cooperation(&mut self, delta: f32) {
        self.cooperation_bias = (self.cooperation_bias + delta).clamp(0.0, 1.0);
    }

    pub fn shift_rebellion(&mut self, delta: f32) {
        self.rebellion_bias = (self.rebellion_bias + delta).clamp(0.0, 1.0);
    }

    pub fn fade(&mut self, factor: f32) {
        self.cooperation_bias *= factor;
        self.rebellion_bias *= factor;
    }
}

/// Overall psychological state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PsychologicalState {
    #[default]
    Normal,
    Angry,
    Depressed,
    Cooperative,
    Paranoid,
}

impl PsychologicalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PsychologicalState::Normal => "normal",
            PsychologicalState::Angry => "angry",
            PsychologicalState::Depressed => "depressed",
            PsychologicalState::Cooperative => "cooperative",
            PsychologicalState::Paranoid => "paranoid",
        }
    }

    /// Derive the state from accumulated trauma, emotions and wellbeing
    pub fn evaluate(trauma: f32, emotions: &Emotions, wellbeing: &Wellbeing) -> Self {
        if trauma > 0.8 {
            PsychologicalState::Paranoid
        } else if emotions.anger > 0.7 && wellbeing.social < 0.3 {
            PsychologicalState::Angry
        } else if emotions.fear > 0.6 && emotions.hope < 0.3 {
            PsychologicalState::Depressed
        } else if emotions.happiness > 0.7 && wellbeing.social > 0.7 {
            PsychologicalState::Cooperative
        } else {
            PsychologicalState::Normal
        }
    }
}

/// Psychological condition: state, accumulated trauma and resilience
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Psyche {
    pub state: PsychologicalState,
    /// 0.0 to 1.0
    pub trauma: f32,
    /// 0.0 to 1.0, dampens trauma from distressing memories
    pub resilience: f32,
}

impl Default for Psyche {
    fn default() -> Self {
        Self {
            state: PsychologicalState::Normal,
            trauma: 0.0,
            resilience: 0.5,
        }
    }
}

impl Psyche {
    pub fn new(resilience: f32) -> Self {
        Self {
            resilience: resilience.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Accumulate trauma from an event of the given emotional impact (0..100 scale)
    pub fn absorb(&mut self, emotional_impact: f32) {
        let dose = (emotional_impact / 100.0) * (1.0 - self.resilience);
        self.trauma = (self.trauma + dose).clamp(0.0, 1.0);
    }
}

/// Secret motivation steering decisions
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAgenda {
    SeekPower,
    FindLove,
    Survive,
    CreateChaos,
    #[default]
    None,
}

impl HiddenAgenda {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenAgenda::SeekPower => "seek_power",
            HiddenAgenda::FindLove => "find_love",
            HiddenAgenda::Survive => "survive",
            HiddenAgenda::CreateChaos => "create_chaos",
            HiddenAgenda::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialClass {
    Low,
    Middle,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefSystem {
    Atheism,
    Theism,
    Spirituality,
    Agnosticism,
    None,
}

/// Descriptive background, fixed at creation
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub gender: Gender,
    pub age: u32,
    pub social_class: SocialClass,
    pub belief_system: BeliefSystem,
}

/// Ids of the characters this one considers allies
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Allies(pub BTreeSet<u32>);

impl Allies {
    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn add(&mut self, id: u32) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: u32) -> bool {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a character entity is spawned with
#[derive(Bundle)]
pub struct CharacterBundle {
    pub marker: Character,
    pub id: CharacterId,
    pub name: CharacterName,
    pub role: Role,
    pub ideology: Ideology,
    pub groups: Groups,
    pub needs: Needs,
    pub mood: Mood,
    pub standing: Standing,
    pub personality: Personality,
    pub emotions: Emotions,
    pub wellbeing: Wellbeing,
    pub dispositions: Dispositions,
    pub psyche: Psyche,
    pub agenda: HiddenAgenda,
    pub background: Background,
    pub memories: Memories,
    pub allies: Allies,
}
