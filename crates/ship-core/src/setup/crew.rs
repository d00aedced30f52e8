//! Crew Setup
//!
//! The ten characters on board: who they are, what they need, and how they
//! start out feeling. Personality, background and resilience are drawn from
//! the seeded generator.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::components::character::{
    Allies, Background, BeliefSystem, Character, CharacterBundle, CharacterId, CharacterName,
    Dispositions, Emotions, Gender, GroupIdentity, Groups, HiddenAgenda, Ideology, Mood, Needs,
    Personality, Psyche, Role, SocialClass, Standing, Wellbeing,
};
use crate::components::group::GroupRegistry;
use crate::components::memory::Memories;
use crate::components::social::{RelationshipGraph, RelationshipType};
use crate::systems::roster::Roster;

/// Food every character starts the voyage with
pub const STARTING_RATIONS: f32 = 60.0;

/// Fixed description of one crew member
#[derive(Debug, Clone, Copy)]
pub struct CrewTemplate {
    pub id: u32,
    pub name: &'static str,
    pub role: Role,
    pub groups: &'static [GroupIdentity],
    pub ideology: Ideology,
    pub needs: &'static [(&'static str, f32)],
    pub stress: f32,
    pub influence: f32,
    pub speaking_ability: f32,
}

pub const MANIFEST: [CrewTemplate; 10] = [
    CrewTemplate {
        id: 1,
        name: "Captain",
        role: Role::Captain,
        groups: &[GroupIdentity::Authority],
        ideology: Ideology::Authoritarian,
        needs: &[("power", 90.0), ("respect", 80.0)],
        stress: 20.0,
        influence: 90.0,
        speaking_ability: 80.0,
    },
    CrewTemplate {
        id: 2,
        name: "Third Officer",
        role: Role::Officer,
        groups: &[GroupIdentity::Authority],
        ideology: Ideology::Liberal,
        needs: &[("power", 70.0), ("manipulation", 80.0)],
        stress: 15.0,
        influence: 70.0,
        speaking_ability: 85.0,
    },
    CrewTemplate {
        id: 3,
        name: "English Sailor",
        role: Role::Worker,
        groups: &[GroupIdentity::Workers],
        ideology: Ideology::Reformist,
        needs: &[("wage", 40.0), ("safety", 50.0), ("warmth", 45.0)],
        stress: 60.0,
        influence: 40.0,
        speaking_ability: 50.0,
    },
    CrewTemplate {
        id: 4,
        name: "Mexican Sailor",
        role: Role::Worker,
        groups: &[GroupIdentity::Workers, GroupIdentity::Indigenous],
        ideology: Ideology::Revolutionary,
        needs: &[("wage", 25.0), ("equality", 20.0), ("language_rights", 30.0)],
        stress: 70.0,
        influence: 35.0,
        speaking_ability: 45.0,
    },
    CrewTemplate {
        id: 5,
        name: "Woman Passenger",
        role: Role::Passenger,
        groups: &[GroupIdentity::Women],
        ideology: Ideology::Liberal,
        needs: &[("warmth", 30.0), ("equality", 40.0), ("safety", 60.0)],
        stress: 65.0,
        influence: 45.0,
        speaking_ability: 60.0,
    },
    CrewTemplate {
        id: 6,
        name: "Native Sailor",
        role: Role::Worker,
        groups: &[GroupIdentity::Indigenous, GroupIdentity::Workers],
        ideology: Ideology::Revolutionary,
        needs: &[("reparations", 10.0), ("autonomy", 20.0), ("wage", 35.0)],
        stress: 75.0,
        influence: 30.0,
        speaking_ability: 40.0,
    },
    CrewTemplate {
        id: 7,
        name: "Boatswain (Lostromo)",
        role: Role::Worker,
        groups: &[GroupIdentity::Lgbtq, GroupIdentity::Workers],
        ideology: Ideology::Liberal,
        needs: &[("dignity", 40.0), ("acceptance", 35.0), ("wage", 45.0)],
        stress: 68.0,
        influence: 38.0,
        speaking_ability: 55.0,
    },
    CrewTemplate {
        id: 8,
        name: "Animal Rights Activist",
        role: Role::Passenger,
        groups: &[GroupIdentity::Religious],
        ideology: Ideology::Liberal,
        needs: &[("animal_welfare", 25.0), ("morality", 50.0)],
        stress: 72.0,
        influence: 25.0,
        speaking_ability: 65.0,
    },
    CrewTemplate {
        id: 9,
        name: "Professor",
        role: Role::Intellectual,
        groups: &[GroupIdentity::Authority],
        ideology: Ideology::Revolutionary,
        needs: &[("justice", 30.0), ("revolution", 40.0)],
        stress: 55.0,
        influence: 60.0,
        speaking_ability: 90.0,
    },
    CrewTemplate {
        id: 10,
        name: "Steward",
        role: Role::Steward,
        groups: &[GroupIdentity::Workers],
        ideology: Ideology::Anarchist,
        needs: &[("survival", 70.0), ("truth", 60.0)],
        stress: 80.0,
        influence: 20.0,
        speaking_ability: 70.0,
    },
];

/// Relationships already in place when the voyage begins
pub const INITIAL_RELATIONSHIPS: [(u32, u32, f32, RelationshipType); 3] = [
    (1, 2, 0.8, RelationshipType::Friendship),
    (3, 4, 0.2, RelationshipType::Conflict),
    (1, 5, 0.5, RelationshipType::Neutral),
];

const GENDERS: [Gender; 3] = [Gender::Male, Gender::Female, Gender::NonBinary];
const CLASSES: [SocialClass; 3] = [SocialClass::Low, SocialClass::Middle, SocialClass::High];
const BELIEFS: [BeliefSystem; 5] = [
    BeliefSystem::Atheism,
    BeliefSystem::Theism,
    BeliefSystem::Spirituality,
    BeliefSystem::Agnosticism,
    BeliefSystem::None,
];
const AGENDAS: [HiddenAgenda; 5] = [
    HiddenAgenda::SeekPower,
    HiddenAgenda::FindLove,
    HiddenAgenda::Survive,
    HiddenAgenda::CreateChaos,
    HiddenAgenda::None,
];

fn trait_value(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.1..1.0)
}

pub fn random_personality(rng: &mut impl Rng) -> Personality {
    Personality {
        openness: trait_value(rng),
        conscientiousness: trait_value(rng),
        extraversion: trait_value(rng),
        agreeableness: trait_value(rng),
        neuroticism: trait_value(rng),
    }
}

pub fn random_background(rng: &mut impl Rng) -> Background {
    Background {
        gender: *GENDERS.choose(rng).unwrap_or(&Gender::NonBinary),
        age: rng.gen_range(20..=60),
        social_class: *CLASSES.choose(rng).unwrap_or(&SocialClass::Middle),
        belief_system: *BELIEFS.choose(rng).unwrap_or(&BeliefSystem::None),
    }
}

impl CrewTemplate {
    /// Build the full component bundle, rolling the random parts
    pub fn bundle(&self, rng: &mut impl Rng) -> CharacterBundle {
        let mut needs = self
            .needs
            .iter()
            .fold(Needs::new(), |needs, (name, value)| needs.with(*name, *value));
        if !needs.has("food") {
            needs = needs.with("food", STARTING_RATIONS);
        }

        let personality = random_personality(rng);
        let psyche = Psyche::new(trait_value(rng));
        let agenda = *AGENDAS.choose(rng).unwrap_or(&HiddenAgenda::None);
        let background = random_background(rng);

        CharacterBundle {
            marker: Character,
            id: CharacterId(self.id),
            name: CharacterName(self.name.to_string()),
            role: self.role,
            ideology: self.ideology,
            groups: Groups::new(self.groups.iter().copied()),
            needs,
            mood: Mood::new(self.stress),
            standing: Standing::new(self.influence, self.speaking_ability),
            personality,
            emotions: Emotions::default(),
            wellbeing: Wellbeing::default(),
            dispositions: Dispositions::default(),
            psyche,
            agenda,
            background,
            memories: Memories::new(),
            allies: Allies::default(),
        }
    }
}

/// Spawn the crew, register them with the roster, graph and groups, and hold
/// the first spokesperson election.
///
/// Expects `Roster`, `RelationshipGraph` and `GroupRegistry` to be present.
pub fn spawn_crew(world: &mut World, crew: &[CrewTemplate], rng: &mut impl Rng) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(crew.len());

    for template in crew {
        let entity = world.spawn(template.bundle(rng)).id();
        debug!(character = template.id, name = template.name, "boarded");

        world.resource_mut::<RelationshipGraph>().add_character(template.id);
        {
            let mut groups = world.resource_mut::<GroupRegistry>();
            for identity in template.groups {
                groups.add_member(*identity, template.id);
            }
        }
        let mut roster = world.resource_mut::<Roster>();
        roster.insert(template.id, entity);
        if template.role == Role::Captain && roster.captain().is_none() {
            roster.set_captain(Some(template.id));
        }
        entities.push(entity);
    }

    {
        let mut graph = world.resource_mut::<RelationshipGraph>();
        for (a, b, strength, kind) in INITIAL_RELATIONSHIPS {
            if graph.contains(a) && graph.contains(b) {
                graph.add_relationship(a, b, strength, kind);
            }
        }
    }

    let oratory: BTreeMap<u32, f32> = crew
        .iter()
        .map(|t| (t.id, t.speaking_ability + t.influence))
        .collect();
    let spokespersons = {
        let mut groups = world.resource_mut::<GroupRegistry>();
        for group in groups.all_mut() {
            group.elect_spokesperson(&oratory);
        }
        groups.spokespersons()
    };
    for (template, entity) in crew.iter().zip(&entities) {
        if let Some(mut standing) = world.get_mut::<Standing>(*entity) {
            standing.is_spokesperson = spokespersons.contains(&template.id);
        }
    }

    info!(crew = entities.len(), spokespersons = spokespersons.len(), "crew boarded");
    entities
}
