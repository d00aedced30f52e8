//! Decision System
//!
//! Each day every character weighs four courses of action and takes the
//! strongest. Cooperation and rebellion go through the social graph.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::debug;

use crate::components::character::{
    CharacterId, CharacterName, Dispositions, Emotions, HiddenAgenda, Mood, Needs, Personality,
    PsychologicalState, Psyche, Role, Standing, Wellbeing,
};
use crate::components::ship::ShipState;
use crate::components::social::{Interaction, RelationshipGraph};
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// Constants for decision scoring and effects
pub mod decision_constants {
    pub const ANGRY_REBEL_BONUS: f32 = 0.5;
    pub const DEPRESSED_COOPERATION_PENALTY: f32 = 0.3;
    pub const COOPERATIVE_BONUS: f32 = 0.7;
    pub const SEEK_POWER_REBEL_BONUS: f32 = 0.5;
    pub const SEEK_POWER_COOPERATION_PENALTY: f32 = 0.3;
    pub const SURVIVE_RESOURCE_BONUS: f32 = 0.7;

    /// Happiness gained per point of agreeableness when cooperating
    pub const COOPERATION_HAPPINESS: f32 = 0.1;
    pub const COOPERATION_SOCIAL: f32 = 0.1;
    /// Anger gained per point of neuroticism when clashing
    pub const CONFLICT_ANGER: f32 = 0.2;
    pub const DEFIANCE_TRUST_LOSS: f32 = 3.0;
    pub const DEFIANCE_AUTHORITY_LOSS: f32 = 0.5;
    pub const RISK_INFLUENCE: f32 = 1.0;
    pub const RISK_STRESS: f32 = 2.0;
    pub const FORAGE_GAIN: f32 = 5.0;
}

use decision_constants::*;

/// The four courses of action open to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Cooperate,
    Rebel,
    TakeRisk,
    SeekResources,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Cooperate => "cooperate",
            Decision::Rebel => "rebel",
            Decision::TakeRisk => "take_risk",
            Decision::SeekResources => "seek_resources",
        }
    }
}

/// Inputs to a character's daily choice
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    pub personality: &'a Personality,
    pub emotions: &'a Emotions,
    pub wellbeing: &'a Wellbeing,
    pub dispositions: &'a Dispositions,
    pub state: PsychologicalState,
    pub agenda: HiddenAgenda,
}

/// Score each course of action
pub fn score_decisions(inputs: &DecisionInputs) -> [(Decision, f32); 4] {
    let p = inputs.personality;
    let mut cooperate = p.agreeableness + inputs.dispositions.cooperation_bias;
    let mut rebel = inputs.emotions.anger * (1.0 + p.neuroticism) + inputs.dispositions.rebellion_bias;
    let take_risk = p.openness * (1.0 - p.conscientiousness);
    let mut seek_resources = 1.0 - inputs.wellbeing.physiological;

    match inputs.state {
        PsychologicalState::Angry => rebel += ANGRY_REBEL_BONUS,
        PsychologicalState::Depressed => cooperate -= DEPRESSED_COOPERATION_PENALTY,
        PsychologicalState::Cooperative => cooperate += COOPERATIVE_BONUS,
        _ => {}
    }

    match inputs.agenda {
        HiddenAgenda::SeekPower => {
            rebel += SEEK_POWER_REBEL_BONUS;
            cooperate -= SEEK_POWER_COOPERATION_PENALTY;
        }
        HiddenAgenda::Survive => seek_resources += SURVIVE_RESOURCE_BONUS,
        _ => {}
    }

    [
        (Decision::Cooperate, cooperate),
        (Decision::Rebel, rebel),
        (Decision::TakeRisk, take_risk),
        (Decision::SeekResources, seek_resources),
    ]
}

/// The highest-scoring course; earlier entries win ties
pub fn choose_decision(inputs: &DecisionInputs) -> Decision {
    let scores = score_decisions(inputs);
    let mut best = scores[0];
    for candidate in &scores[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// System: every character decides and acts
pub fn make_decisions(
    mut rng: ResMut<SimRng>,
    mut ship: ResMut<ShipState>,
    roster: Res<Roster>,
    mut graph: ResMut<RelationshipGraph>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &CharacterName,
        &Role,
        &Personality,
        &Dispositions,
        &Psyche,
        &HiddenAgenda,
        &mut Emotions,
        &mut Wellbeing,
        &mut Mood,
        &mut Standing,
        &mut Needs,
    )>,
) {
    let rng = &mut rng.0;
    let ids = roster.ids();
    let captain = roster.captain();

    let mut decisions = Vec::with_capacity(ids.len());
    let mut extraversion = BTreeMap::new();
    let mut profiles = BTreeMap::new();
    for (id, entity) in roster.iter() {
        let Ok((_, name, role, personality, dispositions, psyche, agenda, emotions, wellbeing, ..)) =
            query.get(entity)
        else {
            continue;
        };
        let decision = choose_decision(&DecisionInputs {
            personality,
            emotions,
            wellbeing,
            dispositions,
            state: psyche.state,
            agenda: *agenda,
        });
        decisions.push((id, decision));
        extraversion.insert(id, personality.extraversion);
        profiles.insert(id, (name.0.clone(), *role));
    }

    for (id, decision) in decisions {
        debug!(character = id, decision = decision.as_str(), "decided");
        match decision {
            Decision::Cooperate => {
                let others: Vec<u32> = ids.iter().copied().filter(|&o| o != id).collect();
                let Some(&partner) = others.choose(rng) else {
                    continue;
                };
                graph.update_relationship(id, partner, Interaction::Cooperation);

                for who in [id, partner] {
                    let Some(entity) = roster.entity(who) else { continue };
                    if let Ok((_, _, _, personality, .., mut emotions, mut wellbeing, _, _, _)) =
                        query.get_mut(entity)
                    {
                        emotions.raise_happiness(COOPERATION_HAPPINESS * personality.agreeableness);
                        if who == id {
                            wellbeing.restore_social(COOPERATION_SOCIAL);
                        }
                    }
                }

                if let Some(event) = interaction_event(&mut day_events, &ship, &profiles, "cooperate", id, partner) {
                    day_events.push(event);
                }
            }
            Decision::Rebel => {
                let target = graph
                    .most_influential_other(&extraversion, id)
                    .or_else(|| {
                        let others: Vec<u32> = ids.iter().copied().filter(|&o| o != id).collect();
                        others.choose(rng).copied()
                    });
                let Some(target) = target else {
                    continue;
                };
                graph.update_relationship(id, target, Interaction::Conflict);

                for who in [id, target] {
                    let Some(entity) = roster.entity(who) else { continue };
                    if let Ok((_, _, _, personality, .., mut emotions, _, _, _, _)) =
                        query.get_mut(entity)
                    {
                        emotions.raise_anger(CONFLICT_ANGER * personality.neuroticism);
                    }
                }

                let defies_captain = Some(target) == captain;
                if defies_captain {
                    if let Some(entity) = roster.entity(id) {
                        if let Ok((.., mut mood, _, _)) = query.get_mut(entity) {
                            mood.adjust_trust(-DEFIANCE_TRUST_LOSS);
                        }
                    }
                    ship.adjust_authority(-DEFIANCE_AUTHORITY_LOSS);
                }

                if let Some(mut event) = interaction_event(&mut day_events, &ship, &profiles, "rebel", id, target) {
                    if defies_captain {
                        event = event.with_tag(drama_tags::CAPTAIN_INVOLVED);
                    }
                    day_events.push(event);
                }
            }
            Decision::TakeRisk => {
                let Some(entity) = roster.entity(id) else { continue };
                if let Ok((.., mut mood, mut standing, _)) = query.get_mut(entity) {
                    standing.adjust_influence(RISK_INFLUENCE);
                    mood.add_stress(RISK_STRESS);
                }
            }
            Decision::SeekResources => {
                let Some(entity) = roster.entity(id) else { continue };
                if let Ok((.., mut needs)) = query.get_mut(entity) {
                    if let Some(lowest) = needs.lowest().map(str::to_string) {
                        needs.adjust(&lowest, FORAGE_GAIN);
                    }
                }
            }
        }
    }
}

/// A two-person interaction, ready to be tagged and recorded
fn interaction_event(
    day_events: &mut DayEvents,
    ship: &ShipState,
    profiles: &BTreeMap<u32, (String, Role)>,
    subtype: &str,
    actor: u32,
    other: u32,
) -> Option<VoyageEvent> {
    let (actor_name, actor_role) = profiles.get(&actor)?;
    let (other_name, other_role) = profiles.get(&other)?;
    let verb = if subtype == "rebel" { "defied" } else { "worked with" };
    let event = VoyageEvent::new(
        day_events.generate_id(),
        ship.day,
        EventType::Interaction,
        subtype,
        format!("{} {} {}", actor_name, verb, other_name),
    )
    .with_actor(ActorRef::new(actor, actor_name.clone(), actor_role.as_str()))
    .with_actor(ActorRef::new(other, other_name.clone(), other_role.as_str()));
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Character;
    use crate::systems::roster::build_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn inputs<'a>(
        personality: &'a Personality,
        emotions: &'a Emotions,
        wellbeing: &'a Wellbeing,
        dispositions: &'a Dispositions,
        state: PsychologicalState,
        agenda: HiddenAgenda,
    ) -> DecisionInputs<'a> {
        DecisionInputs {
            personality,
            emotions,
            wellbeing,
            dispositions,
            state,
            agenda,
        }
    }

    #[test]
    fn test_agreeable_character_cooperates() {
        let personality = Personality {
            agreeableness: 0.9,
            ..Default::default()
        };
        let emotions = Emotions::default();
        let wellbeing = Wellbeing::default();
        let dispositions = Dispositions::default();
        let i = inputs(
            &personality,
            &emotions,
            &wellbeing,
            &dispositions,
            PsychologicalState::Normal,
            HiddenAgenda::None,
        );
        assert_eq!(choose_decision(&i), Decision::Cooperate);
    }

    #[test]
    fn test_angry_power_seeker_rebels() {
        let personality = Personality {
            agreeableness: 0.8,
            neuroticism: 0.5,
            ..Default::default()
        };
        let emotions = Emotions {
            anger: 0.6,
            ..Default::default()
        };
        let wellbeing = Wellbeing::default();
        let dispositions = Dispositions::default();
        let i = inputs(
            &personality,
            &emotions,
            &wellbeing,
            &dispositions,
            PsychologicalState::Angry,
            HiddenAgenda::SeekPower,
        );
        let scores = score_decisions(&i);
        // 0.6 * 1.5 + 0.5 + 0.5
        assert!((scores[1].1 - 1.9).abs() < 1e-6);
        assert!((scores[0].1 - 0.5).abs() < 1e-6);
        assert_eq!(choose_decision(&i), Decision::Rebel);
    }

    #[test]
    fn test_starving_survivor_seeks_resources() {
        let personality = Personality::default();
        let emotions = Emotions::default();
        let wellbeing = Wellbeing {
            physiological: 0.3,
            ..Default::default()
        };
        let dispositions = Dispositions::default();
        let i = inputs(
            &personality,
            &emotions,
            &wellbeing,
            &dispositions,
            PsychologicalState::Depressed,
            HiddenAgenda::Survive,
        );
        assert_eq!(choose_decision(&i), Decision::SeekResources);
    }

    #[test]
    fn test_reckless_character_takes_risks() {
        let personality = Personality {
            openness: 1.0,
            conscientiousness: 0.0,
            agreeableness: 0.2,
            ..Default::default()
        };
        let emotions = Emotions::default();
        let wellbeing = Wellbeing::default();
        let dispositions = Dispositions::default();
        let i = inputs(
            &personality,
            &emotions,
            &wellbeing,
            &dispositions,
            PsychologicalState::Normal,
            HiddenAgenda::FindLove,
        );
        assert_eq!(choose_decision(&i), Decision::TakeRisk);
    }

    fn spawn(world: &mut World, id: u32, role: Role, personality: Personality, emotions: Emotions) -> Entity {
        world
            .spawn((
                Character,
                CharacterId(id),
                CharacterName(format!("crew_{}", id)),
                role,
                personality,
                Dispositions::default(),
                Psyche::default(),
                HiddenAgenda::None,
                emotions,
                Wellbeing::default(),
                Mood::default(),
                Standing::default(),
                Needs::new().with("wage", 20.0).with("safety", 50.0),
            ))
            .id()
    }

    fn world_with_graph(ids: &[u32]) -> World {
        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(9)));
        world.insert_resource(ShipState::default());
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        let mut graph = RelationshipGraph::new();
        for id in ids {
            graph.add_character(*id);
        }
        world.insert_resource(graph);
        world
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, make_decisions).chain());
        schedule.run(world);
    }

    #[test]
    fn test_rebel_defies_influential_captain() {
        let mut world = world_with_graph(&[1, 2]);
        let captain = spawn(
            &mut world,
            1,
            Role::Captain,
            // Reckless enough to take a risk rather than pick a partner
            Personality {
                extraversion: 0.9,
                agreeableness: 0.1,
                openness: 1.0,
                conscientiousness: 0.0,
                ..Default::default()
            },
            Emotions::default(),
        );
        let rebel = spawn(
            &mut world,
            2,
            Role::Worker,
            Personality {
                agreeableness: 0.1,
                neuroticism: 1.0,
                openness: 0.0,
                extraversion: 0.1,
                ..Default::default()
            },
            Emotions {
                anger: 0.9,
                ..Default::default()
            },
        );

        run(&mut world);

        let mood = world.get::<Mood>(rebel).unwrap();
        assert_eq!(mood.trust_in_captain, 67.0);
        assert_eq!(world.resource::<ShipState>().captain_authority, 99.5);
        assert!(world.get::<Emotions>(captain).unwrap().anger > 0.0);

        let graph = world.resource::<RelationshipGraph>();
        let rel = graph.get(1, 2).unwrap();
        assert_eq!(rel.relationship_type, crate::components::social::RelationshipType::Conflict);

        let day = world.resource::<DayEvents>();
        let defiance = day
            .of_type(EventType::Interaction)
            .find(|e| e.subtype == "rebel")
            .unwrap();
        assert!(defiance.has_tag(drama_tags::CAPTAIN_INVOLVED));
    }

    #[test]
    fn test_seeking_resources_raises_lowest_need() {
        let mut world = world_with_graph(&[3]);
        let forager = spawn(
            &mut world,
            3,
            Role::Worker,
            Personality {
                agreeableness: 0.0,
                openness: 0.0,
                ..Default::default()
            },
            Emotions::default(),
        );
        world.entity_mut(forager).insert(Wellbeing {
            physiological: 0.1,
            ..Default::default()
        });

        run(&mut world);

        let needs = world.get::<Needs>(forager).unwrap();
        assert_eq!(needs.value("wage"), Some(25.0));
        assert_eq!(needs.value("safety"), Some(50.0));
    }
}
