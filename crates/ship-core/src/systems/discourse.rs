//! Discourse System
//!
//! Now and then the passengers argue about a big question. The best
//! speakers take the floor, gain influence, and leave the ship more divided.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::info;

use crate::components::character::{CharacterId, CharacterName, Ideology, Role, Standing};
use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::events::catalog::PHILOSOPHICAL_QUESTIONS;
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, Impact, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// System: maybe hold a philosophical discussion
pub fn hold_discussion(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    mut ship: ResMut<ShipState>,
    roster: Res<Roster>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(&CharacterId, &CharacterName, &Role, &Ideology, &mut Standing)>,
) {
    let rng = &mut rng.0;
    let discourse = &tuning.discourse;
    if !rng.gen_bool(discourse.discussion_chance) {
        return;
    }
    let Some(question) = PHILOSOPHICAL_QUESTIONS.choose(rng) else {
        return;
    };

    let eligible: Vec<u32> = roster
        .iter()
        .filter(|(_, entity)| {
            query
                .get(*entity)
                .map_or(false, |(.., standing)| standing.speaking_ability > discourse.min_speaking_ability)
        })
        .map(|(id, _)| id)
        .collect();
    let speakers: Vec<u32> = eligible
        .choose_multiple(rng, discourse.max_speakers)
        .copied()
        .collect();

    info!(day = ship.day, "philosophical discussion: '{}'", question.question);

    let mut actors = Vec::new();
    let mut statements = Vec::new();
    let mut ideologies = BTreeSet::new();
    for id in speakers {
        let Some(entity) = roster.entity(id) else { continue };
        let Ok((_, name, role, ideology, mut standing)) = query.get_mut(entity) else {
            continue;
        };
        let perspective = question.perspective(*ideology);
        info!("  {}: {}", name.0, perspective);
        standing.adjust_influence(discourse.influence_gain);

        statements.push(format!("{}: {}", name.0, perspective));
        ideologies.insert(*ideology);
        actors.push(ActorRef::new(id, name.0.clone(), role.as_str()));
    }

    let tension = if discourse.min_tension_gain < discourse.max_tension_gain {
        rng.gen_range(discourse.min_tension_gain..discourse.max_tension_gain)
    } else {
        discourse.min_tension_gain
    };
    ship.adjust_tension(tension);

    let mut event = VoyageEvent::new(
        day_events.generate_id(),
        ship.day,
        EventType::Discourse,
        "philosophical_discussion",
        question.question,
    )
    .with_actors(actors)
    .with_impacts([Impact::new("tension", tension)]);
    if !statements.is_empty() {
        event = event.with_outcome(statements.join(" | "));
    }
    if ideologies.len() > 1 {
        event = event.with_tag(drama_tags::IDEOLOGICAL_CLASH);
    }
    day_events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Character;
    use crate::systems::roster::build_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn spawn(world: &mut World, id: u32, ideology: Ideology, speaking: f32) -> Entity {
        world
            .spawn((
                Character,
                CharacterId(id),
                CharacterName(format!("crew_{}", id)),
                Role::Passenger,
                ideology,
                Standing::new(30.0, speaking),
            ))
            .id()
    }

    #[test]
    fn test_only_eloquent_characters_speak() {
        let mut tuning = Tuning::default();
        tuning.discourse.discussion_chance = 1.0;

        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(8)));
        world.insert_resource(ShipState::default());
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());

        let orator = spawn(&mut world, 1, Ideology::Revolutionary, 90.0);
        let second = spawn(&mut world, 2, Ideology::Authoritarian, 80.0);
        let mumbler = spawn(&mut world, 3, Ideology::Liberal, 35.0);

        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, hold_discussion).chain());
        schedule.run(&mut world);

        assert_eq!(world.get::<Standing>(orator).unwrap().influence, 32.0);
        assert_eq!(world.get::<Standing>(second).unwrap().influence, 32.0);
        assert_eq!(world.get::<Standing>(mumbler).unwrap().influence, 30.0);

        let tension = world.resource::<ShipState>().philosophical_tension;
        assert!((35.0..45.0).contains(&tension));

        let day = world.resource::<DayEvents>();
        let event = &day.events[0];
        assert_eq!(event.event_type, EventType::Discourse);
        assert!(!event.involves(3));
        assert!(event.has_tag(drama_tags::IDEOLOGICAL_CLASH));
    }

    #[test]
    fn test_quiet_day() {
        let mut tuning = Tuning::default();
        tuning.discourse.discussion_chance = 0.0;

        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(8)));
        world.insert_resource(ShipState::default());
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        spawn(&mut world, 1, Ideology::Revolutionary, 90.0);

        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, hold_discussion).chain());
        schedule.run(&mut world);

        assert!(world.resource::<DayEvents>().is_empty());
        assert_eq!(world.resource::<ShipState>().philosophical_tension, 30.0);
    }
}
