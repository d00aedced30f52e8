//! End-of-day Systems
//!
//! Relationships fade a little every day. Then the sea decides: in the ice
//! the ship may go down, otherwise the voyage moves on to the next day.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::components::character::{CharacterId, CharacterName, Needs, Role};
use crate::components::ship::ShipState;
use crate::components::social::RelationshipGraph;
use crate::config::Tuning;
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// System: weaken every relationship, dropping those that fade away
pub fn decay_relationships(tuning: Res<Tuning>, mut graph: ResMut<RelationshipGraph>) {
    let removed = graph.decay(tuning.relationships.decay_rate);
    if !removed.is_empty() {
        debug!(count = removed.len(), "relationships faded away");
    }
}

/// System: sink the ship or advance to the next day
pub fn determine_fate(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    mut ship: ResMut<ShipState>,
    roster: Res<Roster>,
    mut day_events: ResMut<DayEvents>,
    query: Query<(&CharacterId, &CharacterName, &Role, &Needs)>,
) {
    if ship.sunk {
        return;
    }
    let rng = &mut rng.0;
    let voyage = &tuning.voyage;

    if ship.danger_level > voyage.sinking_danger_threshold && rng.gen_bool(voyage.sinking_chance) {
        let mut demands = BTreeSet::new();
        let mut actors = Vec::new();
        for (_, entity) in roster.iter() {
            if let Ok((id, name, role, needs)) = query.get(entity) {
                demands.extend(needs.critical());
                actors.push(ActorRef::new(id.0, name.0.clone(), role.as_str()));
            }
        }
        let demands: Vec<String> = demands.into_iter().collect();

        info!(
            day = ship.day,
            degrees_north = ship.degrees_north(),
            "the ship hits the icebergs and sinks"
        );
        if !demands.is_empty() {
            info!("  while the passengers argued about: {}", demands.join(", "));
        }
        info!("  nobody listened to the steward's warning to turn south");

        ship.sunk = true;
        let event = VoyageEvent::new(
            day_events.generate_id(),
            ship.day,
            EventType::Sinking,
            "iceberg",
            format!("The ship hit the icebergs {:.0} degrees north", ship.degrees_north()),
        )
        .with_actors(actors)
        .with_outcome(if demands.is_empty() {
            "everyone drowns".to_string()
        } else {
            format!("everyone drowns arguing about {}", demands.join(", "))
        })
        .with_tag(drama_tags::EXISTENTIAL_THREAT)
        .with_tag(drama_tags::IGNORED_WARNING);
        day_events.push(event);
        return;
    }

    ship.day += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Character;
    use crate::components::social::RelationshipType;
    use crate::systems::roster::build_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fate_world(tuning: Tuning, ship: ShipState) -> World {
        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(9)));
        world.insert_resource(ship);
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        world.spawn((
            Character,
            CharacterId(1),
            CharacterName("Steward".to_string()),
            Role::Steward,
            Needs::new().with("truth", 10.0).with("warmth", 5.0),
        ));
        world
    }

    fn run_fate(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, determine_fate).chain());
        schedule.run(world);
    }

    #[test]
    fn test_safe_waters_advance_the_day() {
        let mut world = fate_world(Tuning::default(), ShipState::default());
        run_fate(&mut world);

        let ship = world.resource::<ShipState>();
        assert_eq!(ship.day, 2);
        assert!(!ship.sunk);
        assert!(world.resource::<DayEvents>().is_empty());
    }

    #[test]
    fn test_ship_sinks_in_the_ice() {
        let mut tuning = Tuning::default();
        tuning.voyage.sinking_chance = 1.0;
        let mut world = fate_world(tuning, ShipState::new(0.0));
        run_fate(&mut world);

        let ship = world.resource::<ShipState>();
        assert!(ship.sunk);
        assert_eq!(ship.day, 1);

        let event = &world.resource::<DayEvents>().events[0];
        assert_eq!(event.event_type, EventType::Sinking);
        assert_eq!(event.outcome.as_deref(), Some("everyone drowns arguing about truth, warmth"));
        assert!(event.has_tag(drama_tags::IGNORED_WARNING));

        // A sunk ship stays put
        run_fate(&mut world);
        assert_eq!(world.resource::<ShipState>().day, 1);
        assert_eq!(world.resource::<DayEvents>().len(), 1);
    }

    #[test]
    fn test_decay_drops_faded_relationships() {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        let mut graph = RelationshipGraph::new();
        graph.add_character(1);
        graph.add_character(2);
        graph.add_character(3);
        graph.add_relationship(1, 2, 0.5, RelationshipType::Friendship);
        graph.add_relationship(2, 3, 0.005, RelationshipType::Neutral);
        world.insert_resource(graph);

        let mut schedule = Schedule::default();
        schedule.add_systems(decay_relationships);
        schedule.run(&mut world);

        let graph = world.resource::<RelationshipGraph>();
        assert!((graph.get(1, 2).unwrap().strength - 0.49).abs() < 1e-6);
        assert!(graph.get(2, 3).is_none());
    }
}
