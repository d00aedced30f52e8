//! World Setup
//!
//! Resource initialization and crew spawning.

pub mod crew;

pub use crew::*;

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::alliance::AllianceRegistry;
use crate::components::group::GroupRegistry;
use crate::components::ship::ShipState;
use crate::components::social::RelationshipGraph;
use crate::config::Tuning;
use crate::events::DayEvents;
use crate::systems::roster::Roster;
use crate::SimRng;

/// Build a world with every resource in place and the default crew aboard
pub fn init_world(seed: u64, tuning: Tuning) -> World {
    let mut world = World::new();
    let mut rng = SmallRng::seed_from_u64(seed);

    world.insert_resource(ShipState::new(tuning.voyage.start_heading));
    world.insert_resource(RelationshipGraph::with_deltas(
        tuning.relationships.cooperation_delta,
        tuning.relationships.conflict_delta,
    ));
    world.insert_resource(Roster::new());
    world.insert_resource(GroupRegistry::new());
    world.insert_resource(AllianceRegistry::new());
    world.insert_resource(DayEvents::new());
    world.insert_resource(tuning);

    spawn_crew(&mut world, &MANIFEST, &mut rng);

    world.insert_resource(SimRng(rng));
    world
}
