//! Unrest Systems
//!
//! Protests and mutinies. A protest wins a few concessions while the ship
//! keeps heading north; the steward who says so is shouted down. A mutiny,
//! if enough of the crew has lost faith, turns the ship around.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::components::character::{CharacterId, CharacterName, Ideology, Mood, Needs, Role, Standing};
use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, Impact, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// The steward's cost for warning about the ice
pub mod steward_constants {
    pub const WARNING_STRESS: f32 = 10.0;
    pub const WARNING_INFLUENCE_LOSS: f32 = 5.0;
}

use steward_constants::*;

/// System: stage a protest when enough of the crew is desperate
pub fn organize_protest(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    mut ship: ResMut<ShipState>,
    roster: Res<Roster>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &CharacterName,
        &Role,
        &mut Needs,
        &mut Mood,
        &mut Standing,
    )>,
) {
    let rng = &mut rng.0;
    let unrest = &tuning.unrest;
    if roster.is_empty() {
        return;
    }

    let mut protesters = Vec::new();
    let mut demands = BTreeSet::new();
    let mut total_stress = 0.0;
    let mut officer = None;
    let mut steward = None;
    for (id, entity) in roster.iter() {
        let Ok((_, name, role, needs, mood, _)) = query.get(entity) else {
            continue;
        };
        total_stress += mood.stress;
        if *role == Role::Officer && officer.is_none() {
            officer = Some((id, name.0.clone()));
        }
        if *role == Role::Steward && steward.is_none() {
            steward = Some((id, name.0.clone()));
        }
        let critical = needs.critical();
        if !role.is_captain() && !critical.is_empty() {
            debug!("  {} demands: {}", name.0, critical.join(", "));
            demands.extend(critical);
            protesters.push(ActorRef::new(id, name.0.clone(), role.as_str()));
        }
    }
    let average_stress = total_stress / roster.len() as f32;
    if protesters.len() < unrest.min_protesters || average_stress <= unrest.protest_stress_threshold {
        return;
    }

    info!(
        day = ship.day,
        protesters = protesters.len(),
        average_stress,
        "protest organized"
    );
    if let Some((_, name)) = &officer {
        info!("  {}: 'I understand your concerns. Keep protesting peacefully.'", name);
    }

    let demands: Vec<String> = demands.into_iter().collect();
    let count = rng.gen_range(1..=unrest.max_concessions.max(1)).min(demands.len());
    let mut concessions: Vec<String> = demands.choose_multiple(rng, count).cloned().collect();
    concessions.sort();

    if !concessions.is_empty() {
        info!("  captain grants: {}", concessions.join(", "));
        ship.adjust_authority(-unrest.concession_authority_cost);
        for protester in &protesters {
            let Some(entity) = roster.entity(protester.character_id) else { continue };
            let Ok((_, _, _, mut needs, mut mood, _)) = query.get_mut(entity) else {
                continue;
            };
            for concession in &concessions {
                needs.adjust(concession, unrest.concession_need_relief);
            }
            mood.add_stress(-unrest.concession_stress_relief);
            mood.adjust_trust(unrest.concession_trust_gain);
        }
    }
    info!("  however, the ship continues north...");

    let mut event = VoyageEvent::new(
        day_events.generate_id(),
        ship.day,
        EventType::Protest,
        "organized",
        format!("Protest demanding {}", demands.join(", ")),
    )
    .with_actors(protesters)
    .with_impacts([
        Impact::new("authority", if concessions.is_empty() { 0.0 } else { -unrest.concession_authority_cost }),
        Impact::new("cohesion", -unrest.protest_cohesion_cost),
    ])
    .with_outcome(if concessions.is_empty() {
        "no concessions".to_string()
    } else {
        format!("granted: {}", concessions.join(", "))
    });
    if !concessions.is_empty() {
        event = event.with_tag(drama_tags::CONCESSION);
    }
    if !demands.is_empty() {
        event = event.with_tag(drama_tags::RESOURCE_SCARCITY);
    }

    if let Some((id, name)) = steward {
        info!("  {}: 'We need to turn the ship south! These concessions mean nothing if we all drown!'", name);
        info!("  others: 'Fascist! Counter-revolutionary!'");
        if let Some(entity) = roster.entity(id) {
            if let Ok((_, _, role, _, mut mood, mut standing)) = query.get_mut(entity) {
                mood.add_stress(WARNING_STRESS);
                standing.adjust_influence(-WARNING_INFLUENCE_LOSS);
                if !event.involves(id) {
                    event = event.with_actor(ActorRef::new(id, name.clone(), role.as_str()));
                }
            }
        }
        event = event.with_tag(drama_tags::IGNORED_WARNING);
    }

    ship.adjust_cohesion(-unrest.protest_cohesion_cost);
    day_events.push(event);
}

/// Whether the ship is ripe for mutiny
pub fn mutiny_brewing(tuning: &Tuning, ship: &ShipState, stressed_radicals: usize) -> bool {
    let unrest = &tuning.unrest;
    ship.captain_authority <= unrest.mutiny_authority_ceiling
        && stressed_radicals >= unrest.min_radicals
        && ship.danger_level > unrest.mutiny_danger_threshold
}

/// System: radicals try to seize the ship
pub fn attempt_mutiny(
    tuning: Res<Tuning>,
    mut ship: ResMut<ShipState>,
    mut roster: ResMut<Roster>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &CharacterName,
        &Ideology,
        &mut Role,
        &mut Mood,
        &mut Standing,
    )>,
) {
    let unrest = &tuning.unrest;
    let captain = roster.captain();

    let mut stressed_radicals = 0;
    let mut mutineers: Vec<(u32, String, f32)> = Vec::new();
    let mut supporters = 0;
    let mut pacifist = None;
    for (id, entity) in roster.iter() {
        let Ok((_, name, ideology, role, mood, standing)) = query.get(entity) else {
            continue;
        };
        if ideology.is_radical() && mood.stress > unrest.radical_stress_threshold {
            stressed_radicals += 1;
        }
        if role.is_captain() {
            continue;
        }
        if ideology.is_radical() {
            mutineers.push((id, name.0.clone(), standing.influence));
        }
        if mood.trust_in_captain < unrest.supporter_trust_ceiling {
            supporters += 1;
        }
        if *role == Role::Intellectual && pacifist.is_none() {
            pacifist = Some(name.0.clone());
        }
    }

    if !mutiny_brewing(&tuning, &ship, stressed_radicals) || mutineers.is_empty() {
        return;
    }

    let names: Vec<&str> = mutineers.iter().map(|(_, n, _)| n.as_str()).collect();
    info!(day = ship.day, "mutiny attempt by {}", names.join(", "));

    let mut actors: Vec<ActorRef> = mutineers
        .iter()
        .map(|(id, name, _)| ActorRef::new(*id, name.clone(), "mutineer"))
        .collect();
    let succeeded = supporters as f32 > roster.len() as f32 / 2.0;

    let event = if succeeded {
        let mut leader = mutineers[0].clone();
        for candidate in &mutineers[1..] {
            if candidate.2 > leader.2 {
                leader = candidate.clone();
            }
        }
        let (leader_id, leader_name, _) = leader;
        info!("  mutiny succeeds! {} takes command and the ship turns south", leader_name);

        ship.captain_authority = 0.0;
        if let Some(old) = captain.and_then(|c| roster.entity(c)) {
            if let Ok((id, name, _, mut role, ..)) = query.get_mut(old) {
                *role = Role::Deposed;
                actors.push(ActorRef::new(id.0, name.0.clone(), Role::Deposed.as_str()));
            }
        }
        if let Some(entity) = roster.entity(leader_id) {
            if let Ok((_, _, _, mut role, ..)) = query.get_mut(entity) {
                *role = Role::Captain;
            }
        }
        roster.set_captain(Some(leader_id));
        ship.turn_south();

        VoyageEvent::new(
            day_events.generate_id(),
            ship.day,
            EventType::Mutiny,
            "succeeded",
            format!("{} led a mutiny and turned the ship south", leader_name),
        )
        .with_outcome(format!("{} supporters of {} crew", supporters, roster.len()))
        .with_tag(drama_tags::EXISTENTIAL_THREAT)
    } else {
        info!("  mutiny fails! not enough support");
        let rebuke = pacifist.map(|name| format!("{}: 'I don't believe in violence!'", name));
        if let Some(line) = &rebuke {
            info!("  {}", line);
        }
        for (id, _, _) in &mutineers {
            let Some(entity) = roster.entity(*id) else { continue };
            if let Ok((.., mut mood, mut standing)) = query.get_mut(entity) {
                mood.add_stress(unrest.failed_mutiny_stress);
                standing.adjust_influence(-unrest.failed_mutiny_influence_loss);
            }
        }
        let mut event = VoyageEvent::new(
            day_events.generate_id(),
            ship.day,
            EventType::Mutiny,
            "failed",
            "A mutiny collapsed for lack of support",
        )
        .with_outcome(format!("{} supporters of {} crew", supporters, roster.len()));
        if rebuke.is_some() {
            event = event.with_tag(drama_tags::IDEOLOGICAL_CLASH);
        }
        event
    };

    day_events.push(
        event
            .with_actors(actors)
            .with_tag(drama_tags::POWER_STRUGGLE)
            .with_tag(drama_tags::CAPTAIN_INVOLVED),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Character;
    use crate::systems::roster::build_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn protest_world() -> World {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(4)));
        world.insert_resource(ShipState::default());
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        world
    }

    fn spawn_protester(world: &mut World, id: u32, role: Role, needs: Needs, stress: f32) -> Entity {
        world
            .spawn((
                Character,
                CharacterId(id),
                CharacterName(format!("crew_{}", id)),
                role,
                needs,
                Mood::new(stress),
                Standing::new(40.0, 50.0),
            ))
            .id()
    }

    fn run_protest(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, organize_protest).chain());
        schedule.run(world);
    }

    #[test]
    fn test_protest_wins_concessions_and_silences_steward() {
        let mut world = protest_world();
        spawn_protester(&mut world, 1, Role::Captain, Needs::new().with("power", 10.0), 70.0);
        let a = spawn_protester(&mut world, 2, Role::Worker, Needs::new().with("wage", 20.0), 70.0);
        let b = spawn_protester(&mut world, 3, Role::Worker, Needs::new().with("wage", 25.0), 70.0);
        spawn_protester(&mut world, 4, Role::Passenger, Needs::new().with("warmth", 10.0), 70.0);
        let steward = spawn_protester(&mut world, 5, Role::Steward, Needs::new().with("truth", 60.0), 80.0);

        run_protest(&mut world);

        let ship = world.resource::<ShipState>();
        assert_eq!(ship.captain_authority, 95.0);
        assert_eq!(ship.social_cohesion, 67.0);

        let day = world.resource::<DayEvents>();
        assert_eq!(day.len(), 1);
        let event = &day.events[0];
        assert_eq!(event.event_type, EventType::Protest);
        assert!(event.involves(2) && event.involves(3) && event.involves(4));
        assert!(!event.involves(1));
        assert!(event.has_tag(drama_tags::CONCESSION));
        assert!(event.has_tag(drama_tags::IGNORED_WARNING));

        let mood = world.get::<Mood>(a).unwrap();
        assert_eq!(mood.stress, 65.0);
        assert_eq!(mood.trust_in_captain, 72.0);

        // Whatever was granted, the protesters with that need are better off
        let granted_wage = event.outcome.as_deref().unwrap_or("").contains("wage");
        let wage = world.get::<Needs>(b).unwrap().value("wage").unwrap();
        assert_eq!(wage, if granted_wage { 35.0 } else { 25.0 });

        let steward_mood = world.get::<Mood>(steward).unwrap();
        assert_eq!(steward_mood.stress, 90.0);
        assert_eq!(world.get::<Standing>(steward).unwrap().influence, 35.0);
    }

    #[test]
    fn test_calm_crew_does_not_protest() {
        let mut world = protest_world();
        for id in 1..=4 {
            spawn_protester(&mut world, id, Role::Worker, Needs::new().with("wage", 10.0), 40.0);
        }

        run_protest(&mut world);

        assert!(world.resource::<DayEvents>().is_empty());
        assert_eq!(world.resource::<ShipState>().captain_authority, 100.0);
    }

    #[test]
    fn test_mutiny_conditions() {
        let tuning = Tuning::default();
        let mut ship = ShipState::new(36.0);
        ship.captain_authority = 40.0;
        assert!(mutiny_brewing(&tuning, &ship, 3));
        assert!(!mutiny_brewing(&tuning, &ship, 2));
        ship.captain_authority = 41.0;
        assert!(!mutiny_brewing(&tuning, &ship, 3));
        // Safe waters: nobody risks it
        let mut safe = ShipState::default();
        safe.captain_authority = 0.0;
        assert!(!mutiny_brewing(&tuning, &safe, 5));
    }

    fn mutiny_world() -> World {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        let mut ship = ShipState::new(36.0);
        ship.captain_authority = 30.0;
        world.insert_resource(ship);
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        world
    }

    fn spawn_crew(
        world: &mut World,
        id: u32,
        role: Role,
        ideology: Ideology,
        stress: f32,
        trust: f32,
        influence: f32,
    ) -> Entity {
        world
            .spawn((
                Character,
                CharacterId(id),
                CharacterName(format!("crew_{}", id)),
                ideology,
                role,
                Mood {
                    stress,
                    trust_in_captain: trust,
                },
                Standing::new(influence, 50.0),
            ))
            .id()
    }

    fn run_mutiny(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, attempt_mutiny).chain());
        schedule.run(world);
    }

    #[test]
    fn test_supported_mutiny_turns_ship_south() {
        let mut world = mutiny_world();
        let captain = spawn_crew(&mut world, 1, Role::Captain, Ideology::Authoritarian, 20.0, 90.0, 90.0);
        spawn_crew(&mut world, 2, Role::Worker, Ideology::Revolutionary, 80.0, 10.0, 35.0);
        let leader = spawn_crew(&mut world, 3, Role::Intellectual, Ideology::Revolutionary, 75.0, 20.0, 60.0);
        spawn_crew(&mut world, 4, Role::Steward, Ideology::Anarchist, 90.0, 5.0, 20.0);

        run_mutiny(&mut world);

        assert_eq!(*world.get::<Role>(captain).unwrap(), Role::Deposed);
        assert_eq!(*world.get::<Role>(leader).unwrap(), Role::Captain);
        assert_eq!(world.resource::<Roster>().captain(), Some(3));

        let ship = world.resource::<ShipState>();
        assert_eq!(ship.captain_authority, 0.0);
        assert_eq!(ship.heading, 180.0);
        assert_eq!(ship.danger_level, 0.0);

        let event = &world.resource::<DayEvents>().events[0];
        assert_eq!(event.subtype, "succeeded");
        assert!(event.involves(1));
    }

    #[test]
    fn test_unsupported_mutiny_fails() {
        let mut world = mutiny_world();
        spawn_crew(&mut world, 1, Role::Captain, Ideology::Authoritarian, 20.0, 90.0, 90.0);
        let rebel = spawn_crew(&mut world, 2, Role::Worker, Ideology::Revolutionary, 80.0, 60.0, 35.0);
        spawn_crew(&mut world, 3, Role::Intellectual, Ideology::Revolutionary, 75.0, 60.0, 60.0);
        spawn_crew(&mut world, 4, Role::Steward, Ideology::Anarchist, 90.0, 5.0, 20.0);
        spawn_crew(&mut world, 5, Role::Officer, Ideology::Liberal, 15.0, 80.0, 70.0);

        run_mutiny(&mut world);

        assert_eq!(world.get::<Mood>(rebel).unwrap().stress, 95.0);
        assert_eq!(world.get::<Standing>(rebel).unwrap().influence, 25.0);
        assert_eq!(world.resource::<Roster>().captain(), Some(1));
        assert!(world.resource::<ShipState>().danger_level > 60.0);

        let event = &world.resource::<DayEvents>().events[0];
        assert_eq!(event.subtype, "failed");
        assert!(event.has_tag(drama_tags::IDEOLOGICAL_CLASH));
    }
}
