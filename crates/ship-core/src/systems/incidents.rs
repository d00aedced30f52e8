//! Incident System
//!
//! Everyday incidents: thefts, fights, accidents, cruelty, the cold and the
//! shrinking rations. Everyone in an affected group remembers the incident
//! through their own ideology, and blames whoever that ideology tells them to.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::components::character::{
    CharacterId, CharacterName, Groups, Ideology, Mood, Needs, Psyche, Role,
};
use crate::components::memory::{Memories, Memory};
use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::events::catalog::{blame, interpretation, Blame, ImpactKind, IncidentKind};
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, Impact, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// Public facts about a crew member, read before anyone is changed
#[derive(Debug, Clone)]
struct CrewView {
    id: u32,
    role: Role,
    trust_in_captain: f32,
}

/// Who a character with the given leaning holds responsible
fn culprits(leaning: Blame, holder: u32, captain: Option<u32>, crew: &[CrewView]) -> Vec<u32> {
    match leaning {
        Blame::Captain => captain.into_iter().filter(|&c| c != holder).collect(),
        Blame::Officers => crew
            .iter()
            .filter(|c| c.role == Role::Officer && c.id != holder)
            .map(|c| c.id)
            .collect(),
        Blame::Troublemaker => {
            let mut least_loyal: Option<&CrewView> = None;
            for member in crew {
                if member.id == holder || Some(member.id) == captain {
                    continue;
                }
                if least_loyal.map_or(true, |l| member.trust_in_captain < l.trust_in_captain) {
                    least_loyal = Some(member);
                }
            }
            least_loyal.map(|m| m.id).into_iter().collect()
        }
        Blame::Nobody => Vec::new(),
    }
}

/// Incidents due today
pub fn roll_incidents(tuning: &Tuning, ship: &ShipState, rng: &mut impl Rng) -> Vec<IncidentKind> {
    let incidents = &tuning.incidents;
    let mut kinds = Vec::new();

    if rng.gen_bool(incidents.incident_chance) {
        if let Some(kind) = IncidentKind::RANDOM.choose(rng) {
            kinds.push(*kind);
        }
    }
    if ship.temperature < incidents.scarcity_temperature && rng.gen_bool(incidents.scarcity_chance) {
        kinds.push(IncidentKind::Scarcity);
    }
    if incidents.ration_cut_interval > 0 && ship.day % incidents.ration_cut_interval == 0 {
        kinds.push(IncidentKind::RationCut);
    }
    kinds
}

/// Ship-wide effects of an incident. Tension also costs half as much cohesion.
pub fn apply_ship_impacts(ship: &mut ShipState, kind: IncidentKind) {
    for (impact, value) in kind.impacts() {
        match impact {
            ImpactKind::Tension => {
                ship.adjust_tension(*value);
                ship.adjust_cohesion(-value / 2.0);
            }
            ImpactKind::Cohesion => ship.adjust_cohesion(*value),
            _ => {}
        }
    }
}

/// System: generate today's incidents and let the crew remember them
pub fn generate_incidents(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    mut ship: ResMut<ShipState>,
    roster: Res<Roster>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &CharacterName,
        &Role,
        &Ideology,
        &Groups,
        &mut Needs,
        &mut Mood,
        &mut Psyche,
        &mut Memories,
    )>,
) {
    let rng = &mut rng.0;
    let kinds = roll_incidents(&tuning, &ship, rng);
    if kinds.is_empty() {
        return;
    }

    let ids = roster.ids();
    let captain = roster.captain();

    for kind in kinds {
        let crew: Vec<CrewView> = roster
            .iter()
            .filter_map(|(id, entity)| {
                let (_, _, role, _, _, _, mood, _, _) = query.get(entity).ok()?;
                Some(CrewView {
                    id,
                    role: *role,
                    trust_in_captain: mood.trust_in_captain,
                })
            })
            .collect();

        info!(day = ship.day, incident = kind.subtype(), "{}", kind.description());

        let mut actors = Vec::new();
        let mut ideologies = BTreeSet::new();
        let mut captain_blamed = false;

        for (holder, entity) in roster.iter() {
            let Ok((_, name, role, ideology, groups, mut needs, mut mood, mut psyche, mut memories)) =
                query.get_mut(entity)
            else {
                continue;
            };
            if !groups.intersects(kind.affected_groups()) {
                continue;
            }

            let witnesses: Vec<u32> = ids
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(tuning.incidents.witness_chance))
                .collect();
            let blamed = culprits(blame(*ideology), holder, captain, &crew);
            captain_blamed |= captain.map_or(false, |c| blamed.contains(&c));

            let view = interpretation(*ideology);
            debug!(character = holder, view, "remembers the incident");
            let memory = Memory::new(ship.day, kind.description(), view, kind.emotional_impact())
                .with_witnesses(witnesses)
                .blaming(blamed);
            memories.record(memory, &mut mood, &mut psyche);

            for (impact, value) in kind.impacts() {
                match impact {
                    ImpactKind::Trust => mood.adjust_trust(*value),
                    ImpactKind::Stress => mood.add_stress(*value),
                    _ => {
                        if let Some(need) = impact.need() {
                            needs.adjust(need, *value);
                        }
                    }
                }
            }

            ideologies.insert(*ideology);
            actors.push(ActorRef::new(holder, name.0.clone(), role.as_str()));
        }

        apply_ship_impacts(&mut ship, kind);

        let mut event = VoyageEvent::new(
            day_events.generate_id(),
            ship.day,
            EventType::Incident,
            kind.subtype(),
            kind.description(),
        )
        .with_actors(actors)
        .with_groups(kind.affected_groups().iter().map(|g| g.as_str().to_string()))
        .with_impacts(
            kind.impacts()
                .iter()
                .map(|(impact, value)| Impact::new(impact.as_str(), *value)),
        );
        if kind.is_scarcity() {
            event = event.with_tag(drama_tags::RESOURCE_SCARCITY);
        }
        if ideologies.len() > 1 {
            event = event.with_tag(drama_tags::CONFLICTING_NARRATIVES);
        }
        if captain_blamed {
            event = event.with_tag(drama_tags::CAPTAIN_INVOLVED);
        }
        day_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::GroupIdentity;
    use crate::systems::roster::build_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn crew_view(id: u32, role: Role, trust: f32) -> CrewView {
        CrewView {
            id,
            role,
            trust_in_captain: trust,
        }
    }

    #[test]
    fn test_culprits_by_leaning() {
        let crew = vec![
            crew_view(1, Role::Captain, 90.0),
            crew_view(2, Role::Officer, 80.0),
            crew_view(3, Role::Worker, 20.0),
            crew_view(4, Role::Worker, 10.0),
        ];
        assert_eq!(culprits(Blame::Captain, 4, Some(1), &crew), vec![1]);
        assert_eq!(culprits(Blame::Captain, 1, Some(1), &crew), Vec::<u32>::new());
        assert_eq!(culprits(Blame::Officers, 3, Some(1), &crew), vec![2]);
        assert_eq!(culprits(Blame::Troublemaker, 1, Some(1), &crew), vec![4]);
        assert_eq!(culprits(Blame::Troublemaker, 4, Some(1), &crew), vec![3]);
        assert!(culprits(Blame::Nobody, 2, Some(1), &crew).is_empty());
    }

    #[test]
    fn test_ration_cut_on_schedule() {
        let tuning = {
            let mut t = Tuning::default();
            t.incidents.incident_chance = 0.0;
            t.incidents.scarcity_chance = 0.0;
            t
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ship = ShipState::default();
        ship.day = 5;
        assert_eq!(roll_incidents(&tuning, &ship, &mut rng), vec![IncidentKind::RationCut]);
        ship.day = 6;
        assert!(roll_incidents(&tuning, &ship, &mut rng).is_empty());
    }

    #[test]
    fn test_scarcity_needs_cold() {
        let mut tuning = Tuning::default();
        tuning.incidents.incident_chance = 0.0;
        tuning.incidents.scarcity_chance = 1.0;
        tuning.incidents.ration_cut_interval = 0;
        let mut rng = SmallRng::seed_from_u64(1);

        let warm = ShipState::default();
        assert!(roll_incidents(&tuning, &warm, &mut rng).is_empty());

        // Heading 0: -5 degrees
        let cold = ShipState::new(0.0);
        assert_eq!(roll_incidents(&tuning, &cold, &mut rng), vec![IncidentKind::Scarcity]);
    }

    #[test]
    fn test_ship_impacts_of_theft_and_fight() {
        let mut ship = ShipState::default();
        apply_ship_impacts(&mut ship, IncidentKind::Theft);
        assert_eq!(ship.philosophical_tension, 40.0);
        assert_eq!(ship.social_cohesion, 65.0);

        let mut ship = ShipState::default();
        apply_ship_impacts(&mut ship, IncidentKind::Fight);
        assert_eq!(ship.philosophical_tension, 30.0);
        assert_eq!(ship.social_cohesion, 62.0);
    }

    fn spawn(
        world: &mut World,
        id: u32,
        role: Role,
        ideology: Ideology,
        groups: &[GroupIdentity],
        needs: Needs,
    ) -> Entity {
        world
            .spawn((
                crate::components::character::Character,
                CharacterId(id),
                CharacterName(format!("crew_{}", id)),
                role,
                ideology,
                Groups::new(groups.iter().copied()),
                needs,
                Mood::new(40.0),
                Psyche::default(),
                Memories::new(),
            ))
            .id()
    }

    #[test]
    fn test_ration_cut_is_remembered_differently() {
        let mut tuning = Tuning::default();
        tuning.incidents.incident_chance = 0.0;
        tuning.incidents.scarcity_chance = 0.0;

        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(5)));
        let mut ship = ShipState::default();
        ship.day = 5;
        world.insert_resource(ship);
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());

        let captain = spawn(
            &mut world,
            1,
            Role::Captain,
            Ideology::Authoritarian,
            &[GroupIdentity::Authority],
            Needs::new().with("power", 90.0),
        );
        let sailor = spawn(
            &mut world,
            4,
            Role::Worker,
            Ideology::Revolutionary,
            &[GroupIdentity::Workers],
            Needs::new().with("food", 60.0).with("wage", 25.0),
        );
        let passenger = spawn(
            &mut world,
            5,
            Role::Passenger,
            Ideology::Liberal,
            &[GroupIdentity::Women],
            Needs::new().with("food", 60.0),
        );

        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, generate_incidents).chain());
        schedule.run(&mut world);

        let events = &world.resource::<DayEvents>().events;
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.subtype, "ration_cut");
        assert!(event.involves(4) && event.involves(5) && !event.involves(1));
        assert!(event.has_tag(drama_tags::CONFLICTING_NARRATIVES));
        assert!(event.has_tag(drama_tags::CAPTAIN_INVOLVED));

        assert!(world.get::<Memories>(captain).unwrap().is_empty());

        let sailor_memories = world.get::<Memories>(sailor).unwrap();
        assert_eq!(sailor_memories.len(), 1);
        let memory = &sailor_memories.memories[0];
        assert_eq!(memory.interpretation, "This is systemic oppression. We must resist!");
        assert!(memory.believed_responsible.contains(&1));
        assert_eq!(memory.emotional_impact, 5.0);

        // 40 + impact 5 * 0.5 + stress impact 5
        assert_eq!(world.get::<Mood>(sailor).unwrap().stress, 47.5);
        assert_eq!(world.get::<Needs>(sailor).unwrap().value("food"), Some(50.0));

        let passenger_memories = world.get::<Memories>(passenger).unwrap();
        assert_eq!(
            passenger_memories.memories[0].interpretation,
            "This violates individual rights. We need reform."
        );
    }

    #[test]
    fn test_random_incident_moves_the_ship() {
        let mut tuning = Tuning::default();
        tuning.incidents.incident_chance = 1.0;
        tuning.incidents.scarcity_chance = 0.0;

        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(9)));
        world.insert_resource(ShipState::default());
        world.insert_resource(Roster::new());
        world.insert_resource(DayEvents::new());
        spawn(
            &mut world,
            3,
            Role::Worker,
            Ideology::Anarchist,
            &[GroupIdentity::Workers],
            Needs::new().with("food", 60.0),
        );

        let mut schedule = Schedule::default();
        schedule.add_systems((build_roster, generate_incidents).chain());
        schedule.run(&mut world);

        let events = &world.resource::<DayEvents>().events;
        assert_eq!(events.len(), 1);
        let kind = IncidentKind::RANDOM
            .iter()
            .copied()
            .find(|k| k.subtype() == events[0].subtype)
            .unwrap();

        let mut expected = ShipState::default();
        apply_ship_impacts(&mut expected, kind);
        let ship = world.resource::<ShipState>();
        assert_eq!(ship.philosophical_tension, expected.philosophical_tension);
        assert_eq!(ship.social_cohesion, expected.social_cohesion);
    }
}
