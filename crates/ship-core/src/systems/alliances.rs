//! Alliance System
//!
//! Characters look for allies among those who share their ideology or an
//! identity group. Alliances drift in strength, lose members who have
//! fallen out with each other, and break when they grow too weak.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::info;

use crate::components::alliance::{AlliancePurpose, AllianceRegistry};
use crate::components::character::{Allies, CharacterId, CharacterName, Groups, Ideology, Role};
use crate::components::memory::Memories;
use crate::components::ship::ShipState;
use crate::components::social::{RelationshipGraph, RelationshipType};
use crate::config::Tuning;
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, VoyageEvent};
use crate::SimRng;

use super::roster::Roster;

/// What a character brings to an alliance
#[derive(Debug, Clone)]
struct Prospect {
    name: String,
    role: Role,
    ideology: Ideology,
    groups: Groups,
    /// Characters this one blames for past incidents
    grudges: Vec<u32>,
}

/// Why two characters would band together, if they would at all.
///
/// A shared enemy binds tightest, then a shared ideology, then a shared
/// identity group.
pub fn bond_between(
    a_ideology: Ideology,
    a_groups: &Groups,
    a_grudges: &[u32],
    b_ideology: Ideology,
    b_groups: &Groups,
    b_grudges: &[u32],
) -> Option<AlliancePurpose> {
    let kindred = a_ideology == b_ideology || a_groups.shares_any(b_groups);
    if !kindred {
        return None;
    }
    if a_grudges.iter().any(|g| b_grudges.contains(g)) {
        Some(AlliancePurpose::SharedGrievances)
    } else if a_ideology == b_ideology {
        Some(AlliancePurpose::SharedIdeology)
    } else {
        Some(AlliancePurpose::SharedIdentity)
    }
}

fn actor(id: u32, prospects: &BTreeMap<u32, Prospect>) -> Option<ActorRef> {
    prospects
        .get(&id)
        .map(|p| ActorRef::new(id, p.name.clone(), p.role.as_str()))
}

/// System: characters seek allies and join or found alliances
pub fn form_alliances(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    ship: Res<ShipState>,
    roster: Res<Roster>,
    mut registry: ResMut<AllianceRegistry>,
    mut graph: ResMut<RelationshipGraph>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &CharacterName,
        &Role,
        &Ideology,
        &Groups,
        &Memories,
        &mut Allies,
    )>,
) {
    let rng = &mut rng.0;
    let alliances = &tuning.alliances;

    let prospects: BTreeMap<u32, Prospect> = roster
        .iter()
        .filter_map(|(id, entity)| {
            let (_, name, role, ideology, groups, memories, _) = query.get(entity).ok()?;
            Some((
                id,
                Prospect {
                    name: name.0.clone(),
                    role: *role,
                    ideology: *ideology,
                    groups: groups.clone(),
                    grudges: memories.grievances().into_keys().collect(),
                },
            ))
        })
        .collect();

    for (&id, seeker) in &prospects {
        if !rng.gen_bool(alliances.seek_chance) {
            continue;
        }

        let allied: Vec<u32> = roster
            .entity(id)
            .and_then(|e| query.get(e).ok())
            .map(|(.., allies)| allies.0.iter().copied().collect())
            .unwrap_or_default();

        let candidates: Vec<(u32, AlliancePurpose)> = prospects
            .iter()
            .filter(|(&other, _)| other != id && !allied.contains(&other))
            .filter_map(|(&other, p)| {
                bond_between(
                    seeker.ideology,
                    &seeker.groups,
                    &seeker.grudges,
                    p.ideology,
                    &p.groups,
                    &p.grudges,
                )
                .map(|purpose| (other, purpose))
            })
            .collect();
        let Some(&(partner, purpose)) = candidates.choose(rng) else {
            continue;
        };

        for (who, with) in [(id, partner), (partner, id)] {
            if let Some(entity) = roster.entity(who) {
                if let Ok((.., mut allies)) = query.get_mut(entity) {
                    allies.add(with);
                }
            }
        }
        graph.add_relationship(
            id,
            partner,
            tuning.relationships.alliance_edge_strength,
            RelationshipType::Alliance,
        );

        let actors = [id, partner].into_iter().filter_map(|who| actor(who, &prospects));
        let event = match registry.find_for_either_mut(id, partner) {
            Some(existing) => {
                existing.add_member(id);
                existing.add_member(partner);
                info!(
                    day = ship.day,
                    alliance = %existing.alliance_id,
                    "{} and {} joined an existing alliance",
                    seeker.name,
                    prospects[&partner].name
                );
                VoyageEvent::new(
                    day_events.generate_id(),
                    ship.day,
                    EventType::Alliance,
                    "joined",
                    format!("{} and {} joined {}", seeker.name, prospects[&partner].name, existing.alliance_id),
                )
                .with_actors(actors)
                .with_outcome(existing.alliance_id.clone())
            }
            None => {
                let alliance_id =
                    registry.create([id, partner], purpose, alliances.initial_strength, ship.day);
                info!(
                    day = ship.day,
                    alliance = %alliance_id,
                    "new alliance: {} & {} ({})",
                    seeker.name,
                    prospects[&partner].name,
                    purpose.describe()
                );
                let mut event = VoyageEvent::new(
                    day_events.generate_id(),
                    ship.day,
                    EventType::Alliance,
                    "formed",
                    format!("{} & {}: {}", seeker.name, prospects[&partner].name, purpose.describe()),
                )
                .with_actors(actors)
                .with_outcome(alliance_id);
                if purpose == AlliancePurpose::SharedGrievances {
                    event = event.with_tag(drama_tags::POWER_STRUGGLE);
                }
                event
            }
        };
        day_events.push(event);
    }
}

/// System: alliances lose feuding members, drift in strength and break
pub fn update_alliances(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    ship: Res<ShipState>,
    roster: Res<Roster>,
    mut registry: ResMut<AllianceRegistry>,
    graph: Res<RelationshipGraph>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(&CharacterName, &Role, &mut Allies)>,
) {
    let rng = &mut rng.0;
    let alliances = &tuning.alliances;
    let mut departures: Vec<(u32, Vec<u32>)> = Vec::new();
    let mut dissolved: Vec<Vec<u32>> = Vec::new();

    for alliance in registry.active_mut() {
        let feuding: Vec<u32> = alliance
            .members
            .iter()
            .copied()
            .filter(|&m| {
                alliance.members.iter().any(|&o| {
                    o != m
                        && graph
                            .get(m, o)
                            .map_or(false, |r| r.relationship_type == RelationshipType::Conflict)
                })
            })
            .collect();
        // The first feuding member walks out; the rest may follow on later days
        if let Some(&leaver) = feuding.first() {
            let remaining: Vec<u32> = alliance.members.iter().copied().filter(|&m| m != leaver).collect();
            alliance.remove_member(leaver);
            let event = VoyageEvent::new(
                day_events.generate_id(),
                ship.day,
                EventType::Alliance,
                "member_left",
                format!("Character {} left {}", leaver, alliance.alliance_id),
            )
            .with_outcome(alliance.alliance_id.clone());
            day_events.push(with_names(event, &[leaver], &roster, &query));
            departures.push((leaver, remaining));
        }

        if alliance.is_active() && rng.gen_bool(alliances.drift_chance) {
            let amplitude = alliances.drift_amplitude;
            alliance.strength = (alliance.strength + rng.gen_range(-amplitude..=amplitude)).clamp(0.0, 100.0);
        }

        if alliance.is_active() && alliance.strength < alliances.break_threshold {
            alliance.broken = true;
        }

        if alliance.broken {
            info!(day = ship.day, alliance = %alliance.alliance_id, "alliance broke apart ({})", alliance.purpose.describe());
            let members: Vec<u32> = alliance.members.iter().copied().collect();
            let event = VoyageEvent::new(
                day_events.generate_id(),
                ship.day,
                EventType::Alliance,
                "broken",
                format!("{} broke apart", alliance.alliance_id),
            )
            .with_outcome(alliance.alliance_id.clone());
            day_events.push(with_names(event, &members, &roster, &query));
            dissolved.push(members);
        }
    }

    for (leaver, remaining) in departures {
        unlink(&mut query, &roster, leaver, &remaining);
    }
    for members in dissolved {
        for &m in &members {
            unlink(&mut query, &roster, m, &members);
        }
    }
}

fn with_names(
    event: VoyageEvent,
    ids: &[u32],
    roster: &Roster,
    query: &Query<(&CharacterName, &Role, &mut Allies)>,
) -> VoyageEvent {
    let actors = ids.iter().filter_map(|&id| {
        let (name, role, _) = query.get(roster.entity(id)?).ok()?;
        Some(ActorRef::new(id, name.0.clone(), role.as_str()))
    });
    event.with_actors(actors)
}

/// Remove the ally links between `who` and each of `others`, both ways
fn unlink(query: &mut Query<(&CharacterName, &Role, &mut Allies)>, roster: &Roster, who: u32, others: &[u32]) {
    for &other in others {
        if other == who {
            continue;
        }
        for (a, b) in [(who, other), (other, who)] {
            if let Some(entity) = roster.entity(a) {
                if let Ok((_, _, mut allies)) = query.get_mut(entity) {
                    allies.remove(b);
                }
            }
        }
    }
}
