//! Leadership Systems
//!
//! Every identity group keeps the best orator as its spokesperson. When the
//! crew stops trusting the captain, the strongest spokesperson may take over.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::components::character::{CharacterId, CharacterName, Mood, Role, Standing};
use crate::components::group::GroupRegistry;
use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::events::{drama_tags, ActorRef, DayEvents, EventType, VoyageEvent};

use super::roster::Roster;

/// System: re-elect every group's spokesperson and refresh the flags
pub fn elect_spokespersons(
    ship: Res<ShipState>,
    roster: Res<Roster>,
    mut groups: ResMut<GroupRegistry>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(&CharacterName, &Role, &mut Standing)>,
) {
    let oratory: BTreeMap<u32, f32> = roster
        .iter()
        .filter_map(|(id, entity)| {
            let (_, _, standing) = query.get(entity).ok()?;
            Some((id, standing.oratory()))
        })
        .collect();

    let mut changes = Vec::new();
    for group in groups.all_mut() {
        let previous = group.spokesperson;
        if let Some(elected) = group.elect_spokesperson(&oratory) {
            if previous != Some(elected) {
                changes.push((group.identity, elected));
            }
        }
    }

    let spokespersons = groups.spokespersons();
    for (id, entity) in roster.iter() {
        if let Ok((.., mut standing)) = query.get_mut(entity) {
            let speaks = spokespersons.contains(&id);
            if standing.is_spokesperson != speaks {
                standing.is_spokesperson = speaks;
            }
        }
    }

    for (identity, id) in changes {
        let Some(entity) = roster.entity(id) else { continue };
        let Ok((name, role, _)) = query.get(entity) else {
            continue;
        };
        debug!(day = ship.day, group = identity.as_str(), "{} speaks for the group", name.0);
        let event = VoyageEvent::new(
            day_events.generate_id(),
            ship.day,
            EventType::Leadership,
            "spokesperson_elected",
            format!("{} now speaks for the {}", name.0, identity.as_str()),
        )
        .with_actor(ActorRef::new(id, name.0.clone(), role.as_str()))
        .with_groups([identity.as_str().to_string()]);
        day_events.push(event);
    }
}

/// Mean trust in the captain among everyone but the captain
pub fn crew_trust(trust: &BTreeMap<u32, f32>, captain: u32) -> Option<f32> {
    let crew: Vec<f32> = trust
        .iter()
        .filter(|(id, _)| **id != captain)
        .map(|(_, t)| *t)
        .collect();
    if crew.is_empty() {
        return None;
    }
    Some(crew.iter().sum::<f32>() / crew.len() as f32)
}

/// System: a strong spokesperson may depose a distrusted captain
pub fn challenge_leadership(
    tuning: Res<Tuning>,
    mut ship: ResMut<ShipState>,
    mut roster: ResMut<Roster>,
    groups: Res<GroupRegistry>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(&CharacterId, &CharacterName, &mut Role, &Mood, &Standing)>,
) {
    let leadership = &tuning.leadership;
    let Some(captain) = roster.captain() else {
        return;
    };
    let Some(captain_entity) = roster.entity(captain) else {
        return;
    };

    let trust: BTreeMap<u32, f32> = roster
        .iter()
        .filter_map(|(id, entity)| {
            let (.., mood, _) = query.get(entity).ok()?;
            Some((id, mood.trust_in_captain))
        })
        .collect();
    let Some(mean_trust) = crew_trust(&trust, captain) else {
        return;
    };
    if mean_trust >= leadership.challenge_trust_threshold {
        return;
    }

    info!(day = ship.day, mean_trust, "the captain's authority is weak, a new leader may emerge");

    let mut challenger: Option<(u32, f32)> = None;
    for id in groups.spokespersons() {
        if id == captain {
            continue;
        }
        let Some(entity) = roster.entity(id) else { continue };
        let Ok((.., standing)) = query.get(entity) else {
            continue;
        };
        if challenger.map_or(true, |(_, best)| standing.influence > best) {
            challenger = Some((id, standing.influence));
        }
    }
    let Some((challenger_id, challenger_influence)) = challenger else {
        debug!("no spokesperson to challenge the captain");
        return;
    };
    let Ok((_, captain_name, _, _, captain_standing)) = query.get(captain_entity) else {
        return;
    };
    if challenger_influence <= captain_standing.influence + mean_trust {
        debug!("no leader is strong enough to take over yet");
        return;
    }
    let captain_name = captain_name.0.clone();

    let Some(challenger_entity) = roster.entity(challenger_id) else {
        return;
    };
    let Ok((_, challenger_name, mut role, ..)) = query.get_mut(challenger_entity) else {
        return;
    };
    *role = Role::Captain;
    let challenger_name = challenger_name.0.clone();
    if let Ok((_, _, mut role, ..)) = query.get_mut(captain_entity) {
        *role = Role::Deposed;
    }
    roster.set_captain(Some(challenger_id));
    ship.captain_authority = leadership.authority_after_deposition;

    info!("  {} has been deposed! {} is the new captain", captain_name, challenger_name);

    let event = VoyageEvent::new(
        day_events.generate_id(),
        ship.day,
        EventType::Leadership,
        "captain_deposed",
        format!("{} deposed {}", challenger_name, captain_name),
    )
    .with_actors([
        ActorRef::new(challenger_id, challenger_name, Role::Captain.as_str()),
        ActorRef::new(captain, captain_name, Role::Deposed.as_str()),
    ])
    .with_outcome(format!("mean crew trust {:.1}", mean_trust))
    .with_tag(drama_tags::POWER_STRUGGLE)
    .with_tag(drama_tags::CAPTAIN_INVOLVED);
    day_events.push(event);
}
