//! Voyage Systems
//!
//! The ship drifts a little further each day and the crew feels the cold.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::character::{GroupIdentity, Groups, Mood, Needs};
use crate::components::ship::ShipState;
use crate::config::Tuning;

/// System: move the ship along its course and recompute danger
pub fn drift_ship(tuning: Res<Tuning>, mut ship: ResMut<ShipState>) {
    ship.drift(tuning.voyage.heading_drift_per_day);
    debug!(
        day = ship.day,
        heading = ship.heading,
        danger = ship.danger_level,
        temperature = ship.temperature,
        "ship drifted"
    );
}

/// System: cold and danger wear on everyone aboard
pub fn apply_environment(
    tuning: Res<Tuning>,
    ship: Res<ShipState>,
    mut query: Query<(&Groups, &mut Needs, &mut Mood)>,
) {
    let voyage = &tuning.voyage;
    let danger = ship.danger_level;

    for (groups, mut needs, mut mood) in query.iter_mut() {
        needs.update(&[
            ("warmth", -danger * voyage.warmth_loss_per_danger),
            ("safety", -danger * voyage.safety_loss_per_danger),
        ]);
        mood.add_stress(danger * voyage.stress_per_danger);
        if !groups.contains(GroupIdentity::Authority) {
            mood.adjust_trust(-danger * voyage.trust_loss_per_danger);
        }
    }
}
