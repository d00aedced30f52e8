//! Psychology System
//!
//! Daily emotional drift: wellbeing wears down, unmet needs breed anger,
//! fear follows the danger and hope fades with it.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::character::{
    CharacterId, Dispositions, Emotions, Needs, PsychologicalState, Psyche, Wellbeing,
};
use crate::components::ship::ShipState;
use crate::config::Tuning;

/// Constants for emotional drift
pub mod psychology_constants {
    /// Physiological wellbeing below which hunger turns into anger
    pub const HUNGER_ANGER_THRESHOLD: f32 = 0.2;
    /// Danger below which hope recovers instead of fading
    pub const HOPEFUL_DANGER: f32 = 30.0;
    /// Danger at which hope fades at the base rate
    pub const HOPE_FADE_SCALE: f32 = 50.0;
}

use psychology_constants::*;

/// Change in hope for a day spent at the given danger level
pub fn hope_drift(danger: f32, recovery: f32) -> f32 {
    if danger < HOPEFUL_DANGER {
        recovery
    } else {
        -recovery * danger / HOPE_FADE_SCALE
    }
}

/// System: update emotions and re-evaluate psychological state
pub fn update_psychology(
    tuning: Res<Tuning>,
    ship: Res<ShipState>,
    mut query: Query<(
        &CharacterId,
        &Needs,
        &mut Emotions,
        &mut Wellbeing,
        &mut Psyche,
        &mut Dispositions,
    )>,
) {
    let psychology = &tuning.psychology;

    for (id, needs, mut emotions, mut wellbeing, mut psyche, mut dispositions) in query.iter_mut() {
        wellbeing.decay(psychology.wellbeing_decay);

        if wellbeing.physiological < HUNGER_ANGER_THRESHOLD || needs.has_critical() {
            emotions.raise_anger(psychology.anger_gain);
        }
        emotions.fear = (ship.danger_level / 100.0).clamp(0.0, 1.0);
        emotions.raise_hope(hope_drift(ship.danger_level, psychology.hope_recovery));

        let previous = psyche.state;
        psyche.state = PsychologicalState::evaluate(psyche.trauma, &emotions, &wellbeing);
        if psyche.state != previous {
            debug!(
                character = id.0,
                from = previous.as_str(),
                to = psyche.state.as_str(),
                "psychological state changed"
            );
        }

        dispositions.fade(psychology.disposition_retention);
    }
}
