//! Crisis System
//!
//! Occasionally a ship-wide crisis strikes. Its effects are scaled by a
//! random severity and bent by each character's psychological state.

use bevy_ecs::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, info};

use crate::components::character::{
    CharacterId, Dispositions, Emotions, Mood, PsychologicalState, Psyche, Wellbeing,
};
use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::events::catalog::{CrisisEffects, CrisisKind};
use crate::events::{drama_tags, DayEvents, EventType, Impact, VoyageEvent};
use crate::SimRng;

/// Multipliers applied to crisis-driven leanings per psychological state
pub mod crisis_constants {
    pub const PARANOID_REBELLION: f32 = 1.5;
    pub const DEPRESSED_AMPLIFIER: f32 = 1.5;
    pub const COOPERATIVE_DAMPENER: f32 = 0.5;
    pub const ANGRY_REBELLION: f32 = 2.0;
}

use crisis_constants::*;

/// Draw a crisis kind by weight
pub fn pick_crisis(rng: &mut impl Rng) -> CrisisKind {
    let weights = CrisisKind::ALL.map(|c| c.weight());
    match WeightedIndex::new(weights) {
        Ok(dist) => CrisisKind::ALL[dist.sample(rng)],
        Err(_) => CrisisKind::FoodShortage,
    }
}

/// Shift a character's cooperation and rebellion leanings.
///
/// The base leaning moves with the crisis, then the psychological state
/// adds its own reaction on top.
pub fn shift_dispositions(
    dispositions: &mut Dispositions,
    effects: &CrisisEffects,
    severity: f32,
    state: PsychologicalState,
) {
    let coop_up = effects.cooperation_gain * severity;
    let coop_down = effects.cooperation_loss * severity;
    let rebel_up = effects.rebellion_gain * severity;

    dispositions.shift_cooperation(coop_up - coop_down);
    dispositions.shift_rebellion(rebel_up);

    match state {
        PsychologicalState::Paranoid => {
            dispositions.shift_cooperation(-coop_down);
            dispositions.shift_rebellion(rebel_up * (PARANOID_REBELLION - 1.0));
        }
        PsychologicalState::Cooperative => {
            dispositions.shift_cooperation(coop_up * COOPERATIVE_DAMPENER);
            dispositions.shift_rebellion(-rebel_up * COOPERATIVE_DAMPENER);
        }
        PsychologicalState::Depressed => {
            dispositions.shift_cooperation(-coop_down * DEPRESSED_AMPLIFIER);
            dispositions.shift_rebellion(rebel_up * DEPRESSED_AMPLIFIER);
        }
        PsychologicalState::Angry => {
            dispositions.shift_rebellion(rebel_up * ANGRY_REBELLION);
        }
        PsychologicalState::Normal => {}
    }
}

/// System: maybe trigger a crisis and apply it to everyone aboard
pub fn trigger_crisis(
    tuning: Res<Tuning>,
    mut rng: ResMut<SimRng>,
    ship: Res<ShipState>,
    mut day_events: ResMut<DayEvents>,
    mut query: Query<(
        &CharacterId,
        &Psyche,
        &mut Wellbeing,
        &mut Emotions,
        &mut Mood,
        &mut Dispositions,
    )>,
) {
    let rng = &mut rng.0;
    let crises = &tuning.crises;
    if !rng.gen_bool(crises.crisis_chance) {
        return;
    }

    let kind = pick_crisis(rng);
    let severity = if crises.min_severity < crises.max_severity {
        rng.gen_range(crises.min_severity..crises.max_severity)
    } else {
        crises.min_severity
    };
    let effects = kind.effects();
    info!(day = ship.day, crisis = kind.subtype(), severity, "crisis strikes");

    for (id, psyche, mut wellbeing, mut emotions, mut mood, mut dispositions) in query.iter_mut() {
        wellbeing.physiological = (wellbeing.physiological - effects.hunger * severity).max(0.0);
        wellbeing.psychological =
            (wellbeing.psychological - effects.moral_distress * severity).max(0.0);
        emotions.raise_anger(effects.conflict * severity);
        mood.add_stress(effects.stress * severity * 100.0);
        mood.adjust_trust(-effects.trust_loss * severity * 100.0);
        shift_dispositions(&mut dispositions, &effects, severity, psyche.state);
        debug!(character = id.0, state = psyche.state.as_str(), "absorbed crisis");
    }

    let mut impacts = Vec::new();
    for (name, value) in [
        ("hunger", effects.hunger),
        ("moral_distress", effects.moral_distress),
        ("conflict", effects.conflict),
        ("stress", effects.stress),
        ("trust", -effects.trust_loss),
        ("cooperation", effects.cooperation_gain - effects.cooperation_loss),
        ("rebellion", effects.rebellion_gain),
    ] {
        if value != 0.0 {
            impacts.push(Impact::new(name, value * severity));
        }
    }

    let mut event = VoyageEvent::new(
        day_events.generate_id(),
        ship.day,
        EventType::Crisis,
        kind.subtype(),
        kind.description(),
    )
    .with_impacts(impacts)
    .with_outcome(format!("severity {:.2}", severity));
    event = match kind {
        CrisisKind::FoodShortage => event.with_tag(drama_tags::RESOURCE_SCARCITY),
        CrisisKind::SilentRebellion => event.with_tag(drama_tags::POWER_STRUGGLE),
        CrisisKind::EngineBreakdown => event.with_tag(drama_tags::EXISTENTIAL_THREAT),
        CrisisKind::PhilosophicalDilemma => event.with_tag(drama_tags::IDEOLOGICAL_CLASH),
    };
    day_events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rebellion_after(state: PsychologicalState) -> f32 {
        let mut d = Dispositions::default();
        shift_dispositions(&mut d, &CrisisKind::SilentRebellion.effects(), 0.5, state);
        d.rebellion_bias
    }

    #[test]
    fn test_state_modulates_rebellion() {
        let normal = rebellion_after(PsychologicalState::Normal);
        assert!((normal - 0.25).abs() < 1e-6);
        assert!(rebellion_after(PsychologicalState::Angry) > rebellion_after(PsychologicalState::Depressed));
        assert!(rebellion_after(PsychologicalState::Depressed) > rebellion_after(PsychologicalState::Paranoid));
        assert!(rebellion_after(PsychologicalState::Paranoid) > normal);
        assert!(rebellion_after(PsychologicalState::Cooperative) < normal);
    }

    #[test]
    fn test_cooperative_state_amplifies_volunteering() {
        let mut calm = Dispositions::default();
        let mut normal = Dispositions::default();
        let effects = CrisisKind::EngineBreakdown.effects();
        shift_dispositions(&mut calm, &effects, 1.0, PsychologicalState::Cooperative);
        shift_dispositions(&mut normal, &effects, 1.0, PsychologicalState::Normal);
        assert!((normal.cooperation_bias - 0.4).abs() < 1e-6);
        assert!((calm.cooperation_bias - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_pick_covers_kinds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut food = 0;
        let mut dilemma = 0;
        for _ in 0..2000 {
            match pick_crisis(&mut rng) {
                CrisisKind::FoodShortage => food += 1,
                CrisisKind::PhilosophicalDilemma => dilemma += 1,
                _ => {}
            }
        }
        assert!(food > dilemma * 2);
        assert!(dilemma > 0);
    }

    #[test]
    fn test_certain_crisis_is_recorded_and_applied() {
        let mut tuning = Tuning::default();
        tuning.crises.crisis_chance = 1.0;

        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(SimRng(SmallRng::seed_from_u64(11)));
        world.insert_resource(ShipState::default());
        world.insert_resource(DayEvents::new());
        let entity = world
            .spawn((
                CharacterId(1),
                Psyche::default(),
                Wellbeing::default(),
                Emotions::default(),
                Mood::default(),
                Dispositions::default(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(trigger_crisis);
        schedule.run(&mut world);

        let day = world.resource::<DayEvents>();
        assert_eq!(day.len(), 1);
        let event = &day.events[0];
        assert_eq!(event.event_type, EventType::Crisis);
        assert!(EventType::Crisis.is_valid_subtype(&event.subtype));

        // Every crisis leaves some trace on the character
        let wellbeing = world.get::<Wellbeing>(entity).unwrap();
        let mood = world.get::<Mood>(entity).unwrap();
        let dispositions = world.get::<Dispositions>(entity).unwrap();
        let touched = wellbeing.physiological < 1.0
            || wellbeing.psychological < 1.0
            || mood.stress > 50.0
            || mood.trust_in_captain < 70.0
            || dispositions.cooperation_bias > 0.0
            || dispositions.rebellion_bias > 0.0;
        assert!(touched);
    }
}
