//! Statistics Output
//!
//! Counts what happened over the voyage and builds the final report.

use bevy_ecs::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::components::character::{Character, Mood, Needs};
use crate::components::ship::{Course, ShipState};
use crate::error::Result;
use crate::events::{generate_run_id, EventType, VoyageEvent, VoyageOutcome, VoyageReport};

/// Summary of a day for history
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub day: u32,
    pub event_count: usize,
    pub drama_tags: usize,
}

/// Resource to accumulate statistics during the voyage
#[derive(Resource, Debug, Default)]
pub struct StatsCollector {
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub protests: usize,
    pub mutinies_attempted: usize,
    pub mutinies_succeeded: usize,
    pub leadership_changes: usize,
    pub alliances_formed: usize,
    pub alliances_broken: usize,
    pub day_history: Vec<DaySummary>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the events of one day
    pub fn record_day(&mut self, day: u32, events: &[VoyageEvent]) {
        let mut drama_tags = 0;

        for event in events {
            self.total_events += 1;
            *self
                .events_by_type
                .entry(event.event_type.as_str().to_string())
                .or_insert(0) += 1;
            drama_tags += event.drama_tags.len();

            match (event.event_type, event.subtype.as_str()) {
                (EventType::Protest, _) => self.protests += 1,
                (EventType::Mutiny, subtype) => {
                    self.mutinies_attempted += 1;
                    if subtype == "succeeded" {
                        self.mutinies_succeeded += 1;
                        self.leadership_changes += 1;
                    }
                }
                (EventType::Leadership, "captain_deposed") => self.leadership_changes += 1,
                (EventType::Alliance, "formed") => self.alliances_formed += 1,
                (EventType::Alliance, "broken") => self.alliances_broken += 1,
                _ => {}
            }
        }

        self.day_history.push(DaySummary {
            day,
            event_count: events.len(),
            drama_tags,
        });
    }

    /// Build the end-of-voyage report from the collected counts and the final world
    pub fn build_report(&self, world: &mut World, seed: u64) -> VoyageReport {
        let mut stress = Vec::new();
        let mut demands = BTreeSet::new();
        {
            let mut query = world.query_filtered::<(&Mood, &Needs), With<Character>>();
            for (mood, needs) in query.iter(world) {
                stress.push(mood.stress);
                demands.extend(needs.critical());
            }
        }
        let average_stress = if stress.is_empty() {
            0.0
        } else {
            stress.iter().sum::<f32>() / stress.len() as f32
        };

        let ship = world.resource::<ShipState>();
        let (outcome, days_survived) = if ship.sunk {
            (VoyageOutcome::Sunk, ship.day)
        } else if ship.course == Course::South {
            (VoyageOutcome::TurnedSouth, ship.day.saturating_sub(1))
        } else {
            (VoyageOutcome::StillSailing, ship.day.saturating_sub(1))
        };

        VoyageReport {
            run_id: generate_run_id(),
            seed,
            days_survived,
            outcome,
            protests: self.protests,
            mutinies_attempted: self.mutinies_attempted,
            mutinies_succeeded: self.mutinies_succeeded,
            leadership_changes: self.leadership_changes,
            alliances_formed: self.alliances_formed,
            alliances_broken: self.alliances_broken,
            final_captain_authority: ship.captain_authority,
            average_stress,
            unresolved_demands: demands.into_iter().collect(),
            events_by_type: self.events_by_type.clone(),
            total_events: self.total_events,
        }
    }
}

/// Write the report as pretty JSON
pub fn write_report(path: &Path, report: &VoyageReport) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::CharacterId;

    fn event(event_type: EventType, subtype: &str) -> VoyageEvent {
        VoyageEvent::new("evt_00000001", 1, event_type, subtype, "test")
    }

    #[test]
    fn test_stats_collector_new() {
        let collector = StatsCollector::new();
        assert_eq!(collector.total_events, 0);
        assert!(collector.events_by_type.is_empty());
    }

    #[test]
    fn test_record_day_counts_by_kind() {
        let mut collector = StatsCollector::new();
        collector.record_day(
            1,
            &[
                event(EventType::Protest, "organized"),
                event(EventType::Mutiny, "failed"),
                event(EventType::Alliance, "formed"),
                event(EventType::Alliance, "formed").with_tag("power_struggle"),
            ],
        );
        collector.record_day(
            2,
            &[
                event(EventType::Mutiny, "succeeded"),
                event(EventType::Leadership, "captain_deposed"),
                event(EventType::Leadership, "spokesperson_elected"),
                event(EventType::Alliance, "broken"),
            ],
        );

        assert_eq!(collector.total_events, 8);
        assert_eq!(collector.protests, 1);
        assert_eq!(collector.mutinies_attempted, 2);
        assert_eq!(collector.mutinies_succeeded, 1);
        assert_eq!(collector.leadership_changes, 2);
        assert_eq!(collector.alliances_formed, 2);
        assert_eq!(collector.alliances_broken, 1);
        assert_eq!(collector.events_by_type["alliance"], 3);
        assert_eq!(collector.day_history.len(), 2);
        assert_eq!(collector.day_history[0].drama_tags, 1);
    }

    #[test]
    fn test_report_lists_unresolved_demands() {
        let mut world = World::new();
        let mut ship = ShipState::new(0.0);
        ship.sunk = true;
        ship.day = 12;
        world.insert_resource(ship);
        world.spawn((
            Character,
            CharacterId(1),
            Mood::new(80.0),
            Needs::new().with("warmth", 5.0).with("wage", 50.0),
        ));
        world.spawn((
            Character,
            CharacterId(2),
            Mood::new(40.0),
            Needs::new().with("truth", 10.0),
        ));

        let report = StatsCollector::new().build_report(&mut world, 42);
        assert!(report.sunk());
        assert_eq!(report.days_survived, 12);
        assert_eq!(report.seed, 42);
        assert_eq!(report.average_stress, 60.0);
        assert_eq!(report.unresolved_demands, vec!["truth", "warmth"]);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = World::new();
        world.insert_resource(ShipState::default());
        let report = StatsCollector::new().build_report(&mut world, 7);
        assert_eq!(report.outcome, VoyageOutcome::StillSailing);

        let path = dir.path().join("report.json");
        write_report(&path, &report).unwrap();
        let parsed: VoyageReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.seed, 7);
    }
}
