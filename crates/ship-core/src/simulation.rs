//! Simulation Driver
//!
//! Owns the ECS world and the daily schedule, drains each day's events into
//! the statistics and the event log, and writes snapshots and the report.

use bevy_ecs::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::components::ship::ShipState;
use crate::config::Tuning;
use crate::error::Result;
use crate::events::{DayEvents, EventLogger, VoyageEvent, VoyageReport, VoyageSnapshot};
use crate::output::{capture, generate_snapshot, write_report, write_snapshot, SnapshotGenerator, StatsCollector};
use crate::setup::init_world;
use crate::systems::*;

pub const EVENT_LOG_FILE: &str = "events.jsonl";
pub const SNAPSHOT_DIR: &str = "snapshots";
pub const REPORT_FILE: &str = "report.json";

/// The daily cycle, in order
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    // The ship moves and the crew feels it
    schedule.add_systems((build_roster, drift_ship, apply_environment, update_psychology).chain());

    // What happens to them, and what they do about it
    schedule.add_systems(
        (
            generate_incidents,
            trigger_crisis,
            make_decisions,
            form_alliances,
            update_alliances,
            hold_discussion,
        )
            .chain()
            .after(update_psychology),
    );

    // Power on board, then fate
    schedule.add_systems(
        (
            organize_protest,
            attempt_mutiny,
            elect_spokespersons,
            challenge_leadership,
            decay_relationships,
            determine_fate,
        )
            .chain()
            .after(hold_discussion),
    );

    schedule
}

/// A seeded voyage
pub struct Simulation {
    pub world: World,
    schedule: Schedule,
    seed: u64,
    logger: EventLogger,
    output_dir: Option<PathBuf>,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let snapshot_interval = tuning.output.snapshot_interval;
        let mut world = init_world(seed, tuning);
        world.insert_resource(SnapshotGenerator::new(snapshot_interval));
        world.insert_resource(StatsCollector::new());

        Self {
            world,
            schedule: build_schedule(),
            seed,
            logger: EventLogger::null(),
            output_dir: None,
        }
    }

    /// Record events, snapshots and the report under `dir`.
    ///
    /// Fails if the event log cannot be opened.
    pub fn record_to(&mut self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        self.logger = EventLogger::new(dir.join(EVENT_LOG_FILE))?;
        self.output_dir = Some(dir.to_path_buf());
        info!(dir = %dir.display(), "recording voyage");
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ship(&self) -> &ShipState {
        self.world.resource::<ShipState>()
    }

    pub fn is_over(&self) -> bool {
        self.ship().sunk
    }

    pub fn stats(&self) -> &StatsCollector {
        self.world.resource::<StatsCollector>()
    }

    /// Run one day and return its events. A sunk ship does nothing.
    pub fn run_day(&mut self) -> Result<Vec<VoyageEvent>> {
        if self.is_over() {
            return Ok(Vec::new());
        }
        let day = self.ship().day;

        self.schedule.run(&mut self.world);

        let events = self.world.resource_mut::<DayEvents>().drain();
        self.world.resource_mut::<StatsCollector>().record_day(day, &events);
        self.logger.log_batch(&events)?;

        let due = self.world.resource::<SnapshotGenerator>().should_snapshot(day);
        if due && !self.is_over() {
            self.snapshot("periodic");
        }
        Ok(events)
    }

    /// Run up to `days` days, stopping early if the ship sinks
    pub fn run(&mut self, days: u32) -> Result<VoyageReport> {
        for _ in 0..days {
            if self.is_over() {
                break;
            }
            self.run_day()?;
        }
        Ok(self.report())
    }

    /// Take a numbered snapshot, writing it out when recording
    pub fn snapshot(&mut self, triggered_by: &str) -> VoyageSnapshot {
        let snapshot = generate_snapshot(&mut self.world, triggered_by);
        if let Some(dir) = &self.output_dir {
            if let Err(e) = write_snapshot(&dir.join(SNAPSHOT_DIR), &snapshot) {
                warn!(snapshot = %snapshot.snapshot_id, error = %e, "could not write snapshot");
            }
        }
        snapshot
    }

    /// Current state for status display; does not consume a snapshot id
    pub fn status(&mut self) -> VoyageSnapshot {
        capture(&mut self.world, "status".to_string(), "status")
    }

    pub fn report(&mut self) -> VoyageReport {
        let stats = self
            .world
            .remove_resource::<StatsCollector>()
            .unwrap_or_default();
        let report = stats.build_report(&mut self.world, self.seed);
        self.world.insert_resource(stats);
        report
    }

    /// Final snapshot, report and log flush
    pub fn finish(&mut self) -> Result<VoyageReport> {
        self.snapshot("simulation_end");
        let report = self.report();
        if let Some(dir) = &self.output_dir {
            write_report(&dir.join(REPORT_FILE), &report)?;
        }
        self.logger.flush()?;
        info!(
            events = self.logger.event_count(),
            outcome = ?report.outcome,
            days = report.days_survived,
            "voyage finished"
        );
        Ok(report)
    }
}
