//! Ship State
//!
//! The vessel itself: where it is heading, how cold and dangerous the water
//! has become, and the institutional mood on board.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Heading of the safe southern waters
pub const SOUTH: f32 = 180.0;
/// Temperature (Celsius) in safe waters
pub const BASE_TEMPERATURE: f32 = 15.0;
/// Temperature drop between safe waters and the ice
pub const TEMPERATURE_RANGE: f32 = 20.0;

/// Which way the ship is being steered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Course {
    /// Toward the icebergs
    #[default]
    North,
    /// Back toward safety
    South,
}

/// Resource: global state of the ship
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ShipState {
    /// Current day, starting at 1
    pub day: u32,
    /// 0 = due north (icebergs), 180 = south (safety)
    pub heading: f32,
    pub course: Course,
    pub temperature: f32,
    /// 0..100
    pub danger_level: f32,
    /// 0..100
    pub captain_authority: f32,
    /// 0..100
    pub social_cohesion: f32,
    /// 0..100
    pub philosophical_tension: f32,
    pub sunk: bool,
}

impl Default for ShipState {
    fn default() -> Self {
        Self::new(SOUTH)
    }
}

impl ShipState {
    pub fn new(start_heading: f32) -> Self {
        let mut ship = Self {
            day: 1,
            heading: start_heading.clamp(0.0, SOUTH),
            course: Course::North,
            temperature: BASE_TEMPERATURE,
            danger_level: 0.0,
            captain_authority: 100.0,
            social_cohesion: 70.0,
            philosophical_tension: 30.0,
            sunk: false,
        };
        ship.calculate_danger();
        ship
    }

    /// Danger grows as the heading approaches due north; the water cools with it
    pub fn calculate_danger(&mut self) {
        self.danger_level = ((SOUTH - self.heading) / SOUTH * 100.0).clamp(0.0, 100.0);
        self.temperature = BASE_TEMPERATURE - (self.danger_level / 100.0) * TEMPERATURE_RANGE;
    }

    /// Move the heading one day's drift along the current course
    pub fn drift(&mut self, degrees: f32) {
        self.heading = match self.course {
            Course::North => (self.heading - degrees).max(0.0),
            Course::South => (self.heading + degrees).min(SOUTH),
        };
        self.calculate_danger();
    }

    /// Turn the ship around, heading straight for safety
    pub fn turn_south(&mut self) {
        self.course = Course::South;
        self.heading = SOUTH;
        self.calculate_danger();
    }

    pub fn adjust_authority(&mut self, delta: f32) {
        self.captain_authority = (self.captain_authority + delta).clamp(0.0, 100.0);
    }

    pub fn adjust_cohesion(&mut self, delta: f32) {
        self.social_cohesion = (self.social_cohesion + delta).clamp(0.0, 100.0);
    }

    pub fn adjust_tension(&mut self, delta: f32) {
        self.philosophical_tension = (self.philosophical_tension + delta).clamp(0.0, 100.0);
    }

    /// Degrees travelled north of the safe heading
    pub fn degrees_north(&self) -> f32 {
        SOUTH - self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_from_heading() {
        let mut ship = ShipState::new(SOUTH);
        assert_eq!(ship.danger_level, 0.0);
        assert_eq!(ship.temperature, 15.0);

        ship.heading = 90.0;
        ship.calculate_danger();
        assert!((ship.danger_level - 50.0).abs() < 0.001);
        assert!((ship.temperature - 5.0).abs() < 0.001);

        ship.heading = 0.0;
        ship.calculate_danger();
        assert_eq!(ship.danger_level, 100.0);
        assert!((ship.temperature + 5.0).abs() < 0.001);
    }

    #[test]
    fn test_drift_floors_at_north() {
        let mut ship = ShipState::new(4.0);
        ship.drift(6.0);
        assert_eq!(ship.heading, 0.0);
        assert_eq!(ship.danger_level, 100.0);
    }

    #[test]
    fn test_turn_south_reverses_drift() {
        let mut ship = ShipState::new(30.0);
        ship.turn_south();
        assert_eq!(ship.course, Course::South);
        assert_eq!(ship.danger_level, 0.0);
        ship.drift(6.0);
        assert_eq!(ship.heading, SOUTH);
    }

    #[test]
    fn test_institutional_values_clamped() {
        let mut ship = ShipState::default();
        ship.adjust_authority(-150.0);
        ship.adjust_cohesion(50.0);
        ship.adjust_tension(-40.0);
        assert_eq!(ship.captain_authority, 0.0);
        assert_eq!(ship.social_cohesion, 100.0);
        assert_eq!(ship.philosophical_tension, 0.0);
    }
}
