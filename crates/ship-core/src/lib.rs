//! Ship of Fools
//!
//! A day-stepped agent-based simulation of a ship drifting north into the
//! ice while its passengers argue, ally, protest and mutiny.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::Tuning;
pub use error::{ConfigError, SimError};
pub use simulation::Simulation;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
