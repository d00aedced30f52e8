//! Configuration System
//!
//! Loads tuning parameters from a TOML file for easy adjustment without
//! recompiling. Every field has a default, so a partial file only overrides
//! what it names.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration structure
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub voyage: VoyageConfig,
    pub psychology: PsychologyConfig,
    pub incidents: IncidentConfig,
    pub crises: CrisisConfig,
    pub relationships: RelationshipConfig,
    pub alliances: AllianceConfig,
    pub discourse: DiscourseConfig,
    pub unrest: UnrestConfig,
    pub leadership: LeadershipConfig,
    pub output: OutputConfig,
}

/// Ship movement, environment and sinking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoyageConfig {
    /// Heading on day one (180 = safe southern waters)
    pub start_heading: f32,
    /// Degrees the ship moves along its course each day
    pub heading_drift_per_day: f32,
    /// Warmth lost per point of danger
    pub warmth_loss_per_danger: f32,
    /// Safety lost per point of danger
    pub safety_loss_per_danger: f32,
    /// Stress gained per point of danger
    pub stress_per_danger: f32,
    /// Trust in the captain lost per point of danger (non-authority crew)
    pub trust_loss_per_danger: f32,
    /// Danger above which the ship can sink
    pub sinking_danger_threshold: f32,
    /// Daily chance of sinking once past the threshold
    pub sinking_chance: f64,
}

impl Default for VoyageConfig {
    fn default() -> Self {
        Self {
            start_heading: 180.0,
            heading_drift_per_day: 6.0,
            warmth_loss_per_danger: 1.0 / 20.0,
            safety_loss_per_danger: 1.0 / 30.0,
            stress_per_danger: 1.0 / 40.0,
            trust_loss_per_danger: 1.0 / 50.0,
            sinking_danger_threshold: 90.0,
            sinking_chance: 0.3,
        }
    }
}

/// Emotional dynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PsychologyConfig {
    /// Daily loss of each wellbeing dimension
    pub wellbeing_decay: f32,
    /// Anger gained on a day with unmet needs
    pub anger_gain: f32,
    /// Hope recovered per day in safe waters
    pub hope_recovery: f32,
    /// Fraction of crisis-driven leanings kept each day
    pub disposition_retention: f32,
}

impl Default for PsychologyConfig {
    fn default() -> Self {
        Self {
            wellbeing_decay: 0.01,
            anger_gain: 0.05,
            hope_recovery: 0.02,
            disposition_retention: 0.9,
        }
    }
}

/// Everyday incidents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentConfig {
    /// Daily chance of a random incident
    pub incident_chance: f64,
    /// Daily chance of blanket scarcity once it is cold enough
    pub scarcity_chance: f64,
    /// Temperature below which blankets run out
    pub scarcity_temperature: f32,
    /// Rations are cut every this many days (0 disables)
    pub ration_cut_interval: u32,
    /// Chance each crew member witnessed an incident
    pub witness_chance: f64,
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            incident_chance: 0.2,
            scarcity_chance: 0.4,
            scarcity_temperature: 5.0,
            ration_cut_interval: 5,
            witness_chance: 0.6,
        }
    }
}

/// Weighted ship-wide crises
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisConfig {
    pub crisis_chance: f64,
    pub min_severity: f32,
    pub max_severity: f32,
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self {
            crisis_chance: 0.2,
            min_severity: 0.5,
            max_severity: 1.0,
        }
    }
}

/// Social graph dynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    pub cooperation_delta: f32,
    pub conflict_delta: f32,
    pub decay_rate: f32,
    /// Strength of the edge created between new allies
    pub alliance_edge_strength: f32,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            cooperation_delta: 0.2,
            conflict_delta: -0.3,
            decay_rate: 0.01,
            alliance_edge_strength: 0.6,
        }
    }
}

/// Alliance formation and drift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllianceConfig {
    /// Daily chance each character looks for an ally
    pub seek_chance: f64,
    /// Daily chance an alliance's strength drifts
    pub drift_chance: f64,
    pub drift_amplitude: f32,
    /// Strength below which an alliance breaks
    pub break_threshold: f32,
    pub initial_strength: f32,
}

impl Default for AllianceConfig {
    fn default() -> Self {
        Self {
            seek_chance: 0.15,
            drift_chance: 0.1,
            drift_amplitude: 5.0,
            break_threshold: 20.0,
            initial_strength: 50.0,
        }
    }
}

/// Philosophical discussions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscourseConfig {
    pub discussion_chance: f64,
    pub max_speakers: usize,
    /// Speaking ability required to take the floor
    pub min_speaking_ability: f32,
    pub influence_gain: f32,
    pub min_tension_gain: f32,
    pub max_tension_gain: f32,
}

impl Default for DiscourseConfig {
    fn default() -> Self {
        Self {
            discussion_chance: 0.3,
            max_speakers: 3,
            min_speaking_ability: 40.0,
            influence_gain: 2.0,
            min_tension_gain: 5.0,
            max_tension_gain: 15.0,
        }
    }
}

/// Protests and mutinies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnrestConfig {
    /// Crew with critical needs required for a protest
    pub min_protesters: usize,
    /// Average stress required for a protest
    pub protest_stress_threshold: f32,
    pub max_concessions: usize,
    pub concession_authority_cost: f32,
    pub concession_need_relief: f32,
    pub concession_stress_relief: f32,
    pub concession_trust_gain: f32,
    pub protest_cohesion_cost: f32,
    /// Authority at or below which mutiny becomes possible
    pub mutiny_authority_ceiling: f32,
    /// Stressed radicals required for a mutiny
    pub min_radicals: usize,
    pub radical_stress_threshold: f32,
    pub mutiny_danger_threshold: f32,
    /// Crew below this trust in the captain back a mutiny
    pub supporter_trust_ceiling: f32,
    pub failed_mutiny_stress: f32,
    pub failed_mutiny_influence_loss: f32,
}

impl Default for UnrestConfig {
    fn default() -> Self {
        Self {
            min_protesters: 3,
            protest_stress_threshold: 60.0,
            max_concessions: 3,
            concession_authority_cost: 5.0,
            concession_need_relief: 10.0,
            concession_stress_relief: 5.0,
            concession_trust_gain: 2.0,
            protest_cohesion_cost: 3.0,
            mutiny_authority_ceiling: 40.0,
            min_radicals: 3,
            radical_stress_threshold: 70.0,
            mutiny_danger_threshold: 60.0,
            supporter_trust_ceiling: 30.0,
            failed_mutiny_stress: 15.0,
            failed_mutiny_influence_loss: 10.0,
        }
    }
}

/// Spokesperson challenges to the captain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipConfig {
    /// Mean crew trust in the captain below which a challenge happens
    pub challenge_trust_threshold: f32,
    pub authority_after_deposition: f32,
}

impl Default for LeadershipConfig {
    fn default() -> Self {
        Self {
            challenge_trust_threshold: 40.0,
            authority_after_deposition: 50.0,
        }
    }
}

/// Output cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Days between snapshots
    pub snapshot_interval: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: 10,
        }
    }
}

impl Tuning {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities: [(&'static str, f64); 8] = [
            ("voyage.sinking_chance", self.voyage.sinking_chance),
            ("incidents.incident_chance", self.incidents.incident_chance),
            ("incidents.scarcity_chance", self.incidents.scarcity_chance),
            ("incidents.witness_chance", self.incidents.witness_chance),
            ("crises.crisis_chance", self.crises.crisis_chance),
            ("alliances.seek_chance", self.alliances.seek_chance),
            ("alliances.drift_chance", self.alliances.drift_chance),
            ("discourse.discussion_chance", self.discourse.discussion_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is not a probability", value),
                });
            }
        }

        if self.voyage.heading_drift_per_day < 0.0 {
            return Err(ConfigError::Invalid {
                field: "voyage.heading_drift_per_day",
                reason: "must not be negative".to_string(),
            });
        }
        if !(0.0..=180.0).contains(&self.voyage.start_heading) {
            return Err(ConfigError::Invalid {
                field: "voyage.start_heading",
                reason: "must lie between 0 (north) and 180 (south)".to_string(),
            });
        }
        if self.alliances.drift_amplitude < 0.0 {
            return Err(ConfigError::Invalid {
                field: "alliances.drift_amplitude",
                reason: "must not be negative".to_string(),
            });
        }
        if self.crises.min_severity > self.crises.max_severity {
            return Err(ConfigError::Invalid {
                field: "crises.min_severity",
                reason: "exceeds max_severity".to_string(),
            });
        }
        if self.discourse.min_tension_gain > self.discourse.max_tension_gain {
            return Err(ConfigError::Invalid {
                field: "discourse.min_tension_gain",
                reason: "exceeds max_tension_gain".to_string(),
            });
        }
        if self.output.snapshot_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "output.snapshot_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
