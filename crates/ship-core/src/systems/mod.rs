//! ECS Systems
//!
//! The daily cycle: drift, environment, psychology, incidents, crises,
//! decisions, alliances, discourse, unrest, leadership and fate.

pub mod roster;
pub mod voyage;
pub mod psychology;
pub mod incidents;
pub mod crises;
pub mod decision;
pub mod alliances;
pub mod discourse;
pub mod unrest;
pub mod leadership;
pub mod fate;

// Re-export commonly used systems
pub use roster::{build_roster, Roster};
pub use voyage::{apply_environment, drift_ship};
pub use psychology::update_psychology;
pub use incidents::{generate_incidents, roll_incidents};
pub use crises::{pick_crisis, trigger_crisis};
pub use decision::{choose_decision, make_decisions, Decision, DecisionInputs};
pub use alliances::{bond_between, form_alliances, update_alliances};
pub use discourse::hold_discussion;
pub use unrest::{attempt_mutiny, organize_protest};
pub use leadership::{challenge_leadership, elect_spokespersons};
pub use fate::{decay_relationships, determine_fate};
