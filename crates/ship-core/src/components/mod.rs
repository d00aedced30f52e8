//! ECS Components
//!
//! Components for characters and their memories, plus the shared resources
//! describing the ship, the social graph, alliances and identity groups.

pub mod character;
pub mod memory;
pub mod ship;
pub mod social;
pub mod alliance;
pub mod group;

pub use character::*;
pub use memory::*;
pub use ship::*;
pub use social::*;
pub use alliance::*;
pub use group::*;
