// src/crowd/mod.rs - Crowd simulation core
pub mod agent_pool;
pub mod config;
pub mod events;
pub mod instancing;
pub mod resources;
pub mod simulation;
pub mod spawn_area;
pub mod state_machine;
pub mod steering;
pub mod triangulation;

pub use agent_pool::*;
pub use config::*;
pub use events::*;
pub use instancing::*;
pub use resources::*;
pub use simulation::*;
pub use spawn_area::*;
pub use state_machine::*;
pub use steering::*;
pub use triangulation::*;
