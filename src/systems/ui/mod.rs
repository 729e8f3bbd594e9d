// src/systems/ui/mod.rs
pub mod crowd_panel;
pub mod hud;

pub use crowd_panel::*;
pub use hud::*;
