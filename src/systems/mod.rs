// src/systems/mod.rs
use bevy::prelude::*;
use crate::crowd::*;

pub mod camera;
pub mod crowd_update;
pub mod day_night;
pub mod input;
pub mod instancing;
pub mod population;
pub mod scene;
pub mod ui;

pub use crowd_update::*;
pub use day_night::*;
pub use input::*;
pub use instancing::*;
pub use population::*;
pub use scene::*;
pub use ui::*;

/// Simulation wiring that runs without a window: resources, the population
/// event and the per-frame update chain.
pub struct CrowdSimulationPlugin {
    pub config: CrowdConfig,
}

impl CrowdSimulationPlugin {
    pub fn new(config: CrowdConfig) -> Self {
        Self { config }
    }
}

impl Plugin for CrowdSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(DayNightCycle::from_config(&self.config.day_night))
            .insert_resource(CrowdPanelState::from_config(&self.config))
            .init_resource::<CrowdMode>()
            .init_resource::<FpsRefresh>()
            .add_event::<PopulationRequest>()
            .add_systems(Update, (
                population_request_system,
                crowd_update_system,
                upload_instances_system,
            ).chain())
            .add_systems(Update, day_night_system);
    }
}
