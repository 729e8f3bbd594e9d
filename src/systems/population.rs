// src/systems/population.rs - Applies population slider requests to the pool
use bevy::prelude::*;
use crate::crowd::*;

pub fn population_request_system(
    mut requests: EventReader<PopulationRequest>,
    simulation: Option<ResMut<SimulationState>>,
) {
    // Nothing to resize until the crowd has been set up.
    let Some(mut simulation) = simulation else {
        requests.clear();
        return;
    };

    let Some(request) = requests.read().last().copied() else { return; };

    match simulation.set_population(request.target) {
        PopulationChange::Grew { from, to } => info!("Crowd grew {} -> {}", from, to),
        PopulationChange::Shrank { from, to } => info!("Crowd shrank {} -> {}", from, to),
        PopulationChange::Unchanged(_) => {}
    }
}
