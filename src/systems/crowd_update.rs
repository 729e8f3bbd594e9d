// src/systems/crowd_update.rs - Per-frame crowd step
use bevy::prelude::*;
use crate::crowd::*;

/// Pausing freezes the clock and the agents, but the buffers are still
/// rewritten so population changes made while paused reach the renderer.
pub fn crowd_update_system(
    time: Res<Time>,
    mode: Res<CrowdMode>,
    simulation: Option<ResMut<SimulationState>>,
    buffers: Option<ResMut<InstanceBuffers>>,
) {
    let (Some(mut simulation), Some(mut buffers)) = (simulation, buffers) else { return; };

    if !mode.paused {
        simulation.step(time.delta_secs());
    }
    simulation.write_buffers(&mut buffers);
}
