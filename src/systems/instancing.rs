// src/systems/instancing.rs - Uploads instance buffers to the pedestrian render entities
use bevy::prelude::*;
use crate::crowd::*;

/// One render entity per pool slot. They all share a mesh and material so
/// the renderer draws them as a single instanced batch.
#[derive(Component, Debug, Clone, Copy)]
pub struct PedestrianInstance {
    pub slot: usize,
}

/// Walk-cycle atlas frame for the instance.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AnimationFrame(pub f32);

pub fn upload_instances_system(
    buffers: Option<ResMut<InstanceBuffers>>,
    mut instances: Query<(&PedestrianInstance, &mut Transform, &mut AnimationFrame)>,
) {
    let Some(mut buffers) = buffers else { return; };
    if !buffers.take_update() { return; }

    for (instance, mut transform, mut frame) in instances.iter_mut() {
        *transform = Transform::from_matrix(buffers.matrix_at(instance.slot));
        frame.0 = buffers.frame_at(instance.slot);
    }
}
