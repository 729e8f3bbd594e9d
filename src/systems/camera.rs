// src/systems/camera.rs - Orbit camera around the plaza
use bevy::prelude::*;

const ORBIT_SPEED: f32 = 0.8; // radians per second
const ZOOM_SPEED: f32 = 30.0;
const MIN_DISTANCE: f32 = 20.0;
const MAX_DISTANCE: f32 = 200.0;

#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub distance: f32,
    pub pitch: f32,
    pub focus: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            distance: 95.0,
            pitch: 0.7,
            focus: Vec3::ZERO,
        }
    }
}

impl OrbitCamera {
    pub fn transform(&self) -> Transform {
        let offset = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        ) * self.distance;
        Transform::from_translation(self.focus + offset).looking_at(self.focus, Vec3::Y)
    }
}

pub fn movement(
    input: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<(&mut OrbitCamera, &mut Transform)>,
    time: Res<Time>,
) {
    let Ok((mut orbit, mut transform)) = camera_query.single_mut() else { return; };

    let mut yaw = 0.0;
    let mut zoom = 0.0;

    if input.pressed(KeyCode::KeyA) || input.pressed(KeyCode::ArrowLeft) {
        yaw -= 1.0;
    }
    if input.pressed(KeyCode::KeyD) || input.pressed(KeyCode::ArrowRight) {
        yaw += 1.0;
    }
    if input.pressed(KeyCode::KeyW) || input.pressed(KeyCode::ArrowUp) {
        zoom -= 1.0;
    }
    if input.pressed(KeyCode::KeyS) || input.pressed(KeyCode::ArrowDown) {
        zoom += 1.0;
    }

    if yaw == 0.0 && zoom == 0.0 {
        return;
    }

    let dt = time.delta_secs();
    orbit.yaw += yaw * ORBIT_SPEED * dt;
    orbit.distance = (orbit.distance + zoom * ZOOM_SPEED * dt).clamp(MIN_DISTANCE, MAX_DISTANCE);
    *transform = orbit.transform();
}
