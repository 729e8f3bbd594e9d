// src/systems/day_night.rs
use bevy::prelude::*;
use crate::crowd::*;

/// Marks the directional light driven by the day/night cycle.
#[derive(Component)]
pub struct Sun;

pub fn day_night_system(
    mut day_night: ResMut<DayNightCycle>,
    time: Res<Time>,
    mode: Res<CrowdMode>,
) {
    if mode.paused { return; }

    day_night.advance_time(time.delta_secs());
}

pub fn lighting_system(
    day_night: Res<DayNightCycle>,
    ambient_light: Option<ResMut<AmbientLight>>,
    mut suns: Query<(&mut DirectionalLight, &mut Transform), With<Sun>>,
) {
    if !day_night.is_changed() { return; }

    if let Some(mut ambient_light) = ambient_light {
        ambient_light.color = day_night.ambient_color();
        ambient_light.brightness = day_night.ambient_brightness();
    }

    let toward_ground = -day_night.sun_direction();
    for (mut light, mut transform) in suns.iter_mut() {
        light.illuminance = day_night.sun_illuminance();
        *transform = Transform::IDENTITY.looking_to(toward_ground, Vec3::Y);
    }
}
