// src/systems/input.rs - Keyboard shortcuts
use bevy::prelude::*;
use crate::crowd::*;
use crate::systems::ui::CrowdPanelState;

const POPULATION_STEP: usize = 50;

pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mode: ResMut<CrowdMode>,
    mut panel: ResMut<CrowdPanelState>,
    mut requests: EventWriter<PopulationRequest>,
) {
    // Toggle HUD with F3
    if keyboard.just_pressed(KeyCode::F3) {
        mode.hud_visible = !mode.hud_visible;
        info!("HUD {}", if mode.hud_visible { "enabled" } else { "disabled" });
    }

    if keyboard.just_pressed(KeyCode::Space) {
        mode.paused = !mode.paused;
        info!("Crowd {}", if mode.paused { "paused" } else { "resumed" });
    }

    let requested = if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        Some((panel.requested + POPULATION_STEP).min(panel.capacity))
    } else if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        Some(panel.requested.saturating_sub(POPULATION_STEP))
    } else {
        None
    };

    if let Some(requested) = requested {
        if requested != panel.requested {
            panel.requested = requested;
            requests.write(PopulationRequest { target: requested as i64 });
        }
    }
}
