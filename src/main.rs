use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use citycrowd::crowd::CrowdConfig;
use citycrowd::systems::*;

fn main() {
    let config = CrowdConfig::load();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "City Crowd".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(CrowdSimulationPlugin::new(config))
        .add_systems(Startup, (
            setup_scene,
            setup_hud,
        ))
        .add_systems(Update, (
            handle_input,
            citycrowd::systems::camera::movement,
            lighting_system,
            fps_text_system,
            population_text_system,
            hud_visibility_system,
        ))
        .add_systems(EguiPrimaryContextPass, crowd_panel_system)
        .run();
}
