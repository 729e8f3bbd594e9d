// src/systems/ui/hud.rs - FPS and population readouts
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use crate::crowd::*;

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct PopulationText;

#[derive(Component)]
pub struct HudRoot;

/// Paces the FPS readout.
#[derive(Resource)]
pub struct FpsRefresh(pub Timer);

impl Default for FpsRefresh {
    fn default() -> Self {
        Self(Timer::from_seconds(1.0, TimerMode::Repeating))
    }
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            right: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            ..default()
        },
        HudRoot,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(fps_label(0)),
            TextFont { font_size: 16.0, ..default() },
            TextColor(Color::WHITE),
            FpsText,
        ));
        parent.spawn((
            Text::new(population_label(0)),
            TextFont { font_size: 16.0, ..default() },
            TextColor(Color::WHITE),
            PopulationText,
        ));
    });
}

/// Smoothed frame rate from `FrameTimeDiagnosticsPlugin`, 0 until the
/// first measurement lands.
pub fn fps_reading(diagnostics: &DiagnosticsStore) -> u32 {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .map(|fps| fps.round() as u32)
        .unwrap_or(0)
}

/// Refreshes once per second.
pub fn fps_text_system(
    time: Res<Time>,
    diagnostics: Res<DiagnosticsStore>,
    mut refresh: ResMut<FpsRefresh>,
    mut fps_text_query: Query<&mut Text, With<FpsText>>,
) {
    if !refresh.0.tick(time.delta()).just_finished() { return; }

    let fps_text = fps_label(fps_reading(&diagnostics));
    for mut text in fps_text_query.iter_mut() {
        **text = fps_text.clone();
    }
}

pub fn population_text_system(
    simulation: Option<Res<SimulationState>>,
    mut population_text_query: Query<&mut Text, With<PopulationText>>,
) {
    let population = simulation.map(|s| s.pool.active_count()).unwrap_or(0);
    let label = population_label(population);
    for mut text in population_text_query.iter_mut() {
        if **text != label {
            **text = label.clone();
        }
    }
}

pub fn hud_visibility_system(
    mode: Res<CrowdMode>,
    mut hud_query: Query<&mut Visibility, With<HudRoot>>,
) {
    if !mode.is_changed() { return; }

    for mut visibility in hud_query.iter_mut() {
        *visibility = if mode.hud_visible { Visibility::Inherited } else { Visibility::Hidden };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::diagnostic::{Diagnostic, DiagnosticMeasurement};
    use bevy::platform::time::Instant;
    use std::time::Duration;

    fn store_with_fps(value: f64) -> DiagnosticsStore {
        let mut store = DiagnosticsStore::default();
        let mut fps = Diagnostic::new(FrameTimeDiagnosticsPlugin::FPS);
        fps.add_measurement(DiagnosticMeasurement {
            time: Instant::now(),
            value,
        });
        store.add(fps);
        store
    }

    #[test]
    fn reading_rounds_the_smoothed_fps() {
        assert_eq!(fps_reading(&store_with_fps(59.6)), 60);
        assert_eq!(fps_reading(&DiagnosticsStore::default()), 0);
    }

    #[test]
    fn fps_text_refreshes_once_per_second() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(store_with_fps(58.0))
            .init_resource::<FpsRefresh>()
            .add_systems(Update, fps_text_system);
        let text = app.world_mut().spawn((Text::new(fps_label(0)), FpsText)).id();

        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(600));
        app.update();
        assert_eq!(app.world().get::<Text>(text).map(|t| t.0.clone()), Some("FPS: 0".to_string()));

        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(600));
        app.update();
        assert_eq!(app.world().get::<Text>(text).map(|t| t.0.clone()), Some("FPS: 58".to_string()));
    }
}
