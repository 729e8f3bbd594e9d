// src/systems/ui/crowd_panel.rs - Population slider window
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use crate::crowd::*;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrowdPanelState {
    pub requested: usize,
    pub capacity: usize,
}

impl CrowdPanelState {
    pub fn from_config(config: &CrowdConfig) -> Self {
        Self {
            requested: config.initial_population(),
            capacity: config.pool.capacity,
        }
    }
}

pub fn crowd_panel_system(
    mut contexts: EguiContexts,
    mut panel: ResMut<CrowdPanelState>,
    mut requests: EventWriter<PopulationRequest>,
    day_night: Res<DayNightCycle>,
    mode: Res<CrowdMode>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return; };

    let capacity = panel.capacity;
    let mut requested = panel.requested;

    egui::Window::new("Crowd")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.add(egui::Slider::new(&mut requested, 0..=capacity).text("Population"));
            ui.separator();
            ui.label(format!("{} ({:?})", day_night.time_string(), day_night.current_period));
            if mode.paused {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), "Paused");
            }
        });

    if requested != panel.requested {
        panel.requested = requested;
        requests.write(PopulationRequest { target: requested as i64 });
    }
}
