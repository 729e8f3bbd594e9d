// src/crowd/resources.rs - Shared app resources: mode, day/night cycle, HUD labels
use bevy::prelude::*;
use std::f32::consts::PI;

use super::config::DayNightConfig;

/// Direct sunlight at solar noon, in lux.
pub const NOON_ILLUMINANCE: f32 = 10_000.0;

#[derive(Resource, Debug, Clone)]
pub struct CrowdMode {
    pub paused: bool,
    pub hud_visible: bool,
}

impl Default for CrowdMode {
    fn default() -> Self {
        Self {
            paused: false,
            hud_visible: true,
        }
    }
}

// === DAY / NIGHT ===
#[derive(Resource, Debug, Clone)]
pub struct DayNightCycle {
    pub time_of_day: f32, // 0.0 to 24.0 hours
    pub seconds_per_hour: f32,
    pub current_period: TimeOfDay,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::from_config(&DayNightConfig::default())
    }
}

impl DayNightCycle {
    pub fn from_config(config: &DayNightConfig) -> Self {
        let time_of_day = config.start_hour.rem_euclid(24.0);
        Self {
            time_of_day,
            seconds_per_hour: config.seconds_per_hour,
            current_period: TimeOfDay::at(time_of_day),
        }
    }

    pub fn advance_time(&mut self, delta_secs: f32) {
        self.time_of_day = (self.time_of_day + delta_secs / self.seconds_per_hour).rem_euclid(24.0);
        self.current_period = TimeOfDay::at(self.time_of_day);
    }

    /// Sun angle above the horizon: 0 at 06:00, PI/2 at noon, negative at night.
    pub fn sun_elevation(&self) -> f32 {
        (self.time_of_day - 6.0) / 12.0 * PI
    }

    /// Unit vector pointing from the ground towards the sun. Tilted south so
    /// it is never parallel to +Y.
    pub fn sun_direction(&self) -> Vec3 {
        let elevation = self.sun_elevation();
        Vec3::new(elevation.cos(), elevation.sin(), 0.35).normalize()
    }

    pub fn sun_illuminance(&self) -> f32 {
        self.sun_elevation().sin().max(0.0) * NOON_ILLUMINANCE
    }

    pub fn ambient_brightness(&self) -> f32 {
        match self.current_period {
            TimeOfDay::Day => 400.0,
            TimeOfDay::Dusk => 250.0,
            TimeOfDay::Night => 80.0,
            TimeOfDay::Dawn => 200.0,
        }
    }

    pub fn ambient_color(&self) -> Color {
        match self.current_period {
            TimeOfDay::Day => Color::srgb(1.0, 1.0, 1.0),
            TimeOfDay::Dusk => Color::srgb(0.9, 0.7, 0.5),
            TimeOfDay::Night => Color::srgb(0.3, 0.3, 0.5),
            TimeOfDay::Dawn => Color::srgb(0.8, 0.8, 0.9),
        }
    }

    pub fn time_string(&self) -> String {
        let hours = self.time_of_day as u32;
        let minutes = ((self.time_of_day - hours as f32) * 60.0) as u32;
        format!("{:02}:{:02}", hours, minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub fn at(hour: f32) -> Self {
        match hour {
            t if (6.0..18.0).contains(&t) => TimeOfDay::Day,
            t if (18.0..20.0).contains(&t) => TimeOfDay::Dusk,
            t if t >= 20.0 || t < 4.0 => TimeOfDay::Night,
            _ => TimeOfDay::Dawn,
        }
    }
}

// === HUD LABELS ===
pub fn fps_label(fps: u32) -> String {
    format!("FPS: {}", fps)
}

pub fn population_label(population: usize) -> String {
    format!("Population: {}", population)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_follow_the_clock() {
        let mut cycle = DayNightCycle::from_config(&DayNightConfig {
            start_hour: 17.0,
            seconds_per_hour: 1.0,
        });
        assert_eq!(cycle.current_period, TimeOfDay::Day);
        cycle.advance_time(1.5);
        assert_eq!(cycle.current_period, TimeOfDay::Dusk);
        cycle.advance_time(3.0);
        assert_eq!(cycle.current_period, TimeOfDay::Night);
        cycle.advance_time(7.0);
        assert_eq!(cycle.current_period, TimeOfDay::Dawn);
        assert!(cycle.time_of_day < 24.0);
    }

    #[test]
    fn sun_is_dark_below_the_horizon() {
        let mut cycle = DayNightCycle::default();
        assert!((cycle.sun_illuminance() - NOON_ILLUMINANCE).abs() < 1.0);
        assert!(cycle.sun_direction().y > 0.9);

        cycle.time_of_day = 0.0;
        assert_eq!(cycle.sun_illuminance(), 0.0);
        assert!(cycle.sun_direction().y < 0.0);
    }

    #[test]
    fn time_string_is_zero_padded() {
        let mut cycle = DayNightCycle::default();
        cycle.time_of_day = 7.5;
        assert_eq!(cycle.time_string(), "07:30");
    }

    #[test]
    fn labels_match_hud_format() {
        assert_eq!(fps_label(58), "FPS: 58");
        assert_eq!(population_label(500), "Population: 500");
    }
}
