// src/crowd/config.rs - Crowd configuration and tuning
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const CONFIG_PATH: &str = "data/config/crowd.ron";

/// Frame rate the pedestrian walk atlas was baked at.
pub const ANIMATION_FRAME_RATE: f32 = 24.0;
pub const DEFAULT_POOL_CAPACITY: usize = 1000;
pub const DEFAULT_SPAWN_TRIALS: usize = 7;
pub const DEFAULT_BLEND_DURATION: f32 = 3.0;
pub const SENTINEL_Y: f32 = -9999.0;

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct CrowdConfig {
    pub pool: PoolConfig,
    pub spawn: SpawnConfig,
    pub steering: SteeringConfig,
    pub animation: AnimationConfig,
    pub day_night: DayNightConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub capacity: usize,
    /// Population on startup. `None` means half the capacity.
    pub initial_population: Option<usize>,
    pub sentinel_y: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub trials: usize,
    pub seed: Option<u64>,
    pub path_waypoints: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SteeringConfig {
    pub max_speed: f32,
    pub max_force: f32,
    pub mass: f32,
    pub next_waypoint_distance: f32,
    pub arrive_deceleration: f32,
    pub idle_duration: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub frame_rate: f32,
    pub blend_duration: f32,
    pub frame_count: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DayNightConfig {
    pub start_hour: f32,
    pub seconds_per_hour: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            initial_population: None,
            sentinel_y: SENTINEL_Y,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_SPAWN_TRIALS,
            seed: None,
            path_waypoints: 4,
        }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.4,
            max_force: 8.0,
            mass: 1.0,
            next_waypoint_distance: 0.75,
            arrive_deceleration: 2.0,
            idle_duration: 3.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_rate: ANIMATION_FRAME_RATE,
            blend_duration: DEFAULT_BLEND_DURATION,
            frame_count: 30,
        }
    }
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            start_hour: 12.0,
            seconds_per_hour: 2.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "io error: {}", e),
            ConfigError::Parse(e) => write!(f, "parse error: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl CrowdConfig {
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(config) => {
                info!("Loaded crowd config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No crowd config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                error!("Failed to load crowd config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.capacity == 0 {
            return Err(ConfigError::Invalid("pool.capacity must be positive".into()));
        }
        if self.spawn.trials == 0 {
            return Err(ConfigError::Invalid("spawn.trials must be positive".into()));
        }
        if !(self.animation.frame_rate > 0.0) {
            return Err(ConfigError::Invalid("animation.frame_rate must be positive".into()));
        }
        if self.animation.blend_duration < 0.0 {
            return Err(ConfigError::Invalid("animation.blend_duration must not be negative".into()));
        }
        if !(self.steering.mass > 0.0) {
            return Err(ConfigError::Invalid("steering.mass must be positive".into()));
        }
        if !(self.day_night.seconds_per_hour > 0.0) {
            return Err(ConfigError::Invalid("day_night.seconds_per_hour must be positive".into()));
        }
        Ok(())
    }

    pub fn initial_population(&self) -> usize {
        self.pool
            .initial_population
            .unwrap_or(self.pool.capacity / 2)
            .min(self.pool.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_demo() {
        let config = CrowdConfig::default();
        assert_eq!(config.pool.capacity, 1000);
        assert_eq!(config.spawn.trials, 7);
        assert_eq!(config.animation.frame_rate, 24.0);
        assert_eq!(config.animation.blend_duration, 3.0);
        assert_eq!(config.pool.sentinel_y, -9999.0);
        assert_eq!(config.initial_population(), 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let config = CrowdConfig::from_ron("(pool: (capacity: 40), spawn: (seed: Some(9)))").unwrap();
        assert_eq!(config.pool.capacity, 40);
        assert_eq!(config.spawn.seed, Some(9));
        assert_eq!(config.spawn.trials, 7);
        assert_eq!(config.initial_population(), 20);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = CrowdConfig::from_ron("(pool: (capacity: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_ron() {
        let err = CrowdConfig::from_ron("(pool: (capacity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = CrowdConfig::load_from("definitely/not/here/crowd.ron");
        assert_eq!(config, CrowdConfig::default());
    }

    #[test]
    fn initial_population_is_clamped_to_capacity() {
        let mut config = CrowdConfig::default();
        config.pool.capacity = 10;
        config.pool.initial_population = Some(50);
        assert_eq!(config.initial_population(), 10);
    }
}
