// src/crowd/events.rs
use bevy::prelude::*;

/// Emitted by the population slider. Only the latest request per frame is
/// applied.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationRequest {
    pub target: i64,
}
