// src/crowd/simulation.rs - Simulation state and the per-frame updater
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent_pool::{AgentPool, Pedestrian, PopulationChange};
use super::config::CrowdConfig;
use super::instancing::InstanceBuffers;
use super::spawn_area::SpawnArea;
use super::state_machine::PedestrianState;

// === CLOCK ===
/// Process-wide elapsed time. Every pedestrian reads the same animation
/// frame from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    elapsed: f64,
    frame_rate: f32,
}

impl AnimationClock {
    pub fn new(frame_rate: f32) -> Self {
        Self {
            elapsed: 0.0,
            frame_rate,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.elapsed += f64::from(delta.max(0.0));
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Continuous frame position (`elapsed * frame_rate`). Kept in `f64` so
    /// transition windows stay sub-frame accurate on long-running sessions.
    pub fn frame(&self) -> f64 {
        self.elapsed * f64::from(self.frame_rate)
    }

    /// Looping frame index into an atlas of `frame_count` frames.
    pub fn current_frame(&self, frame_count: u32) -> f32 {
        if frame_count == 0 {
            return 0.0;
        }
        let frame = (self.elapsed * f64::from(self.frame_rate)).floor() as u64;
        (frame % u64::from(frame_count)) as f32
    }
}

// === STATE ===
#[derive(Resource)]
pub struct SimulationState {
    pub config: CrowdConfig,
    pub pool: AgentPool,
    pub area: SpawnArea,
    pub clock: AnimationClock,
    rng: StdRng,
}

impl SimulationState {
    pub fn new(config: CrowdConfig, area: SpawnArea) -> Self {
        let rng = match config.spawn.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, area, rng)
    }

    pub fn with_seed(config: CrowdConfig, area: SpawnArea, seed: u64) -> Self {
        Self::with_rng(config, area, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CrowdConfig, area: SpawnArea, rng: StdRng) -> Self {
        Self {
            pool: AgentPool::new(&config),
            clock: AnimationClock::new(config.animation.frame_rate),
            config,
            area,
            rng,
        }
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Requests outside `[0, capacity]` are clamped.
    pub fn set_population(&mut self, requested: i64) -> PopulationChange {
        let target = requested.clamp(0, self.pool.capacity() as i64) as usize;
        self.pool
            .set_population(target, &self.area, &self.config.spawn, &mut self.rng)
    }

    /// One render tick: `step`, then `write_buffers`.
    pub fn tick(&mut self, delta: f32, buffers: &mut InstanceBuffers) {
        self.step(delta);
        self.write_buffers(buffers);
    }

    /// Advances the clock and steps active pedestrians in slot order.
    pub fn step(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.clock.advance(delta);
        let clock_frame = self.clock.frame();

        for agent in self.pool.iter_mut().filter(|agent| agent.active) {
            step_pedestrian(agent, delta, clock_frame, &self.config, &self.area, &mut self.rng);
        }
    }

    /// Rewrites every instance slot from the pool. Parked slots carry the
    /// sentinel transform.
    pub fn write_buffers(&self, buffers: &mut InstanceBuffers) {
        let shared_frame = self.clock.current_frame(self.config.animation.frame_count);
        buffers.begin_frame();
        for (slot, agent) in self.pool.iter().enumerate() {
            buffers.set_matrix_at(slot, agent.world_matrix());
            buffers.set_frame_at(slot, shared_frame);
        }
        buffers.mark_updated();
    }
}

fn step_pedestrian<R: Rng + ?Sized>(
    agent: &mut Pedestrian,
    delta: f32,
    clock_frame: f64,
    config: &CrowdConfig,
    area: &SpawnArea,
    rng: &mut R,
) {
    match (agent.fsm.current(), agent.fsm.pending()) {
        (PedestrianState::Walk, None) if agent.steering.path_completed(&agent.vehicle) => {
            agent.fsm.change_to(PedestrianState::Idle, clock_frame);
            agent.idle_timer = config.steering.idle_duration;
        }
        (PedestrianState::Idle, None) => {
            agent.idle_timer -= delta;
            if agent.idle_timer <= 0.0 {
                let waypoints = area.random_path(config.spawn.path_waypoints, rng);
                agent.assign_path(waypoints);
                agent.fsm.change_to(PedestrianState::Walk, clock_frame);
            }
        }
        _ => {}
    }

    let force = agent.steering.calculate(&agent.vehicle);
    agent.vehicle.update(delta, force);
    agent.fsm.update(clock_frame);
}
