// src/crowd/agent_pool.rs - Fixed-size pedestrian pool and population control
use bevy::log::warn;
use bevy::math::{Mat4, Vec3};
use rand::Rng;

use super::config::{CrowdConfig, SpawnConfig, SteeringConfig};
use super::spawn_area::SpawnArea;
use super::state_machine::StateMachine;
use super::steering::{SteeringBehavior, SteeringManager, Vehicle, WalkPath};

// === PEDESTRIAN ===
#[derive(Clone, Debug)]
pub struct Pedestrian {
    pub active: bool,
    pub vehicle: Vehicle,
    pub steering: SteeringManager,
    pub fsm: StateMachine,
    pub idle_timer: f32,
}

impl Pedestrian {
    pub fn new(config: &CrowdConfig) -> Self {
        let steering_config = &config.steering;
        let mut vehicle = Vehicle::new(
            steering_config.max_speed,
            steering_config.max_force,
            steering_config.mass,
        );
        vehicle.position = Vec3::new(0.0, config.pool.sentinel_y, 0.0);

        let mut steering = SteeringManager::default();
        steering.add(follow_path(WalkPath::default(), steering_config), 1.0);

        Self {
            active: false,
            vehicle,
            steering,
            fsm: StateMachine::new(config.animation.blend_duration),
            idle_timer: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.vehicle.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.vehicle.position = position;
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.vehicle.world_matrix()
    }

    pub fn has_path(&self) -> bool {
        self.steering.path().is_some_and(|path| !path.is_empty())
    }

    pub fn assign_path(&mut self, waypoints: Vec<Vec3>) {
        match self.steering.path_mut() {
            Some(path) => *path = WalkPath::new(waypoints, false),
            None => {
                warn!("pedestrian has no path behavior; path dropped");
            }
        }
    }
}

fn follow_path(path: WalkPath, config: &SteeringConfig) -> SteeringBehavior {
    SteeringBehavior::follow_path(path, config.next_waypoint_distance, config.arrive_deceleration)
}

// === POOL ===
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationChange {
    Unchanged(usize),
    Grew { from: usize, to: usize },
    Shrank { from: usize, to: usize },
}

impl PopulationChange {
    pub fn population(&self) -> usize {
        match *self {
            PopulationChange::Unchanged(count) => count,
            PopulationChange::Grew { to, .. } | PopulationChange::Shrank { to, .. } => to,
        }
    }
}

/// Every slot exists for the lifetime of the pool; inactive ones are parked
/// at the sentinel height.
#[derive(Clone, Debug)]
pub struct AgentPool {
    agents: Vec<Pedestrian>,
    active_count: usize,
    sentinel_y: f32,
}

impl AgentPool {
    pub fn new(config: &CrowdConfig) -> Self {
        let agents = (0..config.pool.capacity)
            .map(|_| Pedestrian::new(config))
            .collect();
        Self {
            agents,
            active_count: 0,
            sentinel_y: config.pool.sentinel_y,
        }
    }

    pub fn capacity(&self) -> usize {
        self.agents.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn get(&self, slot: usize) -> &Pedestrian {
        self.assert_slot(slot);
        &self.agents[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut Pedestrian {
        self.assert_slot(slot);
        &mut self.agents[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pedestrian> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pedestrian> {
        self.agents.iter_mut()
    }

    pub fn active_slots(&self) -> Vec<usize> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| agent.active)
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn active_positions(&self) -> Vec<Vec3> {
        self.agents
            .iter()
            .filter(|agent| agent.active)
            .map(Pedestrian::position)
            .collect()
    }

    /// Places the slot at `position` and marks it active. Velocity, steering
    /// and state machine are left as they were when the slot was parked.
    pub fn activate(&mut self, slot: usize, position: Vec3) {
        self.assert_slot(slot);
        let agent = &mut self.agents[slot];
        if !agent.active {
            agent.active = true;
            self.active_count += 1;
        }
        agent.set_position(position);
    }

    pub fn deactivate(&mut self, slot: usize) {
        self.assert_slot(slot);
        let sentinel = Vec3::new(0.0, self.sentinel_y, 0.0);
        let agent = &mut self.agents[slot];
        if agent.active {
            agent.active = false;
            self.active_count -= 1;
        }
        agent.set_position(sentinel);
    }

    pub fn set_population<R: Rng + ?Sized>(
        &mut self,
        target: usize,
        area: &SpawnArea,
        spawn: &SpawnConfig,
        rng: &mut R,
    ) -> PopulationChange {
        let target = target.min(self.capacity());
        let from = self.active_count;

        while self.active_count < target {
            let Some(slot) = self.first_inactive_slot() else {
                break;
            };
            let existing = self.active_positions();
            let position = area.farthest_spawn_point(&existing, spawn.trials, rng);
            self.activate(slot, position);

            if !self.agents[slot].has_path() {
                let waypoints = area.random_path(spawn.path_waypoints, rng);
                self.agents[slot].assign_path(waypoints);
            }
        }

        while self.active_count > target {
            let Some(slot) = self.last_active_slot() else {
                break;
            };
            self.deactivate(slot);
        }

        let to = self.active_count;
        match from.cmp(&to) {
            std::cmp::Ordering::Less => PopulationChange::Grew { from, to },
            std::cmp::Ordering::Greater => PopulationChange::Shrank { from, to },
            std::cmp::Ordering::Equal => PopulationChange::Unchanged(to),
        }
    }

    fn first_inactive_slot(&self) -> Option<usize> {
        self.agents.iter().position(|agent| !agent.active)
    }

    fn last_active_slot(&self) -> Option<usize> {
        self.agents.iter().rposition(|agent| agent.active)
    }

    fn assert_slot(&self, slot: usize) {
        assert!(
            slot < self.agents.len(),
            "pool slot {} out of range (capacity {})",
            slot,
            self.agents.len()
        );
    }
}
