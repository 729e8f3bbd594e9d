// src/crowd/steering.rs - Vehicle integration and steering behaviors
use bevy::math::{Mat4, Quat, Vec3};

/// Below this speed a vehicle keeps its previous heading.
pub const HEADING_EPSILON: f32 = 1e-3;

// === VEHICLE ===
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    pub max_speed: f32,
    pub max_force: f32,
    pub mass: f32,
}

impl Vehicle {
    pub fn new(max_speed: f32, max_force: f32, mass: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            max_speed,
            max_force,
            mass,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn update(&mut self, delta: f32, steering_force: Vec3) {
        let force = steering_force.clamp_length_max(self.max_force);
        let acceleration = force / self.mass.max(f32::EPSILON);

        self.velocity = (self.velocity + acceleration * delta).clamp_length_max(self.max_speed);
        self.position += self.velocity * delta;

        if self.speed() > HEADING_EPSILON {
            self.rotation = heading_rotation(self.velocity);
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Yaw about +Y so that local +Z faces `direction`.
pub fn heading_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

// === PATH ===
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkPath {
    waypoints: Vec<Vec3>,
    pub looped: bool,
    cursor: usize,
}

impl WalkPath {
    pub fn new(waypoints: Vec<Vec3>, looped: bool) -> Self {
        Self {
            waypoints,
            looped,
            cursor: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.cursor += 1;
        if self.cursor == self.waypoints.len() {
            self.cursor = if self.looped { 0 } else { self.cursor - 1 };
        }
    }

    /// True once the last waypoint is the current target.
    pub fn finished(&self) -> bool {
        !self.looped && !self.waypoints.is_empty() && self.cursor + 1 == self.waypoints.len()
    }
}

// === BEHAVIORS ===
#[derive(Clone, Debug, PartialEq)]
pub enum SteeringBehavior {
    Seek {
        target: Vec3,
    },
    Arrive {
        target: Vec3,
        deceleration: f32,
        tolerance: f32,
    },
    FollowPath {
        path: WalkPath,
        next_waypoint_distance: f32,
        deceleration: f32,
    },
}

impl SteeringBehavior {
    pub fn follow_path(path: WalkPath, next_waypoint_distance: f32, deceleration: f32) -> Self {
        SteeringBehavior::FollowPath {
            path,
            next_waypoint_distance,
            deceleration,
        }
    }

    pub fn compute_force(&mut self, vehicle: &Vehicle) -> Vec3 {
        match self {
            SteeringBehavior::Seek { target } => seek(vehicle, *target),
            SteeringBehavior::Arrive {
                target,
                deceleration,
                tolerance,
            } => arrive(vehicle, *target, *deceleration, *tolerance),
            SteeringBehavior::FollowPath {
                path,
                next_waypoint_distance,
                deceleration,
            } => {
                let Some(waypoint) = path.current() else {
                    return Vec3::ZERO;
                };
                if vehicle.position.distance_squared(waypoint) < next_waypoint_distance.powi(2) {
                    path.advance();
                }
                let Some(target) = path.current() else {
                    return Vec3::ZERO;
                };
                if path.finished() {
                    arrive(vehicle, target, *deceleration, 0.0)
                } else {
                    seek(vehicle, target)
                }
            }
        }
    }
}

fn seek(vehicle: &Vehicle, target: Vec3) -> Vec3 {
    let desired = (target - vehicle.position).normalize_or_zero() * vehicle.max_speed;
    desired - vehicle.velocity
}

fn arrive(vehicle: &Vehicle, target: Vec3, deceleration: f32, tolerance: f32) -> Vec3 {
    let to_target = target - vehicle.position;
    let distance = to_target.length();

    if distance > tolerance.max(f32::EPSILON) {
        let speed = (distance / deceleration.max(f32::EPSILON)).min(vehicle.max_speed);
        let desired = to_target * (speed / distance);
        desired - vehicle.velocity
    } else {
        Vec3::ZERO
    }
}

// === MANAGER ===
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedBehavior {
    pub behavior: SteeringBehavior,
    pub weight: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SteeringManager {
    behaviors: Vec<WeightedBehavior>,
}

impl SteeringManager {
    pub fn add(&mut self, behavior: SteeringBehavior, weight: f32) {
        self.behaviors.push(WeightedBehavior {
            behavior,
            weight,
        });
    }

    pub fn path(&self) -> Option<&WalkPath> {
        self.behaviors.iter().find_map(|entry| match &entry.behavior {
            SteeringBehavior::FollowPath { path, .. } => Some(path),
            _ => None,
        })
    }

    pub fn path_mut(&mut self) -> Option<&mut WalkPath> {
        self.behaviors.iter_mut().find_map(|entry| match &mut entry.behavior {
            SteeringBehavior::FollowPath { path, .. } => Some(path),
            _ => None,
        })
    }

    /// Whether the vehicle has reached the last waypoint of its path.
    pub fn path_completed(&self, vehicle: &Vehicle) -> bool {
        self.behaviors.iter().any(|entry| match &entry.behavior {
            SteeringBehavior::FollowPath {
                path,
                next_waypoint_distance,
                ..
            } => {
                path.finished()
                    && path
                        .current()
                        .is_some_and(|last| vehicle.position.distance(last) < *next_waypoint_distance)
            }
            _ => false,
        })
    }

    /// Weighted sum of behaviors, truncated once the vehicle's force
    /// budget is spent. Earlier entries take priority.
    pub fn calculate(&mut self, vehicle: &Vehicle) -> Vec3 {
        let mut total = Vec3::ZERO;
        for entry in self.behaviors.iter_mut() {
            let force = entry.behavior.compute_force(vehicle) * entry.weight;
            if !accumulate(&mut total, force, vehicle.max_force) {
                break;
            }
        }
        total
    }
}

fn accumulate(total: &mut Vec3, force: Vec3, max_force: f32) -> bool {
    let remaining = max_force - total.length();
    if remaining <= 0.0 {
        return false;
    }

    if force.length() < remaining {
        *total += force;
    } else {
        *total += force.normalize_or_zero() * remaining;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Vehicle {
        Vehicle::new(1.5, 10.0, 1.0)
    }

    #[test]
    fn velocity_is_clamped_to_max_speed() {
        let mut vehicle = walker();
        for _ in 0..100 {
            vehicle.update(0.1, Vec3::new(50.0, 0.0, 0.0));
        }
        assert!(vehicle.speed() <= vehicle.max_speed + 1e-5);
        assert!(vehicle.position.x > 0.0);
    }

    #[test]
    fn heading_follows_velocity_and_holds_when_stopped() {
        let mut vehicle = walker();
        vehicle.update(0.5, Vec3::new(0.0, 0.0, 5.0));
        let facing = vehicle.rotation * Vec3::Z;
        assert!(facing.z > 0.99);

        let held = vehicle.rotation;
        vehicle.velocity = Vec3::ZERO;
        vehicle.update(0.5, Vec3::ZERO);
        assert_eq!(vehicle.rotation, held);
    }

    #[test]
    fn world_matrix_carries_position() {
        let mut vehicle = walker();
        vehicle.position = Vec3::new(3.0, 0.0, -2.0);
        let m = vehicle.world_matrix();
        assert_eq!(m.w_axis.truncate(), vehicle.position);
    }

    #[test]
    fn path_stops_on_last_waypoint_unless_looped() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let mut path = WalkPath::new(points.clone(), false);
        path.advance();
        path.advance();
        assert!(path.finished());
        path.advance();
        assert_eq!(path.current(), Some(Vec3::Z));

        let mut looped = WalkPath::new(points, true);
        for _ in 0..3 {
            looped.advance();
        }
        assert_eq!(looped.cursor(), 0);
        assert!(!looped.finished());
    }

    #[test]
    fn follow_path_walks_to_the_end() {
        let waypoints = vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0)];
        let mut manager = SteeringManager::default();
        manager.add(
            SteeringBehavior::follow_path(WalkPath::new(waypoints, false), 0.3, 1.0),
            1.0,
        );

        let mut vehicle = walker();
        for _ in 0..600 {
            let force = manager.calculate(&vehicle);
            vehicle.update(1.0 / 60.0, force);
            if manager.path_completed(&vehicle) {
                break;
            }
        }
        assert!(manager.path_completed(&vehicle));
        assert!(vehicle.position.distance(Vec3::new(2.0, 0.0, 2.0)) < 0.3);
    }

    #[test]
    fn accumulated_force_respects_budget() {
        let mut manager = SteeringManager::default();
        manager.add(SteeringBehavior::Seek { target: Vec3::new(100.0, 0.0, 0.0) }, 20.0);
        manager.add(SteeringBehavior::Seek { target: Vec3::new(0.0, 0.0, 100.0) }, 20.0);
        let vehicle = walker();
        let force = manager.calculate(&vehicle);
        assert!(force.length() <= vehicle.max_force + 1e-4);
        // The first behavior spends the whole budget.
        assert!(force.z.abs() < 1e-4);
    }

    #[test]
    fn arrive_is_quiet_inside_tolerance() {
        let mut behavior = SteeringBehavior::Arrive {
            target: Vec3::new(0.05, 0.0, 0.0),
            deceleration: 2.0,
            tolerance: 0.1,
        };
        assert_eq!(behavior.compute_force(&walker()), Vec3::ZERO);
    }
}
