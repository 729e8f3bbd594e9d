// src/crowd/spawn_area.rs - Walkable spawn polygon and spawn point sampling
use bevy::math::{Vec2, Vec3};
use rand::Rng;

use super::triangulation::{triangles_from_polygon, Triangle};

/// Plaza outline on the ground plane as (x, z) pairs. The courtyard cut out
/// of the north side is a building footprint.
pub const CITY_BLOCK_OUTLINE: [[f32; 2]; 8] = [
    [-40.0, -30.0],
    [40.0, -30.0],
    [40.0, 30.0],
    [12.0, 30.0],
    [12.0, 4.0],
    [-12.0, 4.0],
    [-12.0, 30.0],
    [-40.0, 30.0],
];

#[derive(Clone, Debug)]
pub struct SpawnArea {
    triangles: Vec<Triangle>,
}

impl SpawnArea {
    pub fn from_polygon(boundary: &[Vec2]) -> Self {
        let triangles = triangles_from_polygon(boundary);
        assert!(
            !triangles.is_empty(),
            "spawn polygon with {} points produced no triangles",
            boundary.len()
        );
        Self { triangles }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        assert!(!triangles.is_empty(), "spawn area needs at least one triangle");
        Self { triangles }
    }

    pub fn city_block() -> Self {
        let outline: Vec<Vec2> = CITY_BLOCK_OUTLINE
            .iter()
            .map(|&[x, z]| Vec2::new(x, z))
            .collect();
        Self::from_polygon(&outline)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Whether the ground projection of `point` is inside the area.
    pub fn contains(&self, point: Vec3) -> bool {
        let ground = Vec2::new(point.x, point.z);
        self.triangles.iter().any(|t| t.contains(ground))
    }

    /// Triangles are picked uniformly, not weighted by area.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let triangle = &self.triangles[rng.gen_range(0..self.triangles.len())];
        let p = sample_in_triangle(triangle, rng);
        Vec3::new(p.x, 0.0, p.y)
    }

    pub fn spawn_candidates<R: Rng + ?Sized>(&self, trials: usize, rng: &mut R) -> Vec<Vec3> {
        (0..trials.max(1)).map(|_| self.random_point(rng)).collect()
    }

    /// Approximate farthest-point placement: best of `trials` random
    /// candidates by distance to the nearest existing agent.
    pub fn farthest_spawn_point<R: Rng + ?Sized>(
        &self,
        existing: &[Vec3],
        trials: usize,
        rng: &mut R,
    ) -> Vec3 {
        pick_farthest(&self.spawn_candidates(trials, rng), existing)
    }

    pub fn random_path<R: Rng + ?Sized>(&self, waypoints: usize, rng: &mut R) -> Vec<Vec3> {
        (0..waypoints.max(1)).map(|_| self.random_point(rng)).collect()
    }
}

pub fn sample_in_triangle<R: Rng + ?Sized>(triangle: &Triangle, rng: &mut R) -> Vec2 {
    let mut u: f32 = rng.gen();
    let mut v: f32 = rng.gen();
    if u + v > 1.0 {
        u = 1.0 - u;
        v = 1.0 - v;
    }
    triangle.a + (triangle.b - triangle.a) * u + (triangle.c - triangle.a) * v
}

/// Infinite when there is nobody to be far from.
pub fn min_distance(candidate: Vec3, existing: &[Vec3]) -> f32 {
    existing
        .iter()
        .map(|&p| candidate.distance(p))
        .fold(f32::INFINITY, f32::min)
}

pub fn pick_farthest(candidates: &[Vec3], existing: &[Vec3]) -> Vec3 {
    assert!(!candidates.is_empty(), "no spawn candidates to choose from");

    let mut best = candidates[0];
    let mut best_distance = min_distance(best, existing);
    for &candidate in &candidates[1..] {
        let distance = min_distance(candidate, existing);
        if distance > best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}
