// src/crowd/triangulation.rs - Ear-clipping triangulation of the walkable area
use bevy::math::{Vec2, Vec3};

const AREA_EPSILON: f32 = 1e-6;
const CONTAINS_TOLERANCE: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
}

impl Triangle {
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    pub fn area(&self) -> f32 {
        cross(self.b - self.a, self.c - self.a).abs() * 0.5
    }

    /// Weights for `a`, `b` and `c`. NaN for a degenerate triangle.
    pub fn barycentric(&self, point: Vec2) -> Vec3 {
        let v0 = self.b - self.a;
        let v1 = self.c - self.a;
        let v2 = point - self.a;

        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() <= f32::EPSILON {
            return Vec3::splat(f32::NAN);
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        Vec3::new(1.0 - v - w, v, w)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let weights = self.barycentric(point);
        weights.x >= -CONTAINS_TOLERANCE
            && weights.y >= -CONTAINS_TOLERANCE
            && weights.z >= -CONTAINS_TOLERANCE
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Shoelace area. Positive for counter-clockwise rings.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Triangulates a simple polygon given as an ordered boundary of either
/// winding. Returned triples index into `points` and are counter-clockwise.
pub fn triangulate(points: &[Vec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 || signed_area(points).abs() <= AREA_EPSILON {
        return Vec::new();
    }

    let mut ring: Vec<usize> = if signed_area(points) > 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    let mut i = 0;
    let mut misses = 0;

    while ring.len() > 3 {
        let len = ring.len();
        let prev = ring[(i + len - 1) % len];
        let curr = ring[i];
        let next = ring[(i + 1) % len];

        if is_ear(points, &ring, prev, curr, next) {
            triangles.push([prev, curr, next]);
            ring.remove(i);
            if i >= ring.len() {
                i = 0;
            }
            misses = 0;
            continue;
        }

        i = (i + 1) % len;
        misses += 1;

        if misses > len {
            // Stuck: drop a collinear vertex if there is one, otherwise the
            // polygon self-intersects and the remainder is left out.
            match find_collinear(points, &ring) {
                Some(index) => {
                    ring.remove(index);
                    i = 0;
                    misses = 0;
                }
                None => break,
            }
        }
    }

    if ring.len() == 3 {
        let tri = [ring[0], ring[1], ring[2]];
        let area = cross(points[tri[1]] - points[tri[0]], points[tri[2]] - points[tri[0]]);
        if area > AREA_EPSILON {
            triangles.push(tri);
        }
    }

    triangles
}

pub fn triangles_from_polygon(points: &[Vec2]) -> Vec<Triangle> {
    triangulate(points)
        .into_iter()
        .map(|[a, b, c]| Triangle::new(points[a], points[b], points[c]))
        .collect()
}

fn is_ear(points: &[Vec2], ring: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let a = points[prev];
    let b = points[curr];
    let c = points[next];

    if cross(b - a, c - b) <= AREA_EPSILON {
        return false;
    }

    let candidate = Triangle::new(a, b, c);
    ring.iter()
        .filter(|&&index| index != prev && index != curr && index != next)
        .all(|&index| {
            let p = points[index];
            p == a || p == b || p == c || !candidate.contains(p)
        })
}

fn find_collinear(points: &[Vec2], ring: &[usize]) -> Option<usize> {
    let len = ring.len();
    (0..len).find(|&i| {
        let a = points[ring[(i + len - 1) % len]];
        let b = points[ring[i]];
        let c = points[ring[(i + 1) % len]];
        cross(b - a, c - b).abs() <= AREA_EPSILON
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_area(points: &[Vec2]) -> f32 {
        triangles_from_polygon(points).iter().map(Triangle::area).sum()
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(triangulate(&square).len(), 2);
        assert!((total_area(&square) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn concave_outline_preserves_area() {
        let l_shape = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert_eq!(triangulate(&l_shape).len(), 4);
        assert!((total_area(&l_shape) - 3.0).abs() < 1e-5);

        // The notch is outside the polygon.
        let notch = Vec2::new(1.5, 1.5);
        assert!(!triangles_from_polygon(&l_shape).iter().any(|t| t.contains(notch)));
    }

    #[test]
    fn clockwise_input_is_accepted() {
        let clockwise = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 3.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(4.0, 0.0),
        ];
        assert!((total_area(&clockwise) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn collinear_vertices_are_skipped() {
        let with_midpoint = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!((total_area(&with_midpoint) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_empty());
        assert!(triangulate(&[Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]).is_empty());
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let tri = Triangle::new(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        let weights = tri.barycentric(Vec2::new(1.0, 1.0));
        assert!((weights.x + weights.y + weights.z - 1.0).abs() < 1e-5);
        assert!(tri.contains(Vec2::new(1.0, 1.0)));
        assert!(!tri.contains(Vec2::new(3.0, 3.0)));
    }
}
