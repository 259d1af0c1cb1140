//! Polygon helpers over plain point loops: normals, areas and edge planes.

use crate::{POINT_EQUAL_EPSILON, Plane, Vec3};

/// Normal of the first non-degenerate vertex triple, or zero when the loop
/// has none.
pub fn face_normal(points: &[Vec3]) -> Vec3 {
    let n = points.len();
    if n < 3 {
        return Vec3::ZERO;
    }
    let p0 = points[0];
    for i in 1..n - 1 {
        let c = (points[i] - p0).cross(points[i + 1] - p0);
        if c.length() > 0.0 {
            return c.normalized();
        }
    }
    Vec3::ZERO
}

pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}

pub fn polygon_area(points: &[Vec3]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    (2..points.len())
        .map(|i| triangle_area(points[0], points[i - 1], points[i]))
        .sum()
}

/// Plane through the edge `v0 -> v1` whose normal points into the polygon.
/// `None` for a zero-length edge.
pub fn make_inward_edge_plane(v0: Vec3, v1: Vec3, face_normal: Vec3) -> Option<Plane> {
    let edge = v1 - v0;
    if edge.length() == 0.0 {
        return None;
    }
    let normal = face_normal.cross(edge).normalized();
    if normal.length() == 0.0 {
        return None;
    }
    Some(Plane::new(normal, normal.dot(v0)))
}

/// Inward-facing planes for every non-degenerate edge of the loop. Empty
/// when the polygon normal cannot be determined.
pub fn make_inward_edge_planes(points: &[Vec3]) -> Vec<Plane> {
    let normal = face_normal(points);
    if normal.is_zero_exact() {
        return Vec::new();
    }
    let n = points.len();
    (0..n)
        .filter_map(|i| make_inward_edge_plane(points[i], points[(i + 1) % n], normal))
        .collect()
}

/// Smallest signed distance from `point` to the edge planes; negative means
/// outside. `f32::MAX` for an empty plane list.
pub fn edge_planes_point_inside_dist(planes: &[Plane], point: Vec3) -> f32 {
    planes
        .iter()
        .map(|p| p.distance_to(point))
        .fold(f32::MAX, f32::min)
}

/// Whether `point` lies inside every edge plane, allowing
/// [`POINT_EQUAL_EPSILON`] of slack.
pub fn edge_planes_point_inside(planes: &[Plane], point: Vec3) -> bool {
    planes
        .iter()
        .all(|p| p.distance_to(point) >= -POINT_EQUAL_EPSILON)
}
