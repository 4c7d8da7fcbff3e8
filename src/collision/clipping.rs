use glam::Vec3;

use super::contact::ContactPoints;
use crate::error::PhysicsResult;

const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Clips a convex polygon against a set of planes (Sutherland-Hodgman), keeping the
/// side each plane's normal points away from.
///
/// Each plane adds at most one vertex, so a quad clipped by four planes stays
/// within eight points.
pub fn clip_polygon(vertices: &ContactPoints, planes: &[Plane]) -> PhysicsResult<ContactPoints> {
    let mut output = *vertices;
    for plane in planes {
        output = clip_against_plane(&output, *plane)?;
        if output.is_empty() {
            break;
        }
    }
    Ok(output)
}

fn clip_against_plane(vertices: &ContactPoints, plane: Plane) -> PhysicsResult<ContactPoints> {
    let mut clipped = ContactPoints::new();
    let points = vertices.as_slice();
    if points.is_empty() {
        return Ok(clipped);
    }

    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];

        let current_dist = plane.signed_distance(current);
        let next_dist = plane.signed_distance(next);

        let current_inside = current_dist <= EPSILON;
        let next_inside = next_dist <= EPSILON;

        if current_inside && next_inside {
            clipped.try_push(next)?;
        } else if current_inside && !next_inside {
            if let Some(intersection) = line_plane_intersection(current, next, current_dist, next_dist)
            {
                clipped.try_push(intersection)?;
            }
        } else if !current_inside && next_inside {
            if let Some(intersection) = line_plane_intersection(current, next, current_dist, next_dist)
            {
                clipped.try_push(intersection)?;
            }
            clipped.try_push(next)?;
        }
    }

    Ok(clipped)
}

fn line_plane_intersection(
    start: Vec3,
    end: Vec3,
    start_dist: f32,
    end_dist: f32,
) -> Option<Vec3> {
    let denom = start_dist - end_dist;
    if denom.abs() <= EPSILON {
        return None;
    }
    let t = start_dist / denom;
    Some(start + (end - start) * t)
}

/// Side planes of a rectangular face, normals pointing outward.
pub fn rectangle_planes(center: Vec3, tangent_u: Vec3, tangent_v: Vec3, half_u: f32, half_v: f32) -> [Plane; 4] {
    [
        Plane::from_point_normal(center + tangent_u * half_u, tangent_u),
        Plane::from_point_normal(center - tangent_u * half_u, -tangent_u),
        Plane::from_point_normal(center + tangent_v * half_v, tangent_v),
        Plane::from_point_normal(center - tangent_v * half_v, -tangent_v),
    ]
}
