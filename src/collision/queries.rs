use glam::Vec3;

use crate::{core::shape::Shape, utils::allocator::ShapeHandle};

/// Distance along the segment `start..end` where it first enters the sphere.
///
/// Returns the smallest root in `[0, |end - start|)`, or `None` when the segment
/// misses, stays inside without crossing the surface ahead of `start`, or has
/// zero length.
pub fn line_intersect_sphere(center: Vec3, radius: f32, start: Vec3, end: Vec3) -> Option<f32> {
    let segment = end - start;
    let max = segment.length();
    if max <= f32::EPSILON {
        return None;
    }
    let dir = segment / max;

    let q = start - center;
    let b = 2.0 * dir.dot(q);
    let c = q.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let near = (-b - sqrt_disc) * 0.5;
    let far = (-b + sqrt_disc) * 0.5;
    [near, far].into_iter().find(|t| (0.0..max).contains(t))
}

/// Nearest hit of a segment pick against shape bounding spheres.
#[derive(Debug, Clone, Copy)]
pub struct PickHit {
    pub handle: ShapeHandle,
    pub distance: f32,
    pub point: Vec3,
}

pub struct SegmentPick;

impl SegmentPick {
    /// Noclip shapes are still pickable; picking is a gameplay query, not a collision.
    pub fn cast<'a, I>(start: Vec3, end: Vec3, shapes: I) -> Option<PickHit>
    where
        I: IntoIterator<Item = (ShapeHandle, &'a Shape)>,
    {
        let dir = (end - start).normalize_or_zero();
        shapes
            .into_iter()
            .filter_map(|(handle, shape)| {
                line_intersect_sphere(shape.center, shape.bounding_radius(), start, end).map(
                    |distance| PickHit {
                        handle,
                        distance,
                        point: start + dir * distance,
                    },
                )
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
