use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl Aabb {
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Bounds of an oriented box: each world extent is `sum_j |R_ij| * h_j`.
    pub fn from_oriented_box(center: Vec3, rotation: &Mat3, half_extents: Vec3) -> Self {
        let abs = Mat3::from_cols(
            rotation.x_axis.abs(),
            rotation.y_axis.abs(),
            rotation.z_axis.abs(),
        );
        Self::from_center_extents(center, abs * half_extents)
    }

    /// Touching boxes count as intersecting, so exact contact is never pruned.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Helper methods for body-space inertia, stored as the diagonal of the inverse tensor.
pub trait InverseInertiaExt {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Vec3;
    fn for_solid_sphere(radius: f32, mass: f32) -> Vec3;
}

impl InverseInertiaExt for Vec3 {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }
        let lx = half_extents.x * 2.0;
        let ly = half_extents.y * 2.0;
        let lz = half_extents.z * 2.0;
        let factor = mass / 12.0;
        let inertia = Vec3::new(
            factor * (ly * ly + lz * lz),
            factor * (lx * lx + lz * lz),
            factor * (lx * lx + ly * ly),
        );
        invert_diagonal(inertia)
    }

    fn for_solid_sphere(radius: f32, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }
        invert_diagonal(Vec3::splat(0.4 * mass * radius * radius))
    }
}

fn invert_diagonal(inertia: Vec3) -> Vec3 {
    let invert = |value: f32| {
        if value.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / value
        }
    };
    Vec3::new(invert(inertia.x), invert(inertia.y), invert(inertia.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Quat;

    #[test]
    fn rotated_box_bounds_grow() {
        let rotation = Mat3::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4));
        let bounds = Aabb::from_oriented_box(Vec3::ZERO, &rotation, Vec3::ONE);
        assert_relative_eq!(bounds.max.x, std::f32::consts::SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn touching_bounds_intersect() {
        let a = Aabb::from_center_extents(Vec3::ZERO, Vec3::splat(0.5));
        let b = Aabb::from_center_extents(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
        let c = Aabb::from_center_extents(Vec3::new(1.01, 0.0, 0.0), Vec3::splat(0.5));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn unit_cube_inverse_inertia() {
        let inverse = Vec3::for_solid_box(Vec3::splat(0.5), 1.0);
        assert_relative_eq!(inverse.x, 6.0, epsilon = 1e-5);
        assert_eq!(Vec3::for_solid_box(Vec3::ONE, 0.0), Vec3::ZERO);
    }
}
