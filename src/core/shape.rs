use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{Aabb, InverseInertiaExt};
use crate::{config::SLEEP_THRESHOLD, utils::math::world_inverse_inertia};

/// Closed set of supported geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl ShapeKind {
    /// Number of variants; sizes the narrow-phase dispatch table.
    pub const COUNT: usize = 2;

    /// Row/column of this variant in the narrow-phase dispatch table.
    pub fn table_index(&self) -> usize {
        match self {
            ShapeKind::Box { .. } => 0,
            ShapeKind::Sphere { .. } => 1,
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            ShapeKind::Box { half_extents } => half_extents.length(),
            ShapeKind::Sphere { radius } => *radius,
        }
    }

    fn local_inverse_inertia(&self, mass: f32) -> Vec3 {
        match self {
            ShapeKind::Box { half_extents } => Vec3::for_solid_box(*half_extents, mass),
            ShapeKind::Sphere { radius } => Vec3::for_solid_sphere(*radius, mass),
        }
    }
}

/// Where a shape sits in the sleep state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    Awake,
    Asleep,
    /// Static shapes are permanently outside the sleep machine.
    Static,
}

/// Simulated body: geometry plus kinematic state and sleep bookkeeping.
///
/// Positions and velocities are expected to be finite; the core does not check.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Excluded from every collision test and from integration.
    pub noclip: bool,
    pub sleep_count: u32,
    mass: f32,
    inverse_mass: f32,
    local_inverse_inertia: Vec3,
    is_static: bool,
    transform: Mat4,
    bounds: Aabb,
}

impl Shape {
    /// Creates a shape; a mass of `STATIC_MASS` (zero) makes it static.
    pub fn new(kind: ShapeKind, mass: f32) -> Self {
        let mut shape = Self {
            kind,
            center: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            noclip: false,
            sleep_count: 0,
            mass,
            inverse_mass: 0.0,
            local_inverse_inertia: Vec3::ZERO,
            is_static: false,
            transform: Mat4::IDENTITY,
            bounds: Aabb::default(),
        };
        shape.set_mass(mass);
        shape.refresh_transform();
        shape.refresh_bounds();
        shape
    }

    pub fn new_box(mass: f32, half_extents: Vec3) -> Self {
        Self::new(ShapeKind::Box { half_extents }, mass)
    }

    pub fn new_sphere(mass: f32, radius: f32) -> Self {
        Self::new(ShapeKind::Sphere { radius }, mass)
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self.refresh_transform();
        self.refresh_bounds();
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self.refresh_transform();
        self.refresh_bounds();
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_noclip(mut self, noclip: bool) -> Self {
        self.noclip = noclip;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.is_static = mass.abs() < f32::EPSILON;
        self.recompute_inverses();
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Pins a massive shape in place, or releases it. A shape with `STATIC_MASS`
    /// stays static either way, since it has no inverse mass to respond with.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static || self.mass.abs() < f32::EPSILON;
        self.recompute_inverses();
    }

    /// Zero for static shapes.
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn world_inverse_inertia(&self) -> Mat3 {
        if self.is_static {
            return Mat3::ZERO;
        }
        world_inverse_inertia(self.orientation, self.local_inverse_inertia)
    }

    pub fn is_asleep(&self) -> bool {
        !self.is_static && self.sleep_count >= SLEEP_THRESHOLD
    }

    pub fn sleep_state(&self) -> SleepState {
        if self.is_static {
            SleepState::Static
        } else if self.is_asleep() {
            SleepState::Asleep
        } else {
            SleepState::Awake
        }
    }

    pub fn wake(&mut self) {
        self.sleep_count = 0;
    }

    /// Eligible for integration this sub-step.
    pub fn can_integrate(&self) -> bool {
        !self.noclip && !self.is_static && !self.is_asleep()
    }

    /// Static or asleep: a pair of resting shapes needs no collision work.
    pub fn is_resting(&self) -> bool {
        self.is_static || self.is_asleep()
    }

    /// Cached world transform (rotation + translation) from the last refresh.
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Cached world bounds from the last refresh.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn bounding_radius(&self) -> f32 {
        self.kind.bounding_radius()
    }

    /// World-space direction of each local axis, read from the cached transform.
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.transform.x_axis.truncate(),
            self.transform.y_axis.truncate(),
            self.transform.z_axis.truncate(),
        ]
    }

    pub fn refresh_transform(&mut self) {
        self.transform = Mat4::from_rotation_translation(self.orientation, self.center);
    }

    pub fn refresh_bounds(&mut self) {
        self.bounds = match self.kind {
            ShapeKind::Box { half_extents } => {
                let rotation = Mat3::from_mat4(self.transform);
                Aabb::from_oriented_box(self.center, &rotation, half_extents)
            }
            ShapeKind::Sphere { radius } => {
                Aabb::from_center_extents(self.center, Vec3::splat(radius))
            }
        };
    }

    /// Conservative bounds test; never rejects shapes that actually overlap.
    pub fn overlaps_broad(&self, other: &Shape) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    fn recompute_inverses(&mut self) {
        if self.is_static || self.mass.abs() < f32::EPSILON {
            self.inverse_mass = 0.0;
            self.local_inverse_inertia = Vec3::ZERO;
        } else {
            self.inverse_mass = 1.0 / self.mass;
            self.local_inverse_inertia = self.kind.local_inverse_inertia(self.mass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STATIC_MASS;

    #[test]
    fn zero_mass_marks_shape_static() {
        let ground = Shape::new_box(STATIC_MASS, Vec3::new(100.0, 4.0, 100.0));
        assert!(ground.is_static());
        assert_eq!(ground.inverse_mass(), 0.0);
        assert_eq!(ground.world_inverse_inertia(), Mat3::ZERO);
        assert_eq!(ground.sleep_state(), SleepState::Static);
    }

    #[test]
    fn sleep_state_follows_counter() {
        let mut shape = Shape::new_box(1.0, Vec3::ONE);
        assert_eq!(shape.sleep_state(), SleepState::Awake);
        shape.sleep_count = SLEEP_THRESHOLD;
        assert_eq!(shape.sleep_state(), SleepState::Asleep);
        assert!(!shape.can_integrate());
        assert!(shape.is_resting());
        shape.wake();
        assert!(shape.can_integrate());
    }

    #[test]
    fn transform_and_bounds_follow_center() {
        let shape = Shape::new_box(1.0, Vec3::new(1.0, 2.0, 3.0)).with_center(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(shape.transform().w_axis.truncate(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(shape.bounds().min, Vec3::new(4.0, -2.0, -3.0));
        assert_eq!(shape.bounds().max, Vec3::new(6.0, 2.0, 3.0));
    }

    #[test]
    fn zero_mass_shape_cannot_be_released() {
        let mut ground = Shape::new_box(STATIC_MASS, Vec3::ONE);
        ground.set_static(false);
        assert!(ground.is_static());
        assert!(!ground.can_integrate());

        let mut crate_box = Shape::new_box(2.0, Vec3::ONE);
        crate_box.set_static(true);
        assert_eq!(crate_box.inverse_mass(), 0.0);
        crate_box.set_static(false);
        assert!(!crate_box.is_static());
        assert_eq!(crate_box.inverse_mass(), 0.5);
    }

    #[test]
    fn noclip_shape_is_not_integrated() {
        let shape = Shape::new_box(1.0, Vec3::ONE).with_noclip(true);
        assert!(!shape.can_integrate());
    }
}
