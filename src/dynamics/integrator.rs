use glam::Vec3;

use crate::{
    config::{DEFAULT_GRAVITY, SUBSTEP_DT},
    core::shape::Shape,
    utils::math::angular_velocity_to_quat,
};

/// Advances shapes by one fixed sub-step under constant gravity.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub dt: f32,
    pub gravity: Vec3,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(SUBSTEP_DT)
    }
}

impl Integrator {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
        }
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Semi-implicit Euler step. Skips shapes that are noclip, static or asleep.
    pub fn integrate(&self, shape: &mut Shape) {
        if !shape.can_integrate() {
            return;
        }

        shape.velocity += self.gravity * self.dt;
        shape.center += shape.velocity * self.dt;

        let delta = angular_velocity_to_quat(shape.angular_velocity, self.dt);
        shape.orientation = (delta * shape.orientation).normalize();
    }

    pub fn integrate_all(&self, shapes: &mut [Shape]) -> usize {
        let mut integrated = 0;
        for shape in shapes.iter_mut() {
            if shape.can_integrate() {
                self.integrate(shape);
                integrated += 1;
            }
        }
        integrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SLEEP_THRESHOLD, STATIC_MASS};
    use approx::assert_relative_eq;

    #[test]
    fn free_shape_accelerates_downward() {
        let integrator = Integrator::new(0.1);
        let mut shape = Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(0.0, 10.0, 0.0));

        integrator.integrate(&mut shape);

        assert_relative_eq!(shape.velocity.y, -0.981, epsilon = 1e-5);
        assert_relative_eq!(shape.center.y, 10.0 - 0.0981, epsilon = 1e-5);
    }

    #[test]
    fn spinning_shape_rotates() {
        let integrator = Integrator::new(0.5).with_gravity(Vec3::ZERO);
        let mut shape = Shape::new_box(1.0, Vec3::ONE).with_angular_velocity(Vec3::new(0.0, 1.0, 0.0));

        integrator.integrate(&mut shape);

        let (axis, angle) = shape.orientation.to_axis_angle();
        assert_relative_eq!(angle, 0.5, epsilon = 1e-5);
        assert_relative_eq!(axis.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn static_sleeping_and_noclip_shapes_hold_still() {
        let integrator = Integrator::default();
        let mut shapes = vec![
            Shape::new_box(STATIC_MASS, Vec3::ONE),
            Shape::new_box(1.0, Vec3::ONE).with_noclip(true),
            Shape::new_box(1.0, Vec3::ONE).with_velocity(Vec3::X),
            Shape::new_box(1.0, Vec3::ONE),
        ];
        shapes[2].sleep_count = SLEEP_THRESHOLD;

        assert_eq!(integrator.integrate_all(&mut shapes), 1);
        for shape in &shapes[..3] {
            assert_eq!(shape.center, Vec3::ZERO);
        }
        assert!(shapes[3].center.y < 0.0);
    }
}
