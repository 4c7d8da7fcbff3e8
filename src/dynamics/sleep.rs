use glam::Vec3;

use crate::{
    config::{SLEEP_ANGULAR_SPEED, SLEEP_LINEAR_SPEED},
    core::shape::Shape,
};

/// End-of-tick sleep bookkeeping.
///
/// A calm tick (linear and angular speed under their bounds) advances the
/// counter; any other tick resets it. A shape that is asleep after the update
/// has its residual motion cleared. Static shapes are skipped. Wake-on-impact
/// lives in the resolver.
#[derive(Debug, Clone, Copy)]
pub struct SleepTracker {
    pub linear_threshold: f32,
    pub angular_threshold: f32,
}

impl Default for SleepTracker {
    fn default() -> Self {
        Self {
            linear_threshold: SLEEP_LINEAR_SPEED,
            angular_threshold: SLEEP_ANGULAR_SPEED,
        }
    }
}

impl SleepTracker {
    pub fn is_calm(&self, shape: &Shape) -> bool {
        shape.velocity.length() < self.linear_threshold
            && shape.angular_velocity.length() < self.angular_threshold
    }

    pub fn update(&self, shape: &mut Shape) {
        if shape.is_static() {
            return;
        }
        if self.is_calm(shape) {
            shape.sleep_count = shape.sleep_count.saturating_add(1);
        } else {
            shape.sleep_count = 0;
        }
        if shape.is_asleep() {
            shape.velocity = Vec3::ZERO;
            shape.angular_velocity = Vec3::ZERO;
        }
    }

    /// Returns how many shapes are asleep afterwards.
    pub fn update_all(&self, shapes: &mut [Shape]) -> usize {
        let mut asleep = 0;
        for shape in shapes.iter_mut() {
            self.update(shape);
            if shape.is_asleep() {
                asleep += 1;
            }
        }
        asleep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SLEEP_THRESHOLD, STATIC_MASS};

    #[test]
    fn calm_ticks_accumulate_and_motion_resets() {
        let tracker = SleepTracker::default();
        let mut shape = Shape::new_box(1.0, Vec3::ONE).with_velocity(Vec3::new(1.0, 0.0, 0.0));

        for _ in 0..SLEEP_THRESHOLD - 1 {
            tracker.update(&mut shape);
        }
        assert!(!shape.is_asleep());
        assert_eq!(shape.velocity.x, 1.0);

        tracker.update(&mut shape);
        assert!(shape.is_asleep());
        assert_eq!(shape.velocity, Vec3::ZERO);
        assert_eq!(shape.angular_velocity, Vec3::ZERO);

        shape.velocity = Vec3::new(0.0, -2.0, 0.0);
        tracker.update(&mut shape);
        assert_eq!(shape.sleep_count, 0);
    }

    #[test]
    fn spin_counts_as_motion() {
        let tracker = SleepTracker::default();
        let mut shape = Shape::new_box(1.0, Vec3::ONE).with_angular_velocity(Vec3::new(0.0, 0.6, 0.0));
        tracker.update(&mut shape);
        assert_eq!(shape.sleep_count, 0);
    }

    #[test]
    fn static_shapes_have_no_counter() {
        let tracker = SleepTracker::default();
        let mut shapes = [Shape::new_box(STATIC_MASS, Vec3::ONE)];
        assert_eq!(tracker.update_all(&mut shapes), 0);
        assert_eq!(shapes[0].sleep_count, 0);
    }
}
