use glam::{Mat3, Vec3};

use crate::{
    collision::contact::CollisionManifold,
    config::{
        FRICTION, MAX_COLLISION_CONTACTS, RESTITUTION, RESTITUTION_VELOCITY_THRESHOLD,
        SOLVER_ITERATIONS, WAKE_VELOCITY_EPSILON,
    },
    core::shape::Shape,
};

/// Per-point impulse state, accumulated across solver passes.
#[derive(Debug, Clone, Copy, Default)]
struct ContactConstraint {
    r_a: Vec3,
    r_b: Vec3,
    normal_mass: f32,
    /// Separating speed the normal impulse aims for (restitution).
    target_speed: f32,
    accumulated_normal_impulse: f32,
    accumulated_tangent_impulse: Vec3,
}

/// Velocity and position response to a single manifold.
#[derive(Debug, Clone)]
pub struct PenetrationResolver {
    pub iterations: u32,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for PenetrationResolver {
    fn default() -> Self {
        Self {
            iterations: SOLVER_ITERATIONS,
            restitution: RESTITUTION,
            friction: FRICTION,
        }
    }
}

/// Inverse mass properties of one side of a contact.
struct BodyInverse {
    mass: f32,
    inertia: Mat3,
}

impl BodyInverse {
    fn of(shape: &Shape) -> Self {
        Self {
            mass: shape.inverse_mass(),
            inertia: shape.world_inverse_inertia(),
        }
    }

    fn angular_term(&self, r: Vec3, direction: Vec3) -> f32 {
        let arm = r.cross(direction);
        arm.dot(self.inertia * arm)
    }
}

impl PenetrationResolver {
    /// Resolves one detected overlap in place. `manifold.normal` points from `a` to `b`.
    ///
    /// Returns `false` when both shapes are immovable and nothing was done.
    pub fn resolve(&self, a: &mut Shape, b: &mut Shape, manifold: &CollisionManifold) -> bool {
        let inv_a = BodyInverse::of(a);
        let inv_b = BodyInverse::of(b);
        let total_inverse_mass = inv_a.mass + inv_b.mass;
        if total_inverse_mass <= 0.0 {
            return false;
        }

        let before_a = (a.velocity, a.angular_velocity);
        let before_b = (b.velocity, b.angular_velocity);

        self.apply_impulses(a, b, &inv_a, &inv_b, manifold);

        Self::wake_if_disturbed(a, before_a);
        Self::wake_if_disturbed(b, before_b);

        // Positional correction split by inverse mass. A static side never moves,
        // and a side still asleep is held in place: its resting pairs are skipped,
        // so any push into its support would never be undone.
        let mut share_a = Self::positional_weight(a, &inv_a);
        let mut share_b = Self::positional_weight(b, &inv_b);
        if share_a + share_b <= 0.0 {
            share_a = inv_a.mass;
            share_b = inv_b.mass;
        }
        let total = share_a + share_b;
        let correction = manifold.normal * manifold.depth;
        a.center -= correction * (share_a / total);
        b.center += correction * (share_b / total);
        true
    }

    fn positional_weight(shape: &Shape, inverse: &BodyInverse) -> f32 {
        if shape.is_asleep() {
            0.0
        } else {
            inverse.mass
        }
    }

    fn apply_impulses(
        &self,
        a: &mut Shape,
        b: &mut Shape,
        inv_a: &BodyInverse,
        inv_b: &BodyInverse,
        manifold: &CollisionManifold,
    ) {
        let normal = manifold.normal;
        let mut constraints = [ContactConstraint::default(); MAX_COLLISION_CONTACTS];
        let points = manifold.contact_points();

        for (constraint, point) in constraints.iter_mut().zip(points) {
            let r_a = *point - a.center;
            let r_b = *point - b.center;
            let k = inv_a.mass
                + inv_b.mass
                + inv_a.angular_term(r_a, normal)
                + inv_b.angular_term(r_b, normal);
            let closing = Self::relative_velocity(a, b, r_a, r_b).dot(normal);
            *constraint = ContactConstraint {
                r_a,
                r_b,
                normal_mass: if k > 0.0 { 1.0 / k } else { 0.0 },
                target_speed: if -closing > RESTITUTION_VELOCITY_THRESHOLD {
                    -self.restitution * closing
                } else {
                    0.0
                },
                ..ContactConstraint::default()
            };
        }
        let constraints = &mut constraints[..points.len()];

        for _ in 0..self.iterations {
            for constraint in constraints.iter_mut() {
                let ContactConstraint { r_a, r_b, .. } = *constraint;

                // Normal: remove the closing component, clamped to push only.
                let speed = Self::relative_velocity(a, b, r_a, r_b).dot(normal);
                let lambda = (constraint.target_speed - speed) * constraint.normal_mass;
                let previous = constraint.accumulated_normal_impulse;
                constraint.accumulated_normal_impulse = (previous + lambda).max(0.0);
                let applied = constraint.accumulated_normal_impulse - previous;
                Self::apply_impulse(a, b, inv_a, inv_b, r_a, r_b, normal * applied);

                // Friction: oppose sliding, bounded by the Coulomb cone.
                let relative = Self::relative_velocity(a, b, r_a, r_b);
                let sliding = relative - normal * relative.dot(normal);
                let Some(tangent) = sliding.try_normalize() else {
                    continue;
                };
                let k = inv_a.mass
                    + inv_b.mass
                    + inv_a.angular_term(r_a, tangent)
                    + inv_b.angular_term(r_b, tangent);
                if k <= 0.0 {
                    continue;
                }
                let max_friction = self.friction * constraint.accumulated_normal_impulse;
                let previous = constraint.accumulated_tangent_impulse;
                constraint.accumulated_tangent_impulse =
                    (previous - tangent * (sliding.length() / k)).clamp_length_max(max_friction);
                let applied = constraint.accumulated_tangent_impulse - previous;
                Self::apply_impulse(a, b, inv_a, inv_b, r_a, r_b, applied);
            }
        }
    }

    /// Velocity of `b`'s contact point relative to `a`'s.
    fn relative_velocity(a: &Shape, b: &Shape, r_a: Vec3, r_b: Vec3) -> Vec3 {
        (b.velocity + b.angular_velocity.cross(r_b)) - (a.velocity + a.angular_velocity.cross(r_a))
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_impulse(
        a: &mut Shape,
        b: &mut Shape,
        inv_a: &BodyInverse,
        inv_b: &BodyInverse,
        r_a: Vec3,
        r_b: Vec3,
        impulse: Vec3,
    ) {
        a.velocity -= impulse * inv_a.mass;
        a.angular_velocity -= inv_a.inertia * r_a.cross(impulse);
        b.velocity += impulse * inv_b.mass;
        b.angular_velocity += inv_b.inertia * r_b.cross(impulse);
    }

    fn wake_if_disturbed(shape: &mut Shape, before: (Vec3, Vec3)) {
        if !shape.is_asleep() {
            return;
        }
        let change = (shape.velocity - before.0).length() + (shape.angular_velocity - before.1).length();
        if change > WAKE_VELOCITY_EPSILON {
            log::trace!("waking shape at {:?} (velocity change {change:.3})", shape.center);
            shape.wake();
        }
    }
}
