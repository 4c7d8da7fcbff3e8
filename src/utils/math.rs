//! Additional math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    let axis = angular.normalize();
    Quat::from_axis_angle(axis, angle)
}

/// Rotates a body-space diagonal inverse inertia into world space: `R * diag * R^T`.
pub fn world_inverse_inertia(orientation: Quat, local_inverse: Vec3) -> Mat3 {
    let rotation = Mat3::from_quat(orientation);
    rotation * Mat3::from_diagonal(local_inverse) * rotation.transpose()
}

/// Closest points between two segments `p1..q1` and `p2..q2`.
pub fn closest_points_on_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= f32::EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= f32::EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
