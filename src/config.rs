//! Compile-time tuning constants for the boxdrop core.

/// Mass sentinel marking a body as static (immovable, zero inverse mass).
pub const STATIC_MASS: f32 = 0.0;

/// Hard capacity of a collision manifold.
pub const MAX_COLLISION_CONTACTS: usize = 16;

/// Consecutive calm ticks after which a dynamic shape is considered asleep.
pub const SLEEP_THRESHOLD: u32 = 30;

/// Linear speed below which a tick counts as calm.
pub const SLEEP_LINEAR_SPEED: f32 = 1.5;

/// Angular speed below which a tick counts as calm.
pub const SLEEP_ANGULAR_SPEED: f32 = 0.5;

/// Velocity change (linear + angular magnitude) from a resolution that wakes a sleeping shape.
pub const WAKE_VELOCITY_EPSILON: f32 = 0.05;

/// Fixed simulation rate.
pub const SUBSTEPS_PER_SECOND: f32 = 600.0;

/// Duration of a single sub-step (in seconds).
pub const SUBSTEP_DT: f32 = 1.0 / SUBSTEPS_PER_SECOND;

pub const MIN_SUBSTEPS: u32 = 1;
pub const MAX_SUBSTEPS: u32 = 20;

/// Frame times longer than this are clamped before choosing a sub-step count.
pub const MAX_FRAME_TIME: f32 = 1.0 / 30.0;

/// Default gravity vector applied to awake dynamic shapes (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Coefficient of restitution for closing contacts.
pub const RESTITUTION: f32 = 0.2;

/// Closing speed below which restitution is ignored, so resting contacts do not jitter.
pub const RESTITUTION_VELOCITY_THRESHOLD: f32 = 1.0;

/// Coulomb friction coefficient shared by every contact.
pub const FRICTION: f32 = 0.5;

/// Impulse passes over one manifold's contact points.
pub const SOLVER_ITERATIONS: u32 = 4;

/// Per-tick time budget used for the slow-tick warning (milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 4.0;
