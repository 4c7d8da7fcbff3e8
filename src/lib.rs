//! boxdrop – real-time rigid-body physics for oriented boxes.
//!
//! The crate exposes a small sub-stepped simulation core: shapes live in a
//! generational arena, every sub-step integrates awake bodies, refreshes their
//! cached transforms and bounds, then sweeps all pairs through an AABB
//! broad-phase, a separating-axis narrow-phase and an impulse resolver.
//! Sleep counters are updated once per tick.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

use std::time::Instant;

pub use glam::{Mat3, Mat4, Quat, Vec3};

pub use collision::{
    broadphase::BroadPhase,
    contact::{CollisionManifold, ContactPoints},
    narrowphase::{NarrowPhase, SatBoxBox},
    queries::{line_intersect_sphere, PickHit, SegmentPick},
};
pub use crate::core::{
    shape::{Shape, ShapeKind, SleepState},
    types::Aabb,
};
pub use dynamics::{integrator::Integrator, sleep::SleepTracker, solver::PenetrationResolver};
pub use error::{PhysicsError, PhysicsResult};
pub use utils::{
    allocator::{Arena, GenerationalId, ShapeHandle},
    profiling::StepProfile,
};
pub use world::{substeps_for_frame, PhysicsWorld};

use config::DEFAULT_FRAME_BUDGET_MS;
use utils::logging::warn_if_frame_budget_exceeded;

/// High-level convenience wrapper that owns a [`PhysicsWorld`] and drives it from frame time.
pub struct PhysicsEngine {
    world: PhysicsWorld,
    frame_budget_ms: f32,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }

    /// Overrides the per-tick time budget used for the slow-tick warning.
    pub fn with_frame_budget_ms(mut self, budget_ms: f32) -> Self {
        self.frame_budget_ms = budget_ms;
        self
    }

    pub fn frame_budget_ms(&self) -> f32 {
        self.frame_budget_ms
    }

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// Returns the number of sub-steps that were run.
    pub fn tick(&mut self, dt: f32) -> PhysicsResult<u32> {
        let substeps = substeps_for_frame(dt);
        let started = Instant::now();
        self.world.step(substeps)?;
        warn_if_frame_budget_exceeded(started.elapsed(), self.frame_budget_ms);
        Ok(substeps)
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        self.world.add_shape(shape)
    }

    pub fn remove_shape(&mut self, handle: ShapeHandle) -> Option<Shape> {
        self.world.remove_shape(handle)
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.world.shape(handle)
    }

    pub fn shape_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.world.shape_mut(handle)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_substeps_used() {
        let mut engine = PhysicsEngine::new();
        let handle = engine.add_shape(Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(0.0, 5.0, 0.0)));

        assert_eq!(engine.tick(1.0 / 60.0).unwrap(), 10);
        assert_eq!(engine.tick(0.5).unwrap(), config::MAX_SUBSTEPS);
        assert!(engine.shape(handle).unwrap().center.y < 5.0);
    }

    #[test]
    fn removed_shape_handle_goes_stale() {
        let mut engine = PhysicsEngine::new().with_frame_budget_ms(100.0);
        let handle = engine.add_shape(Shape::new_box(1.0, Vec3::ONE));

        assert_eq!(engine.frame_budget_ms(), 100.0);
        assert!(engine.remove_shape(handle).is_some());
        assert!(engine.shape(handle).is_none());
        assert!(engine.world().is_empty());
    }
}
