use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};
use log::warn;

use crate::{
    collision::{
        broadphase::BroadPhase,
        contact::CollisionManifold,
        narrowphase::NarrowPhase,
        queries::{PickHit, SegmentPick},
    },
    config::{MAX_FRAME_TIME, MAX_SUBSTEPS, MIN_SUBSTEPS, SUBSTEPS_PER_SECOND},
    core::shape::Shape,
    dynamics::{integrator::Integrator, sleep::SleepTracker, solver::PenetrationResolver},
    error::PhysicsResult,
    utils::{
        allocator::{Arena, ShapeHandle},
        logging::TraceSpan,
        profiling::{ScopedTimer, StepProfile},
    },
};

/// Sub-step count for a frame of `dt` seconds: 600 Hz, frame time capped at 1/30 s,
/// result clamped to `[MIN_SUBSTEPS, MAX_SUBSTEPS]`.
pub fn substeps_for_frame(dt: f32) -> u32 {
    let dt = dt.clamp(0.0, MAX_FRAME_TIME);
    // A NaN frame time casts to zero and is lifted to the minimum.
    ((SUBSTEPS_PER_SECOND * dt).round() as u32).clamp(MIN_SUBSTEPS, MAX_SUBSTEPS)
}

/// Owns the shapes and drives sub-stepped simulation ticks.
///
/// Collision pairs are resolved immediately and in sweep order (Gauss-Seidel
/// style), so stacking results depend on the order shapes sit in the arena.
/// That order is insertion order, except that removing a shape moves the last
/// shape into its place.
pub struct PhysicsWorld {
    shapes: Arena<Shape>,
    integrator: Integrator,
    resolver: PenetrationResolver,
    sleep: SleepTracker,
    /// Scratch buffer shared by every pair test in a tick.
    manifold: CollisionManifold,
    profile: StepProfile,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            shapes: Arena::new(),
            integrator: Integrator::default(),
            resolver: PenetrationResolver::default(),
            sleep: SleepTracker::default(),
            manifold: CollisionManifold::new(),
            profile: StepProfile::default(),
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.integrator.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.integrator.gravity = gravity;
    }

    /// Inserts a shape and refreshes its cached transform and bounds.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeHandle {
        shape.refresh_transform();
        shape.refresh_bounds();
        self.shapes.insert(shape)
    }

    pub fn remove_shape(&mut self, handle: ShapeHandle) -> Option<Shape> {
        self.shapes.remove(handle)
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(handle)
    }

    pub fn shape_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.shapes.get_mut(handle)
    }

    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.shapes.contains(handle)
    }

    /// Handles in sweep order.
    pub fn handles(&self) -> &[ShapeHandle] {
        self.shapes.handles()
    }

    /// Shapes in sweep order.
    pub fn shapes(&self) -> &[Shape] {
        self.shapes.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> + '_ {
        self.shapes
            .handles()
            .iter()
            .copied()
            .zip(self.shapes.iter())
    }

    /// Cached world transform per shape, for rendering.
    pub fn transforms(&self) -> impl Iterator<Item = (ShapeHandle, &Mat4)> + '_ {
        self.iter().map(|(handle, shape)| (handle, shape.transform()))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Scratch manifold; holds the last pair that overlapped.
    pub fn manifold(&self) -> &CollisionManifold {
        &self.manifold
    }

    pub fn last_profile(&self) -> &StepProfile {
        &self.profile
    }

    /// Pairs currently accepted by the broad-phase, without advancing the simulation.
    pub fn potential_pairs(&self) -> Vec<(ShapeHandle, ShapeHandle)> {
        let handles = self.shapes.handles();
        BroadPhase::potential_pairs(self.shapes.as_slice())
            .into_iter()
            .map(|(i, j)| (handles[i], handles[j]))
            .collect()
    }

    /// Nearest shape whose bounding sphere the segment `start..end` enters.
    pub fn pick(&self, start: Vec3, end: Vec3) -> Option<PickHit> {
        SegmentPick::cast(start, end, self.iter())
    }

    /// Runs one tick of `substeps` fixed sub-steps, then updates sleep counters once.
    ///
    /// Requests outside `[MIN_SUBSTEPS, MAX_SUBSTEPS]` are clamped.
    pub fn step(&mut self, substeps: u32) -> PhysicsResult<()> {
        let clamped = substeps.clamp(MIN_SUBSTEPS, MAX_SUBSTEPS);
        if clamped != substeps {
            warn!("substep request {substeps} clamped to {clamped}");
        }

        let started = Instant::now();
        self.profile.reset();
        self.profile.substeps = clamped;
        self.profile.shape_count = self.shapes.len();

        for _ in 0..clamped {
            {
                let _span = TraceSpan::new("substep::integrate");
                let _timer = ScopedTimer::new(&mut self.profile.integrate_time);
                self.integrator.integrate_all(self.shapes.as_mut_slice());
            }
            {
                let _span = TraceSpan::new("substep::refresh");
                let _timer = ScopedTimer::new(&mut self.profile.refresh_time);
                for shape in self.shapes.iter_mut() {
                    shape.refresh_transform();
                    shape.refresh_bounds();
                }
            }

            let _span = TraceSpan::new("substep::sweep");
            let mut sweep_time = Duration::ZERO;
            let swept = {
                let _timer = ScopedTimer::new(&mut sweep_time);
                Self::sweep(
                    self.shapes.as_mut_slice(),
                    &self.resolver,
                    &mut self.manifold,
                    &mut self.profile,
                )
            };
            self.profile.sweep_time += sweep_time;
            swept?;
        }

        {
            let _span = TraceSpan::new("tick::sleep");
            self.profile.asleep_count = self.sleep.update_all(self.shapes.as_mut_slice());
        }

        self.profile.total_time = started.elapsed();
        self.profile.report();
        Ok(())
    }

    /// Pairwise broad -> narrow -> resolve over every `i < j`, in slice order.
    fn sweep(
        shapes: &mut [Shape],
        resolver: &PenetrationResolver,
        manifold: &mut CollisionManifold,
        profile: &mut StepProfile,
    ) -> PhysicsResult<()> {
        let count = shapes.len();
        for i in 0..count {
            if shapes[i].noclip {
                continue;
            }
            for j in (i + 1)..count {
                let (head, tail) = shapes.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                if b.noclip || (a.is_resting() && b.is_resting()) {
                    continue;
                }
                profile.pairs_considered += 1;

                if !BroadPhase::test(a, b) {
                    continue;
                }
                profile.broadphase_hits += 1;

                if NarrowPhase::detect(a, b, manifold)? {
                    profile.narrowphase_hits += 1;
                    profile.contact_points += manifold.num_points();
                    resolver.resolve(a, b, manifold);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STATIC_MASS;

    #[test]
    fn frame_time_maps_to_substeps() {
        assert_eq!(substeps_for_frame(1.0 / 60.0), 10);
        assert_eq!(substeps_for_frame(1.0), MAX_SUBSTEPS);
        assert_eq!(substeps_for_frame(0.0), MIN_SUBSTEPS);
        assert_eq!(substeps_for_frame(-1.0), MIN_SUBSTEPS);
        assert_eq!(substeps_for_frame(f32::NAN), MIN_SUBSTEPS);
    }

    #[test]
    fn resting_pairs_are_not_considered() {
        let mut world = PhysicsWorld::new();
        world.add_shape(Shape::new_box(STATIC_MASS, Vec3::ONE));
        world.add_shape(Shape::new_box(STATIC_MASS, Vec3::ONE).with_center(Vec3::X));

        world.step(3).unwrap();

        assert_eq!(world.last_profile().pairs_considered, 0);
        assert_eq!(world.last_profile().substeps, 3);
    }

    #[test]
    fn queries_reflect_current_shapes() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.gravity(), Vec3::from_array(crate::config::DEFAULT_GRAVITY));
        world.set_gravity(Vec3::ZERO);
        assert_eq!(world.gravity(), Vec3::ZERO);

        let a = world.add_shape(Shape::new_box(2.0, Vec3::ONE));
        let b = world.add_shape(Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(1.5, 0.0, 0.0)));
        let far = world.add_shape(Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(9.0, 0.0, 0.0)));

        assert_eq!(world.shape(a).unwrap().mass(), 2.0);
        assert_eq!(world.potential_pairs(), vec![(a, b)]);

        world.step(1).unwrap();
        assert_eq!(world.manifold().num_points(), 4);
        assert_eq!(world.manifold().normal, Vec3::X);

        world.remove_shape(far);
        assert!(!world.contains(far));
        assert!(world.contains(a) && world.contains(b));
    }

    #[test]
    fn out_of_range_substeps_are_clamped() {
        let mut world = PhysicsWorld::new();
        world.add_shape(Shape::new_box(1.0, Vec3::ONE));

        world.step(0).unwrap();
        assert_eq!(world.last_profile().substeps, MIN_SUBSTEPS);
        world.step(500).unwrap();
        assert_eq!(world.last_profile().substeps, MAX_SUBSTEPS);
    }

    #[test]
    fn overlapping_pair_is_counted_and_separated() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec3::ZERO);
        let a = world.add_shape(Shape::new_box(1.0, Vec3::ONE));
        let b = world.add_shape(Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(1.5, 0.0, 0.0)));

        world.step(1).unwrap();

        let profile = world.last_profile();
        assert_eq!(profile.pairs_considered, 1);
        assert_eq!(profile.broadphase_hits, 1);
        assert_eq!(profile.narrowphase_hits, 1);
        let gap = world.shape(b).unwrap().center.x - world.shape(a).unwrap().center.x;
        assert!(gap >= 2.0 - 1e-4, "gap was {gap}");
    }
}
