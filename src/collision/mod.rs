//! Collision detection: broad-phase pruning, narrow-phase SAT, contact manifolds, queries.

pub mod broadphase;
pub mod clipping;
pub mod contact;
pub mod narrowphase;
pub mod queries;

pub use broadphase::BroadPhase;
pub use contact::{CollisionManifold, ContactPoints};
pub use narrowphase::{NarrowPhase, PairTest, SatBoxBox};
pub use queries::{line_intersect_sphere, PickHit, SegmentPick};
