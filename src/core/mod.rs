//! Core types describing simulated shapes and their shared data.

pub mod shape;
pub mod types;

pub use shape::{Shape, ShapeKind, SleepState};
pub use types::{Aabb, InverseInertiaExt};
