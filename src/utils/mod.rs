//! Utility helpers: generational storage, math extensions, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, GenerationalId, ShapeHandle};
pub use math::*;
pub use profiling::StepProfile;
