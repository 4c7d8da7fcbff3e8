//! Simulation dynamics: fixed sub-step integration, penetration resolution, sleeping.

pub mod integrator;
pub mod sleep;
pub mod solver;

pub use integrator::Integrator;
pub use sleep::SleepTracker;
pub use solver::PenetrationResolver;
