use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// The core is purely computational; the only failure it reports is a broken
/// design limit. Degenerate geometry is handled in place and never surfaces here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhysicsError {
    /// A contact buffer was asked to hold more points than its fixed capacity.
    #[error("contact capacity exceeded: a manifold holds at most {capacity} points")]
    ContactCapacityExceeded { capacity: usize },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
