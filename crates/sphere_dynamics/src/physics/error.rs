//! Physics error types

/// Errors raised by the physics core
///
/// None of these are recovered from inside the core. They are propagated to the
/// caller of the operation, and ultimately to whoever drives `run_physics`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// An argument was outside its valid domain (non-positive mass, zero axis,
    /// zero-length normal, degenerate triangle and so on)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked in a state that does not allow it
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    /// A terrain query fell outside the height field
    #[error("Terrain query out of bounds at ({x}, {z})")]
    OutOfBounds {
        /// World X coordinate of the query
        x: f32,
        /// World Z coordinate of the query
        z: f32,
    },

    /// A shape reached code that only supports other shape kinds
    #[error("Unrecognized collision shape: {0}")]
    UnrecognizedShape(String),
}

/// Result alias used throughout the physics module
pub type PhysicsResult<T> = Result<T, PhysicsError>;
