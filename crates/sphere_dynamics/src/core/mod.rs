//! # Core Module
//!
//! Shared abstractions used by every subsystem of the physics core.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for physics tuning, environment and runs
//! - **Foundation**: Low-level utilities (math, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    SimulationConfig,
    PhysicsConfig,
    EnvironmentConfig,
    Config,
    ConfigError,
    ConfigFormat,
};
