//! # Sphere Dynamics
//!
//! A real-time rigid-sphere physics core for games.
//!
//! ## Features
//!
//! - **Swept detection**: Time-of-impact tests against terrain planes and other spheres
//! - **Impulse response**: Restitution, spin and grip for bounces and pair collisions
//! - **Rolling contact**: Grounded bodies roll with damping instead of bouncing
//! - **World forces**: Gravity, buoyancy and viscous drag through [`environment::WorldEnvironment`]
//! - **Configurable**: TOML and RON configuration files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sphere_dynamics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let terrain = HeightField::flat(65, 1.0, 0.0)?;
//!     let environment = FluidEnvironment::default();
//!     let mut models = GameModelCollection::new(16);
//!
//!     let ball = GameModel::new(
//!         CollisionShape::sphere(1.0)?,
//!         &terrain,
//!         &environment,
//!         PhysicsConfig::default(),
//!     )?
//!     .with_position(Vec3::new(10.0, 30.0, 10.0));
//!     models.add_game_model(ball)?;
//!
//!     for _ in 0..60 {
//!         models.run_physics(1.0 / 60.0)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration
pub mod core;
pub mod config;

pub mod foundation;
pub mod physics;
pub mod environment;
pub mod debug;

/// Common imports for physics users
pub mod prelude {
    pub use crate::{
        core::config::{Config, EnvironmentConfig, PhysicsConfig, SimulationConfig},
        debug::{DebugDraw, DebugDrawSystem, NullDebugDraw},
        environment::{FluidEnvironment, HeightField, Terrain, WorldEnvironment, ZeroForceEnvironment},
        foundation::{
            math::{Quat, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            BoundingSphere, CollisionShape, GameModel, GameModelCollection, PhysicsError, PhysicsResult,
            RigidBody,
        },
    };
}
