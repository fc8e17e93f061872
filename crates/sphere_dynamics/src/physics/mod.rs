//! Rigid-sphere physics core
//!
//! Bodies are swept against the terrain and against each other once per
//! tick. A detected collision splits the tick in two: motion up to the time of
//! impact, then an impulse response, then motion for what is left.

pub mod collection;
pub mod collision;
pub mod error;
pub mod game_model;
pub mod response;
pub mod rigid_body;

#[cfg(test)]
mod tests;

pub use collection::GameModelCollection;
pub use collision::{BoundingSphere, CollisionShape, Plane, PointPlaneClassification, Ray, Triangle};
pub use error::{PhysicsError, PhysicsResult};
pub use game_model::GameModel;
pub use response::{ResponseInformation, TerrainResponse, VelocityDelta};
pub use rigid_body::RigidBody;
