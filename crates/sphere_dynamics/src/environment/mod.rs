//! World collaborators of the physics core
//!
//! Game models borrow a [`Terrain`] to collide against and a
//! [`WorldEnvironment`] that supplies continuous forces. Both must outlive
//! every model that uses them. [`HeightField`] and [`FluidEnvironment`] are the
//! stock implementations.

pub mod terrain;
pub mod world;

pub use terrain::HeightField;
pub use world::{FluidEnvironment, ZeroForceEnvironment};

use crate::physics::collision::Triangle;
use crate::physics::error::PhysicsResult;
use crate::physics::GameModel;

/// Static ground the bodies collide with
pub trait Terrain {
    /// True when `(x, z)` lies over the terrain
    fn is_in_bounds(&self, x: f32, z: f32) -> bool;

    /// Height of the ground at `(x, z)`
    ///
    /// With `use_fluid_floor` the result never drops below the fluid surface.
    fn terrain_height_at(&self, x: f32, z: f32, use_fluid_floor: bool) -> PhysicsResult<f32>;

    /// The terrain polygon directly above or below `(x, z)`
    ///
    /// Fails with `OutOfBounds` off the terrain.
    fn locate_polygon(&self, x: f32, z: f32) -> PhysicsResult<Triangle>;
}

/// Supplier of continuous world forces
pub trait WorldEnvironment {
    /// Work out this tick's world force and torque for `model` and hand them
    /// back through [`GameModel::set_world_force`]
    fn add_world_forces(&self, model: &mut GameModel<'_>, dt: f32) -> PhysicsResult<()>;

    /// Height of the fluid surface
    fn fluid_surface_height(&self) -> f32;
}
