//! High-level collision shape abstraction
//!
//! Shapes are stored in model space and positioned by their owning rigid body
//! at test time. The set of shapes is closed: every capability is an
//! exhaustive `match`, so adding a variant is checked at compile time.

use crate::core::config::PhysicsConfig;
use crate::debug::DebugDraw;
use crate::foundation::math::Vec3;
use crate::physics::error::PhysicsResult;
use super::primitives::Ray;
use super::sphere::BoundingSphere;

/// Collision shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// A spherical collision shape
    Sphere(BoundingSphere),
}

impl CollisionShape {
    /// Creates a spherical collision shape centred on its body
    pub fn sphere(radius: f32) -> PhysicsResult<Self> {
        Ok(Self::Sphere(BoundingSphere::new(radius)?))
    }

    /// Human-readable shape name for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
        }
    }

    /// Shape volume
    pub fn volume(&self) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.volume(),
        }
    }

    /// Drag coefficient used by viscous drag
    pub fn drag_coefficient(&self, config: &PhysicsConfig) -> f32 {
        match self {
            Self::Sphere(_) => config.sphere_drag_coefficient,
        }
    }

    /// Cross-sectional area facing the flow
    pub fn projected_area(&self) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.projected_area(),
        }
    }

    /// Fraction of the volume below a surface at `surface_height` (relative to
    /// the owning body's position)
    pub fn submerged_volume_fraction(&self, surface_height: f32) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.submerged_volume_fraction(surface_height),
        }
    }

    /// Model-space center of the shape
    pub fn local_offset(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.local_offset(),
        }
    }

    /// Distance from the body's position down to the lowest point of the shape
    ///
    /// Terrain sweeps start from this point and resting contact keeps it on
    /// the surface.
    pub fn support_depth(&self) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.radius(),
        }
    }

    /// Swept test of `self` (moving along `focus_ray`) against `target`
    /// (moving along `target_ray`); see [`BoundingSphere::collision_detect`]
    pub fn test_collision(
        &self,
        target: &CollisionShape,
        target_ray: &Ray,
        focus_ray: &Ray,
        tolerance: f32,
    ) -> Option<f32> {
        match (self, target) {
            (Self::Sphere(focus), Self::Sphere(other)) => {
                focus.collision_detect(other, target_ray, focus_ray, tolerance)
            }
        }
    }

    /// Emit the collision volume for a body at `world_position`
    pub fn render_collision_volume(&self, world_position: &Vec3, draw: &mut dyn DebugDraw) {
        match self {
            Self::Sphere(sphere) => sphere.render_collision_volume(world_position, draw),
        }
    }
}

impl From<BoundingSphere> for CollisionShape {
    fn from(sphere: BoundingSphere) -> Self {
        Self::Sphere(sphere)
    }
}
