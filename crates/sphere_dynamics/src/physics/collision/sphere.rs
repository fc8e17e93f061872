//! Bounding sphere and the swept sphere-vs-sphere test

use crate::debug::DebugDraw;
use crate::foundation::math::{constants, Vec3, Vec3Ext};
use crate::physics::error::{PhysicsError, PhysicsResult};
use super::primitives::Ray;

/// A sphere stored in model space: radius plus a center offset from the
/// owning body's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    radius: f32,
    local_offset: Vec3,
}

impl BoundingSphere {
    /// Creates a sphere centred on its body
    pub fn new(radius: f32) -> PhysicsResult<Self> {
        Self::with_offset(radius, Vec3::zeros())
    }

    /// Creates a sphere whose center sits at `local_offset` in model space
    pub fn with_offset(radius: f32, local_offset: Vec3) -> PhysicsResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        Ok(Self { radius, local_offset })
    }

    /// Radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Center offset in model space
    pub fn local_offset(&self) -> Vec3 {
        self.local_offset
    }

    /// Volume, `4/3 π r³`
    pub fn volume(&self) -> f32 {
        constants::FOUR_OVER_THREE * constants::PI * self.radius.powi(3)
    }

    /// Cross-section seen along any axis, `π r²`
    pub fn projected_area(&self) -> f32 {
        constants::PI * self.radius * self.radius
    }

    /// Fraction of the volume below a fluid surface
    ///
    /// `surface_height` is measured relative to the owning body's position,
    /// so the sphere's own center is at `local_offset.y`.
    pub fn submerged_volume_fraction(&self, surface_height: f32) -> f32 {
        let center = self.local_offset.y;
        if center - self.radius >= surface_height {
            return 0.0;
        }
        if center + self.radius <= surface_height {
            return 1.0;
        }

        // spherical cap: 1/3 π (3r - y) y²
        let depth = surface_height - (center - self.radius);
        let cap = constants::ONE_OVER_THREE * constants::PI * (3.0 * self.radius - depth) * depth * depth;
        cap / self.volume()
    }

    /// Swept test of this sphere (moving along `focus_ray`) against `target`
    /// (moving along `target_ray`)
    ///
    /// Returns the fraction of the interval at which the spheres first touch,
    /// or `None` when they never touch along their relative motion. The
    /// fraction is not range-checked: values outside `[0, 1]` mean the contact
    /// happens outside this interval.
    pub fn collision_detect(
        &self,
        target: &BoundingSphere,
        target_ray: &Ray,
        focus_ray: &Ray,
        tolerance: f32,
    ) -> Option<f32> {
        let relative_movement = target_ray.vector - focus_ray.vector;
        if relative_movement.is_close_to_zero(tolerance) {
            return None;
        }

        let displacement = relative_movement.magnitude();
        let direction = relative_movement / displacement;
        let difference = focus_ray.origin - target_ray.origin;
        let radius_sum = self.radius + target.radius;

        let diff_dot_move_dir = difference.dot(&direction);
        let diff_dot_diff = difference.dot(&difference);

        let discriminant = diff_dot_move_dir * diff_dot_move_dir + radius_sum * radius_sum - diff_dot_diff;
        if discriminant < 0.0 {
            return None;
        }

        let entry_distance = diff_dot_move_dir - discriminant.sqrt();
        Some(entry_distance / displacement)
    }

    /// Emit the collision volume for a body at `world_position`
    pub fn render_collision_volume(&self, world_position: &Vec3, draw: &mut dyn DebugDraw) {
        draw.draw_sphere(world_position + self.local_offset, self.radius);
    }
}
