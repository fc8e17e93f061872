//! World environments supplying continuous forces

use crate::core::config::{EnvironmentConfig, PhysicsConfig};
use crate::foundation::math::{Vec3, Vec3Ext};
use crate::physics::error::PhysicsResult;
use crate::physics::GameModel;
use super::WorldEnvironment;

/// Gravity, buoyancy and viscous drag from a gas layer over a fluid layer
///
/// Everything above `fluid_surface_height` is gas, everything below is fluid.
/// Forces are computed per tick and scaled by `dt` before they are handed to
/// the model, so they arrive as velocity-sized changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidEnvironment {
    fluid_surface_height: f32,
    fluid_density: f32,
    gas_density: f32,
    gravity: f32,
    tolerance: f32,
}

impl FluidEnvironment {
    /// Create an environment from its configuration
    ///
    /// Velocities inside the physics tolerance band produce no drag.
    pub fn new(config: &EnvironmentConfig, physics: &PhysicsConfig) -> Self {
        Self {
            fluid_surface_height: config.fluid_surface_height,
            fluid_density: config.fluid_density,
            gas_density: config.gas_density,
            gravity: config.gravity,
            tolerance: physics.tolerance,
        }
    }

    /// Weight of a body, `m g`
    pub fn gravity_force(&self, mass: f32) -> f32 {
        mass * self.gravity
    }

    /// Upthrust from the fluid displaced by `submerged_volume`
    pub fn buoyancy_force(&self, submerged_volume: f32) -> f32 {
        -self.gravity * self.fluid_density * submerged_volume
    }

    /// Drag opposing `velocity`: `-v̂ · ½ ρ |v|² Cd A`
    ///
    /// The density is the gas and fluid densities blended by how much of the
    /// body is submerged.
    pub fn viscous_drag(
        &self,
        velocity: &Vec3,
        submerged_fraction: f32,
        drag_coefficient: f32,
        projected_area: f32,
    ) -> Vec3 {
        if velocity.is_close_to_zero(self.tolerance) {
            return Vec3::zeros();
        }

        let speed_squared = velocity.magnitude_squared();
        let direction = -velocity.normalize();
        let density = self.gas_density * (1.0 - submerged_fraction) + self.fluid_density * submerged_fraction;

        direction * (0.5 * density * speed_squared * drag_coefficient * projected_area)
    }
}

impl Default for FluidEnvironment {
    fn default() -> Self {
        Self::new(&EnvironmentConfig::default(), &PhysicsConfig::default())
    }
}

impl WorldEnvironment for FluidEnvironment {
    fn add_world_forces(&self, model: &mut GameModel<'_>, dt: f32) -> PhysicsResult<()> {
        let volume = model.volume();
        let submerged = model.submerged_volume_fraction();
        let drag_coefficient = model.drag_coefficient();
        let area = model.projected_area();

        let mut force = Vec3::zeros();
        force.y += self.gravity_force(model.mass());
        force.y += self.buoyancy_force(volume * submerged);
        force += self.viscous_drag(&model.linear_velocity(), submerged, drag_coefficient, area);

        let torque = self.viscous_drag(&model.angular_velocity(), submerged, drag_coefficient, area);

        model.set_world_force(force * dt, torque * dt);
        Ok(())
    }

    fn fluid_surface_height(&self) -> f32 {
        self.fluid_surface_height
    }
}

/// An environment that applies no forces at all
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroForceEnvironment;

impl WorldEnvironment for ZeroForceEnvironment {
    fn add_world_forces(&self, model: &mut GameModel<'_>, _dt: f32) -> PhysicsResult<()> {
        model.set_world_force(Vec3::zeros(), Vec3::zeros());
        Ok(())
    }

    fn fluid_surface_height(&self) -> f32 {
        f32::NEG_INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn still_water() -> FluidEnvironment {
        FluidEnvironment::new(
            &EnvironmentConfig {
                fluid_surface_height: 10.0,
                fluid_density: 1.0,
                gas_density: 0.0,
                gravity: -30.0,
            },
            &PhysicsConfig::default(),
        )
    }

    #[test]
    fn test_gravity_and_buoyancy() {
        let world = still_water();
        assert_eq!(world.gravity_force(2.0), -60.0);
        assert_eq!(world.buoyancy_force(0.5), 15.0);
    }

    #[test]
    fn test_drag_opposes_motion() {
        let world = still_water();
        let drag = world.viscous_drag(&Vec3::new(0.0, 0.0, 2.0), 1.0, 0.4, 1.0);
        // 0.5 * 1 * 4 * 0.4 * 1
        assert_relative_eq!(drag, Vec3::new(0.0, 0.0, -0.8));
    }

    #[test]
    fn test_drag_vanishes_in_vacuum_and_at_rest() {
        let world = still_water();
        assert_eq!(world.viscous_drag(&Vec3::new(5.0, 0.0, 0.0), 0.0, 0.4, 1.0), Vec3::zeros());
        assert_eq!(world.viscous_drag(&Vec3::zeros(), 1.0, 0.4, 1.0), Vec3::zeros());
    }

    #[test]
    fn test_drag_blends_densities() {
        let world = FluidEnvironment::new(
            &EnvironmentConfig {
                fluid_surface_height: 0.0,
                fluid_density: 1.0,
                gas_density: 0.5,
                gravity: -10.0,
            },
            &PhysicsConfig::default(),
        );
        let half = world.viscous_drag(&Vec3::x(), 0.5, 1.0, 1.0);
        assert_relative_eq!(half, Vec3::new(-0.375, 0.0, 0.0));
    }

    #[test]
    fn test_drag_band_follows_physics_tolerance() {
        let slow = Vec3::new(0.001, 0.0, 0.0);
        let environment = EnvironmentConfig::default();

        let fine = FluidEnvironment::new(&environment, &PhysicsConfig::default());
        assert!(fine.viscous_drag(&slow, 1.0, 0.4, 1.0).x < 0.0);

        let coarse = FluidEnvironment::new(&environment, &PhysicsConfig::default().with_tolerance(0.01));
        assert_eq!(coarse.viscous_drag(&slow, 1.0, 0.4, 1.0), Vec3::zeros());
    }
}
