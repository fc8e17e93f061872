//! Rigid body state and integration
//!
//! A [`RigidBody`] owns the kinematic state of one simulated object: mass,
//! linear and angular motion, orientation and the forces queued against it.
//!
//! Forces come in two kinds. A *world force* (gravity, buoyancy, drag) is
//! re-supplied every tick and always applied. An *impulse* is applied once per
//! call to [`RigidBody::set_impulse_force`], guarded by a latch.
//!
//! Collision response never writes velocities directly. It stages a
//! [`VelocityDelta`], and the delta only takes effect when it is committed.
//! Two bodies in one collision can therefore both read the other's
//! pre-collision state.

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{self, constants, Mat3, Quat, Vec3, Vec3Ext};
use super::error::{PhysicsError, PhysicsResult};
use super::response::VelocityDelta;

/// Kinematic and dynamic state of a single rigid body
#[derive(Debug, Clone)]
pub struct RigidBody {
    config: PhysicsConfig,

    mass: f32,
    inverted_mass: f32,
    volume: f32,
    rotational_inertia: Vec3,
    coefficient_restitution: f32,
    friction_coefficient: f32,

    position: Vec3,
    orientation: Quat,
    linear_velocity: Vec3,
    linear_acceleration: Vec3,
    angular_velocity: Vec3,
    angular_acceleration: Vec3,

    impulse_force: Vec3,
    impulse_application_point: Vec3,
    is_impulse_applied: bool,

    world_force: Vec3,
    world_torque: Vec3,

    pending: VelocityDelta,
}

impl RigidBody {
    /// Create a unit-mass body at the origin
    ///
    /// Defaults: mass 1, volume 1, inertia (1, 1, 1), restitution 0.9 and a
    /// friction input of 1.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            mass: 1.0,
            inverted_mass: 1.0,
            volume: 1.0,
            rotational_inertia: Vec3::new(1.0, 1.0, 1.0),
            coefficient_restitution: 0.9,
            friction_coefficient: 1.0 / config.friction_divisor,
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            linear_acceleration: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            angular_acceleration: Vec3::zeros(),
            impulse_force: Vec3::zeros(),
            impulse_application_point: Vec3::zeros(),
            is_impulse_applied: true,
            world_force: Vec3::zeros(),
            world_torque: Vec3::zeros(),
            pending: VelocityDelta::zero(),
        }
    }

    /// Tuning values this body was created with
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ----- mass properties -----

    /// Mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Cached `1 / mass`
    pub fn inverted_mass(&self) -> f32 {
        self.inverted_mass
    }

    /// Set the mass; must be positive
    pub fn set_mass(&mut self, mass: f32) -> PhysicsResult<()> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "mass must be positive, got {mass}"
            )));
        }
        self.mass = mass;
        self.inverted_mass = 1.0 / mass;
        Ok(())
    }

    /// Volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume; must be positive
    pub fn set_volume(&mut self, volume: f32) -> PhysicsResult<()> {
        if !(volume > 0.0 && volume.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "volume must be positive, got {volume}"
            )));
        }
        self.volume = volume;
        Ok(())
    }

    /// Mass per unit volume
    pub fn density(&self) -> f32 {
        self.mass / self.volume
    }

    /// Per-axis rotational inertia
    pub fn rotational_inertia(&self) -> Vec3 {
        self.rotational_inertia
    }

    /// Set the per-axis rotational inertia; no axis may be zero
    pub fn set_rotational_inertia(&mut self, inertia: Vec3) -> PhysicsResult<()> {
        if inertia.iter().any(|c| *c == 0.0 || !c.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "rotational inertia cannot contain a zero axis: {inertia:?}"
            )));
        }
        self.rotational_inertia = inertia;
        Ok(())
    }

    /// Coefficient of restitution
    pub fn coefficient_restitution(&self) -> f32 {
        self.coefficient_restitution
    }

    /// Set the coefficient of restitution; must be within `(0, 1]`
    pub fn set_coefficient_restitution(&mut self, restitution: f32) -> PhysicsResult<()> {
        if !(restitution > 0.0 && restitution <= 1.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "restitution must be in (0, 1], got {restitution}"
            )));
        }
        self.coefficient_restitution = restitution;
        Ok(())
    }

    /// Stored friction coefficient (the input scaled down by the friction divisor)
    pub fn friction_coefficient(&self) -> f32 {
        self.friction_coefficient
    }

    /// Set the friction coefficient from an input within `[0, 1]`
    ///
    /// 1 is grippy, 0 is no grip. The value is stored divided by
    /// `friction_divisor`.
    pub fn set_friction_coefficient(&mut self, friction: f32) -> PhysicsResult<()> {
        if !(0.0..=1.0).contains(&friction) {
            return Err(PhysicsError::InvalidArgument(format!(
                "friction must be between 0 and 1, got {friction}"
            )));
        }
        self.friction_coefficient = friction / self.config.friction_divisor;
        Ok(())
    }

    // ----- kinematic state -----

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the body
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orientation quaternion (always unit length)
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Replace the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Rotation matrix for the orientation `time` seconds from now at the
    /// current angular velocity; `0.0` gives the current orientation
    pub fn orientation_matrix(&self, time: f32) -> Mat3 {
        let orientation = if time == 0.0 {
            self.orientation
        } else {
            math::rotate_about_xyz(&self.orientation, &(self.angular_velocity * time))
        };
        orientation.to_rotation_matrix().into_inner()
    }

    /// Linear velocity
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Overwrite the linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    /// Linear acceleration from the last impulse
    pub fn linear_acceleration(&self) -> Vec3 {
        self.linear_acceleration
    }

    /// Angular velocity (radians per second about each axis)
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Overwrite the angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }

    /// Angular acceleration from the last impulse
    pub fn angular_acceleration(&self) -> Vec3 {
        self.angular_acceleration
    }

    /// Translation rate a rolling body gets from its spin
    pub fn roll_velocity(&self) -> Vec3 {
        Vec3::new(self.angular_velocity.z, 0.0, -self.angular_velocity.x)
    }

    // ----- forces -----

    /// Queue a one-shot impulse applied at a model-space point
    ///
    /// The impulse is consumed by the next [`RigidBody::apply_forces`].
    pub fn set_impulse_force(&mut self, force: Vec3, application_point: Vec3) {
        self.impulse_force = force;
        self.impulse_application_point = application_point;
        self.is_impulse_applied = false;
    }

    /// Replace the continuous world force and torque for this tick
    pub fn set_world_force(&mut self, force: Vec3, torque: Vec3) {
        self.world_force = force;
        self.world_torque = torque;
    }

    /// Clear the queued impulse force and its application point
    pub fn zero_force(&mut self) {
        self.impulse_force = Vec3::zeros();
        self.impulse_application_point = Vec3::zeros();
    }

    /// Clamp each angular velocity component to `±velocity_limit`
    pub fn throttle_angular_velocity(&mut self) {
        self.angular_velocity.clamp_components(self.config.velocity_limit);
    }

    /// Bleed off spin by `1 - friction * spin_damping_scale`
    pub fn dampen_angular_velocity(&mut self) {
        self.angular_velocity *= self.spin_retention();
    }

    /// Factor [`RigidBody::dampen_angular_velocity`] scales spin by
    pub fn spin_retention(&self) -> f32 {
        1.0 - self.friction_coefficient * self.config.spin_damping_scale
    }

    /// Apply the world force every call and the impulse once per impulse set
    ///
    /// Only velocities change; positions wait for [`RigidBody::update_position`].
    pub fn apply_forces(&mut self) -> PhysicsResult<()> {
        self.throttle_angular_velocity();

        self.linear_velocity += self.world_force * self.inverted_mass;
        self.angular_velocity += self.world_torque.checked_component_div(&self.rotational_inertia)?;

        if !self.is_impulse_applied {
            self.is_impulse_applied = true;

            self.linear_acceleration = self.impulse_force * self.inverted_mass;
            self.linear_velocity += self.linear_acceleration;

            let torque = self.impulse_application_point.cross(&self.impulse_force);
            self.angular_acceleration = torque.checked_component_div(&self.rotational_inertia)?;
            self.angular_velocity += self.angular_acceleration;

            log::trace!(
                "impulse applied: dv={:?} dw={:?}",
                self.linear_acceleration,
                self.angular_acceleration
            );
        }

        Ok(())
    }

    // ----- integration -----

    /// Advance position and orientation by `dt` seconds
    ///
    /// Near-zero velocity components are snapped to zero first so that
    /// resting bodies do not drift.
    pub fn update_position(&mut self, dt: f32) {
        self.linear_velocity.simplify(self.config.tolerance);
        self.angular_velocity.simplify(self.config.tolerance);

        self.position += self.linear_velocity * dt;
        self.orientation = math::rotate_about_xyz(&self.orientation, &(self.angular_velocity * dt));
    }

    /// Advance position from spin alone, as a wheel of `circumference` would
    pub fn update_roll_position(&mut self, dt: f32, circumference: f32) {
        let revolutions = self.roll_velocity() / constants::TAU;
        self.position += revolutions * dt * circumference;
        self.orientation = math::rotate_about_xyz(&self.orientation, &(self.angular_velocity * dt));
    }

    // ----- two-phase velocity change -----

    /// Stage a velocity change computed by collision response
    pub fn set_change_in_velocity(&mut self, delta: VelocityDelta) {
        self.pending = delta;
    }

    /// Stage only the linear part of a velocity change
    pub fn set_change_in_linear_velocity(&mut self, delta: Vec3) {
        self.pending.linear = delta;
    }

    /// Stage only the angular part of a velocity change
    pub fn set_change_in_angular_velocity(&mut self, delta: Vec3) {
        self.pending.angular = delta;
    }

    /// Velocity change staged but not yet committed
    pub fn pending_velocity_change(&self) -> &VelocityDelta {
        &self.pending
    }

    /// Commit the staged linear change and clear it
    pub fn apply_change_in_linear_velocity(&mut self) {
        self.linear_velocity += self.pending.linear;
        self.pending.linear = Vec3::zeros();
    }

    /// Commit the staged angular change, clear it and re-clamp the spin
    pub fn apply_change_in_angular_velocity(&mut self) {
        self.angular_velocity += self.pending.angular;
        self.pending.angular = Vec3::zeros();
        self.throttle_angular_velocity();
    }

    /// Commit both staged changes
    pub fn commit_velocity_change(&mut self) {
        self.apply_change_in_linear_velocity();
        self.apply_change_in_angular_velocity();
    }

    /// Commit both staged changes without re-clamping the spin
    ///
    /// Rolling contact only scales the velocities it is given, so a spin that
    /// arrived above `velocity_limit` stays proportionally above it.
    pub fn commit_rolling_change(&mut self) {
        self.apply_change_in_linear_velocity();
        self.angular_velocity += self.pending.angular;
        self.pending.angular = Vec3::zeros();
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
