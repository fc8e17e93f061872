//! Game model: one rigid body, one collision shape, and the world it lives in
//!
//! A [`GameModel`] runs detection and response for a single object. Detection
//! only *schedules* a collision: it sets `is_response_required` and returns
//! the time until impact in seconds. The caller integrates up to that time
//! and then invokes the matching response, which consumes the rest of the
//! tick. Detecting again while a response is pending is an error.

use crate::core::config::PhysicsConfig;
use crate::debug::DebugDraw;
use crate::environment::{Terrain, WorldEnvironment};
use crate::foundation::math::{Vec3, Vec3Ext};
use super::collision::{CollisionShape, Ray};
use super::error::{PhysicsError, PhysicsResult};
use super::response::{self, ResponseInformation, TerrainResponse};
use super::rigid_body::RigidBody;

/// A simulated object bound to a terrain and a world environment
pub struct GameModel<'a> {
    body: RigidBody,
    shape: CollisionShape,
    response_information: ResponseInformation,
    terrain: &'a dyn Terrain,
    environment: &'a dyn WorldEnvironment,
    is_grounded: bool,
    is_response_required: bool,
    drag_coefficient: f32,
    projected_area: f32,
}

impl<'a> GameModel<'a> {
    /// Create a model at the origin with a unit-mass body
    pub fn new(
        shape: CollisionShape,
        terrain: &'a dyn Terrain,
        environment: &'a dyn WorldEnvironment,
        config: PhysicsConfig,
    ) -> PhysicsResult<Self> {
        let mut model = Self {
            body: RigidBody::new(config),
            shape,
            response_information: ResponseInformation::default(),
            terrain,
            environment,
            is_grounded: false,
            is_response_required: false,
            drag_coefficient: 0.0,
            projected_area: 0.0,
        };
        model.update_model_info()?;
        Ok(model)
    }

    /// Place the model
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.body.set_position(position);
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> PhysicsResult<Self> {
        self.body.set_mass(mass)?;
        Ok(self)
    }

    /// Set the per-axis rotational inertia
    pub fn with_rotational_inertia(mut self, inertia: Vec3) -> PhysicsResult<Self> {
        self.body.set_rotational_inertia(inertia)?;
        Ok(self)
    }

    /// Set the coefficient of restitution
    pub fn with_restitution(mut self, restitution: f32) -> PhysicsResult<Self> {
        self.body.set_coefficient_restitution(restitution)?;
        Ok(self)
    }

    /// Set the friction coefficient (input within `[0, 1]`)
    pub fn with_friction(mut self, friction: f32) -> PhysicsResult<Self> {
        self.body.set_friction_coefficient(friction)?;
        Ok(self)
    }

    /// Set the initial linear velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.body.set_linear_velocity(velocity);
        self
    }

    /// Set the initial angular velocity
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.body.set_angular_velocity(velocity);
        self
    }

    /// Replace the collision shape and refresh the values derived from it
    pub fn set_shape(&mut self, shape: CollisionShape) -> PhysicsResult<()> {
        self.shape = shape;
        self.update_model_info()
    }

    fn update_model_info(&mut self) -> PhysicsResult<()> {
        self.body.set_volume(self.shape.volume())?;
        self.drag_coefficient = self.shape.drag_coefficient(self.body.config());
        self.projected_area = self.shape.projected_area();
        log::debug!(
            "model shape is a {} of volume {:.3}, drag {} over area {:.3}",
            self.shape.kind(),
            self.body.volume(),
            self.drag_coefficient,
            self.projected_area
        );
        Ok(())
    }

    // ----- accessors -----

    /// The rigid body
    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    /// Mutable access to the rigid body
    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    /// The collision shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// Record of the latest detection and the committed collision
    pub fn response_information(&self) -> &ResponseInformation {
        &self.response_information
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// Linear velocity
    pub fn linear_velocity(&self) -> Vec3 {
        self.body.linear_velocity()
    }

    /// Angular velocity
    pub fn angular_velocity(&self) -> Vec3 {
        self.body.angular_velocity()
    }

    /// Mass
    pub fn mass(&self) -> f32 {
        self.body.mass()
    }

    /// Volume of the collision shape
    pub fn volume(&self) -> f32 {
        self.body.volume()
    }

    /// Cached drag coefficient of the collision shape
    pub fn drag_coefficient(&self) -> f32 {
        self.drag_coefficient
    }

    /// Cached projected area of the collision shape
    pub fn projected_area(&self) -> f32 {
        self.projected_area
    }

    /// Fraction of the shape below the environment's fluid surface
    pub fn submerged_volume_fraction(&self) -> f32 {
        let surface = self.environment.fluid_surface_height() - self.body.position().y;
        self.shape.submerged_volume_fraction(surface)
    }

    /// True once the model has settled onto the terrain
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    /// Force the grounded state
    pub fn set_grounded(&mut self, grounded: bool) {
        self.is_grounded = grounded;
    }

    /// True while a detected collision waits for its response
    pub fn is_response_required(&self) -> bool {
        self.is_response_required
    }

    // ----- forces -----

    /// Queue a one-shot impulse at a model-space point
    pub fn set_impulse_force(&mut self, force: Vec3, application_point: Vec3) {
        self.body.set_impulse_force(force, application_point);
    }

    /// Replace the continuous world force and torque
    pub fn set_world_force(&mut self, force: Vec3, torque: Vec3) {
        self.body.set_world_force(force, torque);
    }

    /// Update velocities from world forces and any queued impulse
    pub fn apply_forces(&mut self, dt: f32) -> PhysicsResult<()> {
        self.body.throttle_angular_velocity();

        let environment = self.environment;
        environment.add_world_forces(self, dt)?;

        self.body.apply_forces()
    }

    // ----- integration -----

    /// Integrate position for `dt` seconds, then lift the model back onto the
    /// terrain surface if it ended up below it
    pub fn update_position(&mut self, dt: f32) -> PhysicsResult<()> {
        self.body.update_position(dt);
        self.rest_on_terrain()
    }

    fn rest_on_terrain(&mut self) -> PhysicsResult<()> {
        let position = self.body.position();
        if !self.terrain.is_in_bounds(position.x, position.z) {
            return Ok(());
        }

        let depth = self.shape.support_depth();
        let height = self.terrain.terrain_height_at(position.x, position.z, false)?;
        if position.y - depth < height {
            log::trace!("resting model on terrain at height {height}");
            self.body.set_position(Vec3::new(position.x, height + depth, position.z));
        }
        Ok(())
    }

    // ----- detection -----

    fn in_frame(&self, time: Option<f32>) -> Option<f32> {
        let tolerance = self.body.config().tolerance;
        time.filter(|t| *t <= 1.0 && *t >= -tolerance)
    }

    /// Fraction of the next `dt` at which the model meets the terrain
    fn terrain_collision_time(&mut self, dt: f32) -> PhysicsResult<Option<f32>> {
        let tolerance = self.body.config().tolerance;
        let mut ray = response::calculate_ray(&self.body, dt);
        self.response_information.testing_ray = ray;

        if ray.vector.is_close_to_zero(tolerance) {
            return Ok(None);
        }

        // sweep from the lowest point of the shape
        ray.origin.y -= self.shape.support_depth();
        self.response_information.testing_ray = ray;

        if !self.terrain.is_in_bounds(ray.origin.x, ray.origin.z) {
            return Ok(None);
        }

        let plane = self.terrain.locate_polygon(ray.origin.x, ray.origin.z)?.plane()?;
        self.response_information.testing_plane = plane;

        if self.is_grounded {
            self.response_information.collision_time = 0.0;
            return Ok(Some(0.0));
        }

        let time = plane.intersection_time(&ray, tolerance)?;
        if let Some(time) = time {
            self.response_information.collision_time = time;
        }
        Ok(time)
    }

    /// Look for a terrain collision within the next `dt` seconds
    ///
    /// Returns the seconds until impact, or `dt` when there is none. On impact
    /// the model is flagged as needing a response.
    pub fn collision_detect_terrain(&mut self, dt: f32) -> PhysicsResult<f32> {
        if self.is_response_required {
            return Err(PhysicsError::PreconditionViolation(
                "cannot detect a terrain collision while a response is pending".to_string(),
            ));
        }

        let time = self.terrain_collision_time(dt)?;
        match self.in_frame(time) {
            Some(fraction) => {
                self.is_response_required = true;
                self.response_information.commit();
                log::debug!(
                    "terrain collision at {:.3} of tick, position {:?}",
                    fraction,
                    self.body.position()
                );
                Ok(fraction * dt)
            }
            None => Ok(dt),
        }
    }

    /// Fraction of the next `dt` at which this model meets `target`
    fn model_collision_time(&self, target: &GameModel<'_>, dt: f32) -> Option<f32> {
        let target_ray: Ray = response::calculate_ray(&target.body, dt);
        let focus_ray: Ray = response::calculate_ray(&self.body, dt);
        self.shape.test_collision(&target.shape, &target_ray, &focus_ray, self.body.config().tolerance)
    }

    /// Look for a collision with `target` within the next `dt` seconds
    ///
    /// Returns the seconds until impact, or `dt` when there is none. On impact
    /// both models are flagged as needing a response.
    pub fn collision_detect_game_model(&mut self, target: &mut GameModel<'_>, dt: f32) -> PhysicsResult<f32> {
        if self.is_response_required || target.is_response_required {
            return Err(PhysicsError::PreconditionViolation(
                "cannot detect a model collision while a response is pending".to_string(),
            ));
        }

        match self.in_frame(self.model_collision_time(target, dt)) {
            Some(fraction) => {
                self.is_response_required = true;
                target.is_response_required = true;
                log::debug!(
                    "model collision at {:.3} of tick between {:?} and {:?}",
                    fraction,
                    self.body.position(),
                    target.body.position()
                );
                Ok(fraction * dt)
            }
            None => Ok(dt),
        }
    }

    // ----- response -----

    /// Resolve the pending terrain collision and integrate `remaining` seconds
    pub fn collision_response_terrain(&mut self, remaining: f32) -> PhysicsResult<()> {
        if !self.is_response_required {
            return Err(PhysicsError::PreconditionViolation(
                "no terrain collision is pending".to_string(),
            ));
        }

        match response::compute_terrain_response(&self.body, &self.response_information, self.is_grounded)? {
            TerrainResponse::Rolling(delta) => {
                self.is_grounded = true;
                self.body.set_change_in_velocity(delta);
                self.body.commit_rolling_change();
            }
            TerrainResponse::Bounce(delta) => {
                self.body.set_change_in_velocity(delta);
                self.body.commit_velocity_change();
            }
        }

        self.update_position(remaining)?;
        self.is_response_required = false;
        Ok(())
    }

    /// Resolve the pending collision with `target` and integrate both models
    /// for `remaining` seconds
    pub fn collision_response_game_model(&mut self, target: &mut GameModel<'_>, remaining: f32) -> PhysicsResult<()> {
        if !self.is_response_required || !target.is_response_required {
            return Err(PhysicsError::PreconditionViolation(
                "no model collision is pending".to_string(),
            ));
        }

        let (delta, target_delta) =
            response::compute_game_model_response(&self.body, &self.shape, &target.body, &target.shape)?;

        self.body.set_change_in_velocity(delta);
        target.body.set_change_in_velocity(target_delta);
        self.body.commit_velocity_change();
        target.body.commit_velocity_change();

        self.update_position(remaining)?;
        target.update_position(remaining)?;

        self.is_response_required = false;
        target.is_response_required = false;
        Ok(())
    }

    // ----- debug -----

    /// Emit the collision volume at the model's position
    pub fn render_collision_bounds(&self, draw: &mut dyn DebugDraw) {
        self.shape.render_collision_volume(&self.body.position(), draw);
    }
}

impl std::fmt::Debug for GameModel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameModel")
            .field("body", &self.body)
            .field("shape", &self.shape)
            .field("is_grounded", &self.is_grounded)
            .field("is_response_required", &self.is_response_required)
            .finish_non_exhaustive()
    }
}
