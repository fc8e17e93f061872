//! Impulse-based collision response
//!
//! Response is split into two phases. The functions here are pure: they read
//! a consistent pre-collision snapshot of the bodies involved and return the
//! [`VelocityDelta`] each body should receive. The caller stages those deltas
//! on the bodies and commits them once every participant has been computed.
//!
//! Both the terrain and the sphere-vs-sphere angular responses use the rigid
//! body impulse formula
//!
//! ```text
//!                      -vr (1 + e)
//! j = -------------------------------------------------
//!      1/m1 + 1/m2 + n.[((r1 x n)/I1) x r1] + n.[((r2 x n)/I2) x r2]
//! ```
//!
//! with the terrain treated as infinitely heavy (its terms vanish).

use std::ops::Add;

use crate::foundation::math::{self, Vec3, Vec3Ext};
use super::collision::{CollisionShape, Plane, Ray};
use super::error::{PhysicsError, PhysicsResult};
use super::rigid_body::RigidBody;

/// A change in linear and angular velocity produced by collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityDelta {
    /// Added to the linear velocity
    pub linear: Vec3,
    /// Added to the angular velocity
    pub angular: Vec3,
}

impl VelocityDelta {
    /// Create a delta from its parts
    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }

    /// A delta that changes nothing
    pub fn zero() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }

    /// True when neither part changes anything
    pub fn is_zero(&self) -> bool {
        self.linear.iter().chain(self.angular.iter()).all(|c| *c == 0.0)
    }
}

impl Default for VelocityDelta {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for VelocityDelta {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.linear + other.linear, self.angular + other.angular)
    }
}

/// Per-model record of a detected but not yet resolved collision
///
/// The `testing_*` fields are scratch values overwritten by every detection
/// attempt; the `collided_*` fields are the committed values a response reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseInformation {
    /// Sweep ray of the latest detection attempt
    pub testing_ray: Ray,
    /// Terrain plane of the latest detection attempt
    pub testing_plane: Plane,
    /// Sweep ray of the committed collision
    pub collided_ray: Ray,
    /// Terrain plane of the committed collision
    pub collided_plane: Plane,
    /// Fraction of the sweep at which the committed collision happens
    pub collision_time: f32,
}

impl ResponseInformation {
    /// Promote the testing ray and plane to the committed collision
    pub fn commit(&mut self) {
        self.collided_ray = self.testing_ray;
        self.collided_plane = self.testing_plane;
    }
}

impl Default for ResponseInformation {
    fn default() -> Self {
        let plane = Plane::new(Vec3::y(), 0.0);
        Self {
            testing_ray: Ray::default(),
            testing_plane: plane,
            collided_ray: Ray::default(),
            collided_plane: plane,
            collision_time: 0.0,
        }
    }
}

/// Outcome of a terrain collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerrainResponse {
    /// The body is resting on the terrain and only loses speed
    Rolling(VelocityDelta),
    /// The body bounces off the terrain
    Bounce(VelocityDelta),
}

impl TerrainResponse {
    /// Velocity change to stage on the body
    pub fn delta(&self) -> VelocityDelta {
        match self {
            Self::Rolling(delta) | Self::Bounce(delta) => *delta,
        }
    }

    /// True when the body should be marked grounded
    pub fn is_rolling(&self) -> bool {
        matches!(self, Self::Rolling(_))
    }
}

/// Sweep ray covering the body's movement over `dt`
pub fn calculate_ray(body: &RigidBody, dt: f32) -> Ray {
    Ray::new(body.position(), body.linear_velocity() * dt)
}

/// World position of the shape's center on `body`
pub fn collided_object_world_position(body: &RigidBody, shape: &CollisionShape) -> Vec3 {
    body.position() + body.orientation_matrix(0.0) * shape.local_offset()
}

/// Unit normal pointing from the first shape's center to the second's
pub fn collision_normal_sphere_vs_sphere(
    body1: &RigidBody,
    shape1: &CollisionShape,
    body2: &RigidBody,
    shape2: &CollisionShape,
) -> PhysicsResult<Vec3> {
    let world1 = collided_object_world_position(body1, shape1);
    let world2 = collided_object_world_position(body2, shape2);
    (world2 - world1).try_normalized()
}

/// `n . [((r x n) / I) x r]`, the inertia term of the impulse denominator
fn inertia_term(point: &Vec3, normal: &Vec3, inertia: &Vec3) -> PhysicsResult<f32> {
    let scaled = point.cross(normal).checked_component_div(inertia)?;
    Ok(normal.dot(&scaled.cross(point)))
}

fn checked_impulse(numerator: f32, denominator: f32) -> PhysicsResult<f32> {
    if denominator == 0.0 {
        return Err(PhysicsError::InvalidArgument(
            "impulse denominator is zero".to_string(),
        ));
    }
    Ok(numerator / denominator)
}

/// Compute the response of a body that hit the terrain
///
/// A body that is already grounded, or whose speed into the plane is under
/// `grounded_speed_threshold`, rolls: both velocities are scaled by
/// `rolling_damping`. Otherwise it bounces. The angular impulse is worked out
/// from the pre-bounce velocity, then the bounce direction picks up grip from
/// the existing spin, and the spin itself is damped.
pub fn compute_terrain_response(
    body: &RigidBody,
    info: &ResponseInformation,
    is_grounded: bool,
) -> PhysicsResult<TerrainResponse> {
    let config = body.config();
    let normal = info.collided_plane.normal;

    // reversed so it points away from the plane
    let total_velocity = -body.linear_velocity();
    let projected_velocity = total_velocity.dot(&normal);

    if is_grounded || projected_velocity < config.grounded_speed_threshold {
        return Ok(TerrainResponse::Rolling(sphere_vs_plane_roll_response(body)));
    }

    let angular_impulse = sphere_vs_plane_angular_impulse(body, info)?;
    let bounce_velocity = sphere_vs_plane_linear_impulse(body, &normal, &total_velocity, projected_velocity)?;

    // spin left after damping plus the impulse, expressed as a change
    let damped_spin = body.angular_velocity() * body.spin_retention();
    let angular = damped_spin + angular_impulse - body.angular_velocity();

    log::debug!(
        "terrain bounce: v {:?} -> {:?}, spin change {:?}",
        body.linear_velocity(),
        bounce_velocity,
        angular
    );

    Ok(TerrainResponse::Bounce(VelocityDelta::new(
        bounce_velocity - body.linear_velocity(),
        angular,
    )))
}

/// Rolling contact: lose a fixed share of linear and angular speed
pub fn sphere_vs_plane_roll_response(body: &RigidBody) -> VelocityDelta {
    let loss = body.config().rolling_damping - 1.0;
    VelocityDelta::new(body.linear_velocity() * loss, body.angular_velocity() * loss)
}

/// Change in angular velocity from striking the terrain plane
///
/// The contact point is where the committed sweep meets the plane, taken
/// relative to the body's current position. The result is scaled by the
/// friction coefficient and `grip_multiplier`.
pub fn sphere_vs_plane_angular_impulse(body: &RigidBody, info: &ResponseInformation) -> PhysicsResult<Vec3> {
    let config = body.config();
    let normal = info.collided_plane.normal;

    let contact = info.collided_ray.point_at(info.collision_time) - body.position();

    let velocity_sum = body.linear_velocity() + body.angular_velocity().cross(&contact);
    let projected = normal.dot(&velocity_sum);

    let numerator = -projected * (1.0 + body.coefficient_restitution());
    let denominator = body.inverted_mass() + inertia_term(&contact, &normal, &body.rotational_inertia())?;
    let impulse_force = normal * checked_impulse(numerator, denominator)?;

    Ok(contact.cross(&impulse_force) * (body.friction_coefficient() * config.grip_multiplier))
}

/// New linear velocity after bouncing off the terrain plane
///
/// `total_velocity` is the reversed incoming velocity and `projected_velocity`
/// its component along the plane normal.
pub fn sphere_vs_plane_linear_impulse(
    body: &RigidBody,
    normal: &Vec3,
    total_velocity: &Vec3,
    projected_velocity: f32,
) -> PhysicsResult<Vec3> {
    let incident = total_velocity.try_normalized()?;
    let mut direction = math::reflect(&incident, normal);

    // spin about Z pushes along X and spin about X pushes along Z
    let spin = body.angular_velocity();
    let friction = body.friction_coefficient();
    direction.x += spin.z * friction;
    direction.z += spin.x * friction;
    let direction = direction.try_normalized()?;

    Ok(direction * (projected_velocity * body.coefficient_restitution()))
}

/// Compute the responses of two spheres that hit each other
///
/// Both deltas are computed from the same snapshot. Restitution is the
/// average of the two bodies'.
pub fn compute_game_model_response(
    body1: &RigidBody,
    shape1: &CollisionShape,
    body2: &RigidBody,
    shape2: &CollisionShape,
) -> PhysicsResult<(VelocityDelta, VelocityDelta)> {
    match (shape1, shape2) {
        (CollisionShape::Sphere(sphere1), CollisionShape::Sphere(sphere2)) => {
            let normal = collision_normal_sphere_vs_sphere(body1, shape1, body2, shape2)?;

            let (angular1, angular2) =
                sphere_vs_sphere_angular(body1, sphere1.radius(), body2, sphere2.radius(), &normal)?;
            let (linear1, linear2) = sphere_vs_sphere_linear(body1, body2, &normal);

            log::debug!("sphere pair response along {normal:?}: dv1={linear1:?} dv2={linear2:?}");

            Ok((
                VelocityDelta::new(linear1, angular1),
                VelocityDelta::new(linear2, angular2),
            ))
        }
    }
}

/// Linear velocity changes for two spheres meeting along `normal`
///
/// Only the components along the normal change:
///
/// ```text
/// v1f = ((m1 - e m2) v1 + (1 + e) m2 v2) / (m1 + m2)
/// v2f = ((m2 - e m1) v2 + (1 + e) m1 v1) / (m1 + m2)
/// ```
pub fn sphere_vs_sphere_linear(body1: &RigidBody, body2: &RigidBody, normal: &Vec3) -> (Vec3, Vec3) {
    let (m1, m2) = (body1.mass(), body2.mass());
    let v1 = body1.linear_velocity().dot(normal);
    let v2 = body2.linear_velocity().dot(normal);
    let e = (body1.coefficient_restitution() + body2.coefficient_restitution()) * 0.5;

    let v1_final = ((m1 - e * m2) * v1 + (1.0 + e) * m2 * v2) / (m1 + m2);
    let v2_final = ((m2 - e * m1) * v2 + (1.0 + e) * m1 * v1) / (m1 + m2);

    (normal * (v1_final - v1), normal * (v2_final - v2))
}

/// Angular velocity changes for two spheres meeting along `normal`
///
/// The true contact points lie on the normal, which would make every torque
/// vanish. The normalized relative linear velocity stands in as the contact
/// point for both spheres instead.
pub fn sphere_vs_sphere_angular(
    body1: &RigidBody,
    radius1: f32,
    body2: &RigidBody,
    radius2: f32,
    normal: &Vec3,
) -> PhysicsResult<(Vec3, Vec3)> {
    let contact1 = normal * radius1;
    let contact2 = -normal * radius2;

    let velocity_sum1 = body1.linear_velocity() + body1.angular_velocity().cross(&contact1);
    let velocity_sum2 = body2.linear_velocity() + body2.angular_velocity().cross(&contact2);
    let projected = (velocity_sum2 - velocity_sum1).dot(normal);

    let surrogate = (body2.linear_velocity() - body1.linear_velocity()).try_normalized()?;

    let restitution = (body1.coefficient_restitution() + body2.coefficient_restitution()) * 0.5;
    let numerator = -projected * (1.0 + restitution);
    let denominator = body1.inverted_mass()
        + body2.inverted_mass()
        + inertia_term(&surrogate, normal, &body1.rotational_inertia())?
        + inertia_term(&surrogate, normal, &body2.rotational_inertia())?;
    let impulse_force = normal * checked_impulse(numerator, denominator)?;

    Ok((surrogate.cross(&impulse_force), surrogate.cross(&-impulse_force)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn body_at(position: Vec3, velocity: Vec3) -> RigidBody {
        let mut body = RigidBody::default();
        body.set_position(position);
        body.set_linear_velocity(velocity);
        body
    }

    fn ground_contact(body: &RigidBody, contact_offset: Vec3) -> ResponseInformation {
        ResponseInformation {
            collided_ray: Ray::new(body.position() + contact_offset, body.linear_velocity()),
            collided_plane: Plane::new(Vec3::y(), 0.0),
            collision_time: 0.0,
            ..ResponseInformation::default()
        }
    }

    #[test]
    fn test_grounded_body_rolls_at_ninety_percent() {
        let mut body = body_at(Vec3::new(3.0, 1.0, 3.0), Vec3::new(2.0, -0.5, 1.0));
        body.set_angular_velocity(Vec3::new(1.0, 0.0, -2.0));
        let info = ground_contact(&body, Vec3::new(0.0, -1.0, 0.0));

        let response = compute_terrain_response(&body, &info, true).unwrap();
        assert!(response.is_rolling());

        body.set_change_in_velocity(response.delta());
        body.commit_velocity_change();
        assert_relative_eq!(body.linear_velocity(), Vec3::new(1.8, -0.45, 0.9), epsilon = 1e-6);
        assert_relative_eq!(body.angular_velocity(), Vec3::new(0.9, 0.0, -1.8), epsilon = 1e-6);
    }

    #[test]
    fn test_rolling_scales_spin_beyond_limit() {
        let mut body = body_at(Vec3::new(3.0, 1.0, 3.0), Vec3::new(2.0, 0.0, 0.0));
        body.set_angular_velocity(Vec3::new(0.0, 0.0, 8.0));
        let info = ground_contact(&body, Vec3::new(0.0, -1.0, 0.0));

        let response = compute_terrain_response(&body, &info, true).unwrap();
        body.set_change_in_velocity(response.delta());
        body.commit_rolling_change();

        assert_relative_eq!(body.angular_velocity(), Vec3::new(0.0, 0.0, 7.2), epsilon = 1e-5);
        assert_relative_eq!(body.linear_velocity(), Vec3::new(1.8, 0.0, 0.0), epsilon = 1e-6);
        assert!(body.pending_velocity_change().is_zero());
    }

    #[test]
    fn test_slow_impact_becomes_rolling() {
        let body = body_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(3.0, -0.5, 0.0));
        let info = ground_contact(&body, Vec3::new(0.0, -1.0, 0.0));
        assert!(compute_terrain_response(&body, &info, false).unwrap().is_rolling());
    }

    #[test]
    fn test_straight_bounce_scales_by_restitution() {
        let mut body = body_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
        let info = ground_contact(&body, Vec3::new(0.0, -1.0, 0.0));

        let response = compute_terrain_response(&body, &info, false).unwrap();
        assert!(!response.is_rolling());

        body.set_change_in_velocity(response.delta());
        body.commit_velocity_change();
        assert_relative_eq!(body.linear_velocity(), Vec3::new(0.0, 4.5, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(body.angular_velocity(), Vec3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_spin_adds_grip_to_bounce() {
        let mut body = body_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
        body.set_friction_coefficient(1.0).unwrap();
        body.set_angular_velocity(Vec3::new(0.0, 0.0, 2.0));
        let info = ground_contact(&body, Vec3::new(0.0, -1.0, 0.0));

        let response = compute_terrain_response(&body, &info, false).unwrap();
        body.set_change_in_velocity(response.delta());
        body.commit_velocity_change();

        let velocity = body.linear_velocity();
        assert!(velocity.x > 0.0);
        assert_relative_eq!(velocity.magnitude(), 4.5, epsilon = 1e-5);
        assert_relative_eq!(velocity.x / velocity.y, 0.2, epsilon = 1e-5);
        // half the spin is converted
        assert_relative_eq!(body.angular_velocity(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_off_centre_contact_induces_spin() {
        let mut body = body_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
        body.set_coefficient_restitution(1.0).unwrap();
        body.set_friction_coefficient(1.0).unwrap();
        let info = ground_contact(&body, Vec3::new(0.6, -0.8, 0.0));

        let spin = sphere_vs_plane_angular_impulse(&body, &info).unwrap();
        // j = 10 / (1 + 0.36), torque arm 0.6 about Z
        assert_relative_eq!(spin, Vec3::new(0.0, 0.0, 0.6 * 10.0 / 1.36), epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_pair_conserves_normal_momentum() {
        let shape = CollisionShape::sphere(1.0).unwrap();
        let cases = [
            (1.0, 1.0, 1.0, Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
            (2.0, 0.5, 0.6, Vec3::new(3.0, -1.0, 0.5), Vec3::new(0.0, 2.0, -1.0)),
            (10.0, 1.0, 0.1, Vec3::new(-0.5, 4.0, 2.0), Vec3::new(1.5, -3.0, 0.0)),
        ];

        for (m1, m2, e, v1, v2) in cases {
            let mut body1 = body_at(Vec3::new(0.0, 0.0, 0.0), v1);
            let mut body2 = body_at(Vec3::new(1.2, 1.1, 0.8), v2);
            body1.set_mass(m1).unwrap();
            body2.set_mass(m2).unwrap();
            body1.set_coefficient_restitution(e).unwrap();
            body2.set_coefficient_restitution(e).unwrap();

            let normal = collision_normal_sphere_vs_sphere(&body1, &shape, &body2, &shape).unwrap();
            let before = m1 * v1.dot(&normal) + m2 * v2.dot(&normal);

            let (delta1, delta2) = compute_game_model_response(&body1, &shape, &body2, &shape).unwrap();
            body1.set_change_in_velocity(delta1);
            body2.set_change_in_velocity(delta2);
            body1.commit_velocity_change();
            body2.commit_velocity_change();

            let after = m1 * body1.linear_velocity().dot(&normal) + m2 * body2.linear_velocity().dot(&normal);
            assert_abs_diff_eq!(before, after, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sphere_pair_leaves_tangential_velocity() {
        let body1 = body_at(Vec3::zeros(), Vec3::new(2.0, 0.0, 3.0));
        let body2 = body_at(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let (delta1, delta2) = sphere_vs_sphere_linear(&body1, &body2, &Vec3::x());
        assert_eq!(delta1.z, 0.0);
        assert_eq!(delta2.z, 0.0);
    }

    #[test]
    fn test_equal_masses_swap_head_on() {
        let shape = CollisionShape::sphere(1.0).unwrap();
        let mut body1 = body_at(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        let mut body2 = body_at(Vec3::new(2.0, 0.0, 0.0), Vec3::zeros());
        body1.set_coefficient_restitution(1.0).unwrap();
        body2.set_coefficient_restitution(1.0).unwrap();

        let (delta1, delta2) = compute_game_model_response(&body1, &shape, &body2, &shape).unwrap();
        assert_abs_diff_eq!(delta1.angular, Vec3::zeros(), epsilon = 1e-6);
        assert_abs_diff_eq!(delta2.angular, Vec3::zeros(), epsilon = 1e-6);

        body1.set_change_in_velocity(delta1);
        body2.set_change_in_velocity(delta2);
        body1.commit_velocity_change();
        body2.commit_velocity_change();
        assert_relative_eq!(body1.linear_velocity(), Vec3::zeros());
        assert_relative_eq!(body2.linear_velocity(), Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_glancing_pair_spins_in_opposite_directions() {
        let shape = CollisionShape::sphere(1.0).unwrap();
        let body1 = body_at(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        let body2 = body_at(Vec3::new(1.6, 1.2, 0.0), Vec3::zeros());

        let (delta1, delta2) = compute_game_model_response(&body1, &shape, &body2, &shape).unwrap();
        assert!(delta1.angular.magnitude() > 0.0);
        assert_relative_eq!(delta1.angular, -delta2.angular, epsilon = 1e-6);
    }

    #[test]
    fn test_pair_restitution_is_averaged() {
        let mut body1 = body_at(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        let mut body2 = body_at(Vec3::new(2.0, 0.0, 0.0), Vec3::zeros());
        body1.set_coefficient_restitution(1.0).unwrap();
        body2.set_coefficient_restitution(0.5).unwrap();

        // e = 0.75: v1f = (0.25 * 4) / 2, v2f = (1.75 * 4) / 2
        let (delta1, delta2) = sphere_vs_sphere_linear(&body1, &body2, &Vec3::x());
        assert_relative_eq!(body1.linear_velocity() + delta1, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(body2.linear_velocity() + delta2, Vec3::new(3.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_glancing_pair_angular_deltas() {
        let body1 = body_at(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        let body2 = body_at(Vec3::new(1.6, 1.2, 0.0), Vec3::zeros());
        let normal = Vec3::new(0.8, 0.6, 0.0);

        // surrogate contact p = normalize(v2 - v1) = -x
        // n.[((p x n) / I) x p] = 0.36 for each body, so j = 3.2 * 1.9 / 2.72
        // and dw1 = p x (j n) = (0, 0, -0.6 j)
        let (angular1, angular2) = sphere_vs_sphere_angular(&body1, 1.0, &body2, 1.0, &normal).unwrap();
        let spin = 0.6 * 3.2 * 1.9 / 2.72;
        assert_relative_eq!(angular1, Vec3::new(0.0, 0.0, -spin), epsilon = 1e-5);
        assert_relative_eq!(angular2, Vec3::new(0.0, 0.0, spin), epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_centres_fail() {
        let shape = CollisionShape::sphere(1.0).unwrap();
        let body1 = body_at(Vec3::zeros(), Vec3::x());
        let body2 = body_at(Vec3::zeros(), Vec3::zeros());
        assert!(matches!(
            compute_game_model_response(&body1, &shape, &body2, &shape),
            Err(PhysicsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_velocity_delta_sum() {
        let a = VelocityDelta::new(Vec3::x(), Vec3::y());
        let b = VelocityDelta::new(Vec3::y(), Vec3::z());
        assert_eq!(a + b, VelocityDelta::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)));
        assert!(VelocityDelta::default().is_zero());
    }
}
