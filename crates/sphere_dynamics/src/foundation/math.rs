//! Math utilities and types
//!
//! Provides the vector and orientation types used by every physics component,
//! plus a handful of helpers the rigid body code leans on (near-zero snapping,
//! checked normalization, reflection and per-axis XYZ rotation).

pub use nalgebra::{Matrix3, Quaternion, Unit, Vector3};

use crate::physics::PhysicsError;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Extension trait for `Vec3` with the tolerance-banded helpers used by the
/// integrator and the collision code
pub trait Vec3Ext {
    /// True when every component lies strictly inside `(-tolerance, tolerance)`
    fn is_close_to_zero(&self, tolerance: f32) -> bool;

    /// Snap components inside `(-tolerance, tolerance)` to exactly zero
    fn simplify(&mut self, tolerance: f32);

    /// Normalize, failing on a zero-length vector
    fn try_normalized(&self) -> Result<Vec3, PhysicsError>;

    /// Component-wise division, failing when any divisor component is zero
    fn checked_component_div(&self, divisor: &Vec3) -> Result<Vec3, PhysicsError>;

    /// Clamp every component to `[-limit, limit]`
    fn clamp_components(&mut self, limit: f32);
}

impl Vec3Ext for Vec3 {
    fn is_close_to_zero(&self, tolerance: f32) -> bool {
        self.iter().all(|c| *c < tolerance && *c > -tolerance)
    }

    fn simplify(&mut self, tolerance: f32) {
        for c in self.iter_mut() {
            if *c < tolerance && *c > -tolerance {
                *c = 0.0;
            }
        }
    }

    fn try_normalized(&self) -> Result<Vec3, PhysicsError> {
        let magnitude_squared = self.magnitude_squared();
        if magnitude_squared == 0.0 {
            return Err(PhysicsError::InvalidArgument(
                "cannot normalize a zero-length vector".to_string(),
            ));
        }
        Ok(self / magnitude_squared.sqrt())
    }

    fn checked_component_div(&self, divisor: &Vec3) -> Result<Vec3, PhysicsError> {
        if divisor.iter().any(|c| *c == 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "component-wise division by a vector with a zero component: {divisor:?}"
            )));
        }
        Ok(self.component_div(divisor))
    }

    fn clamp_components(&mut self, limit: f32) {
        for c in self.iter_mut() {
            *c = c.clamp(-limit, limit);
        }
    }
}

/// Reflect a normalized incident vector about a normalized surface normal
///
/// The incident vector points *away* from the surface, so the result is the
/// mirror image on the other side of the normal: `2(n·i)n - i`.
pub fn reflect(incident: &Vec3, normal: &Vec3) -> Vec3 {
    normal * (2.0 * normal.dot(incident)) - incident
}

/// Rotate an orientation by per-axis angles about its local X, Y then Z axes
///
/// Three half-angle quaternions are composed onto the current orientation
/// (`q * qx * qy * qz`) and the result is renormalized. A zero displacement
/// leaves the orientation untouched.
pub fn rotate_about_xyz(orientation: &Quat, radians: &Vec3) -> Quat {
    if radians.iter().all(|r| *r == 0.0) {
        return *orientation;
    }

    let half = radians * 0.5;
    let qx = Quaternion::new(half.x.cos(), half.x.sin(), 0.0, 0.0);
    let qy = Quaternion::new(half.y.cos(), 0.0, half.y.sin(), 0.0);
    let qz = Quaternion::new(half.z.cos(), 0.0, 0.0, half.z.sin());

    Quat::new_normalize(orientation.into_inner() * qx * qy * qz)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// 4/3, used by the sphere volume formula
    pub const FOUR_OVER_THREE: f32 = 4.0 / 3.0;

    /// 1/3, used by the spherical cap volume formula
    pub const ONE_OVER_THREE: f32 = 1.0 / 3.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f32 = 0.00005;

    #[test]
    fn test_simplify_snaps_tiny_components() {
        let mut v = Vec3::new(0.00001, -0.00004, 0.5);
        v.simplify(TOL);
        assert_eq!(v, Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_close_to_zero_is_tolerance_banded() {
        assert!(Vec3::new(0.00001, -0.00001, 0.0).is_close_to_zero(TOL));
        assert!(!Vec3::new(0.00005, 0.0, 0.0).is_close_to_zero(TOL));
        assert!(!Vec3::new(0.0, 0.0, -1.0).is_close_to_zero(TOL));
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        assert!(matches!(
            Vec3::zeros().try_normalized(),
            Err(PhysicsError::InvalidArgument(_))
        ));
        let n = Vec3::new(3.0, 0.0, 4.0).try_normalized().unwrap();
        assert_relative_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn test_component_div_rejects_zero_axis() {
        let v = Vec3::new(2.0, 4.0, 6.0);
        assert!(v.checked_component_div(&Vec3::new(1.0, 0.0, 1.0)).is_err());
        let r = v.checked_component_div(&Vec3::new(2.0, 2.0, 3.0)).unwrap();
        assert_relative_eq!(r, Vec3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let incident = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let reflected = reflect(&incident, &Vec3::y());
        assert_relative_eq!(reflected, Vec3::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_about_xyz_stays_unit_length() {
        let mut q = Quat::identity();
        for _ in 0..100 {
            q = rotate_about_xyz(&q, &Vec3::new(0.3, -0.7, 1.1));
        }
        assert_relative_eq!(q.into_inner().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_about_single_axis_matches_axis_angle() {
        let q = rotate_about_xyz(&Quat::identity(), &Vec3::new(0.0, constants::PI * 0.5, 0.0));
        let rotated = q * Vec3::x();
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_rotation_is_identity_operation() {
        let q = rotate_about_xyz(&Quat::identity(), &Vec3::new(0.4, 0.2, 0.1));
        assert_eq!(rotate_about_xyz(&q, &Vec3::zeros()), q);
    }
}
