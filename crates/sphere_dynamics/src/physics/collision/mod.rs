//! Collision geometry and swept detection
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, planes and triangles with intersection math
//! - [`sphere`] - Bounding sphere and the swept sphere-vs-sphere test
//! - [`shape`] - Closed set of model-space collision shapes
//!
//! All time values produced here are fractions of the tested interval; the
//! caller scales them into seconds.

pub mod primitives;
pub mod sphere;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Plane, PointPlaneClassification, Ray, Triangle};
pub use sphere::BoundingSphere;
pub use shape::CollisionShape;
