//! Primitive geometry and intersection algorithms
//!
//! Rays, planes and triangles used by the swept collision tests. A `Ray` here
//! is a *movement*: an origin plus the full displacement over an interval, so
//! intersection times come back as fractions of that interval rather than
//! distances.

use crate::foundation::math::{Vec3, Vec3Ext};
use crate::physics::error::{PhysicsError, PhysicsResult};

/// A planned movement from `origin` along `vector` over one time interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space
    pub origin: Vec3,
    /// Displacement over the interval (not normalized)
    pub vector: Vec3,
}

impl Ray {
    /// Creates a new ray from an origin and a displacement
    pub fn new(origin: Vec3, vector: Vec3) -> Self {
        Self { origin, vector }
    }

    /// Point reached after `time` (a fraction of the interval)
    pub fn point_at(&self, time: f32) -> Vec3 {
        self.origin + self.vector * time
    }

    /// True when the ray does not move anywhere meaningful
    pub fn is_stationary(&self, tolerance: f32) -> bool {
        self.vector.is_close_to_zero(tolerance)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}

/// Which side of a plane a point is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPlaneClassification {
    /// On the side the normal points to
    FrontSide,
    /// On the opposite side of the normal
    BackSide,
    /// Exactly on the plane
    Coincident,
}

/// An infinite plane: unit normal plus signed distance from the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed distance from the origin along `normal`
    pub distance: f32,
}

impl Plane {
    /// Creates a plane from a normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Plane the triangle lies on
    pub fn from_triangle(triangle: &Triangle) -> PhysicsResult<Self> {
        let normal = triangle.normal()?;
        Ok(Self::new(normal, triangle.v0.dot(&normal)))
    }

    /// Signed distance from the plane to `point` along the normal
    pub fn point_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Classify `point` against the plane
    pub fn classify_point(&self, point: &Vec3) -> PointPlaneClassification {
        let distance = self.point_distance(point);
        if distance > 0.0 {
            PointPlaneClassification::FrontSide
        } else if distance < 0.0 {
            PointPlaneClassification::BackSide
        } else {
            PointPlaneClassification::Coincident
        }
    }

    /// Height of the plane directly above or below `(x, z)`
    ///
    /// Fails for vertical planes, which have no single height.
    pub fn height_at(&self, x: f32, z: f32) -> PhysicsResult<f32> {
        if self.normal.y == 0.0 {
            return Err(PhysicsError::InvalidArgument(
                "cannot take the height of a vertical plane".to_string(),
            ));
        }
        Ok((self.distance - self.normal.x * x - self.normal.z * z) / self.normal.y)
    }

    /// Fraction of `ray` at which it crosses the plane
    ///
    /// `None` when the ray is stationary or runs parallel to the plane. The
    /// returned fraction is unbounded; callers decide which range counts as a
    /// hit.
    pub fn intersection_time(&self, ray: &Ray, tolerance: f32) -> PhysicsResult<Option<f32>> {
        if self.normal.iter().all(|c| *c == 0.0) {
            return Err(PhysicsError::InvalidArgument(
                "plane normal is a zero vector".to_string(),
            ));
        }

        if ray.is_stationary(tolerance) {
            return Ok(None);
        }

        let denominator = self.normal.dot(&ray.vector);
        if denominator == 0.0 {
            return Ok(None);
        }

        Ok(Some(-(self.point_distance(&ray.origin) / denominator)))
    }

    /// World point at which `ray` crosses the plane
    ///
    /// Fails unless the crossing happens inside the ray, `[0, 1]`.
    pub fn intersection_point(&self, ray: &Ray, tolerance: f32) -> PhysicsResult<Vec3> {
        match self.intersection_time(ray, tolerance)? {
            Some(time) if (0.0..=1.0).contains(&time) => Ok(ray.point_at(time)),
            _ => Err(PhysicsError::InvalidArgument(
                "ray does not intersect the plane within its length".to_string(),
            )),
        }
    }
}

/// A triangle with counter-clockwise winding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal from the counter-clockwise winding
    pub fn normal(&self) -> PhysicsResult<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v1;
        edge1.cross(&edge2).try_normalized()
    }

    /// Plane the triangle lies on
    pub fn plane(&self) -> PhysicsResult<Plane> {
        Plane::from_triangle(self)
    }

    /// Height of the triangle's plane at `(x, z)`
    pub fn height_at(&self, x: f32, z: f32) -> PhysicsResult<f32> {
        self.plane()?.height_at(x, z)
    }

    /// Fraction of `ray` at which it crosses the triangle's plane
    pub fn intersection_time(&self, ray: &Ray, tolerance: f32) -> PhysicsResult<Option<f32>> {
        self.plane()?.intersection_time(ray, tolerance)
    }

    /// Barycentric weights of `point` relative to `(v0, v1, v2)`
    ///
    /// The triangle is projected onto the axis plane that preserves the most
    /// area (dropping the largest normal component) before solving.
    pub fn barycentric_coordinates(&self, point: &Vec3) -> PhysicsResult<Vec3> {
        let normal = self.normal()?.abs();

        // (a, b) picks the two axes kept by the projection
        let (a, b) = if normal.x >= normal.y && normal.x >= normal.z {
            (1, 2)
        } else if normal.y >= normal.z {
            (2, 0)
        } else {
            (0, 1)
        };

        let edge0 = self.v0 - self.v2;
        let edge1 = self.v1 - self.v2;
        let from_v0 = point - self.v0;
        let from_v2 = point - self.v2;

        let denominator = edge0[b] * edge1[a] - edge1[b] * edge0[a];
        if denominator == 0.0 {
            return Err(PhysicsError::InvalidArgument(
                "barycentric coordinates of a co-linear triangle".to_string(),
            ));
        }

        let u = (from_v2[b] * edge1[a] - edge1[b] * from_v2[a]) / denominator;
        let v = (from_v0[b] * edge0[a] - edge0[b] * from_v0[a]) / -denominator;

        Ok(Vec3::new(u, v, 1.0 - u - v))
    }

    /// True when `point` (assumed on the plane) lies inside or on the triangle
    pub fn contains_point(&self, point: &Vec3) -> PhysicsResult<bool> {
        let weights = self.barycentric_coordinates(point)?;
        Ok(weights.iter().all(|w| *w >= 0.0))
    }
}
