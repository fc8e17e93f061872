//! Regular-grid height field terrain

use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;
use crate::physics::error::{PhysicsError, PhysicsResult};
use super::Terrain;

/// Square height field with `posts_per_side²` height samples
///
/// Each grid cell is split into two triangles along the diagonal running from
/// `(x + step, z)` to `(x, z + step)`. World coordinates start at the origin
/// and span `[0, size)` on both X and Z.
#[derive(Debug, Clone)]
pub struct HeightField {
    posts_per_side: usize,
    step_size: f32,
    heights: Vec<f32>,
    fluid_floor: Option<f32>,
}

impl HeightField {
    /// Build a height field from row-major samples (`heights[z * posts + x]`)
    pub fn new(posts_per_side: usize, step_size: f32, heights: Vec<f32>) -> PhysicsResult<Self> {
        if posts_per_side < 2 {
            return Err(PhysicsError::InvalidArgument(format!(
                "a height field needs at least 2 posts per side, got {posts_per_side}"
            )));
        }
        if !(step_size > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "height field step size must be positive, got {step_size}"
            )));
        }
        if heights.len() != posts_per_side * posts_per_side {
            return Err(PhysicsError::InvalidArgument(format!(
                "expected {} height samples, got {}",
                posts_per_side * posts_per_side,
                heights.len()
            )));
        }

        Ok(Self {
            posts_per_side,
            step_size,
            heights,
            fluid_floor: None,
        })
    }

    /// Build a height field by sampling `height(x, z)` at every post
    pub fn from_fn<F>(posts_per_side: usize, step_size: f32, mut height: F) -> PhysicsResult<Self>
    where
        F: FnMut(f32, f32) -> f32,
    {
        let mut heights = Vec::with_capacity(posts_per_side * posts_per_side);
        for z in 0..posts_per_side {
            for x in 0..posts_per_side {
                heights.push(height(x as f32 * step_size, z as f32 * step_size));
            }
        }
        Self::new(posts_per_side, step_size, heights)
    }

    /// A level height field
    pub fn flat(posts_per_side: usize, step_size: f32, height: f32) -> PhysicsResult<Self> {
        Self::new(posts_per_side, step_size, vec![height; posts_per_side * posts_per_side])
    }

    /// Clamp fluid-floor height queries to `surface_height`
    pub fn with_fluid_floor(mut self, surface_height: f32) -> Self {
        self.fluid_floor = Some(surface_height);
        self
    }

    /// World extent along X and Z
    pub fn size(&self) -> f32 {
        (self.posts_per_side - 1) as f32 * self.step_size
    }

    fn post(&self, x: usize, z: usize) -> Vec3 {
        let height = self.heights[z * self.posts_per_side + x];
        Vec3::new(x as f32 * self.step_size, height, z as f32 * self.step_size)
    }
}

impl Terrain for HeightField {
    fn is_in_bounds(&self, x: f32, z: f32) -> bool {
        let size = self.size();
        x >= 0.0 && z >= 0.0 && x < size && z < size
    }

    fn terrain_height_at(&self, x: f32, z: f32, use_fluid_floor: bool) -> PhysicsResult<f32> {
        let height = self.locate_polygon(x, z)?.height_at(x, z)?;
        Ok(match (use_fluid_floor, self.fluid_floor) {
            (true, Some(floor)) => height.max(floor),
            _ => height,
        })
    }

    fn locate_polygon(&self, x: f32, z: f32) -> PhysicsResult<Triangle> {
        if !self.is_in_bounds(x, z) {
            return Err(PhysicsError::OutOfBounds { x, z });
        }

        let last_cell = self.posts_per_side - 2;
        let cell_x = ((x / self.step_size) as usize).min(last_cell);
        let cell_z = ((z / self.step_size) as usize).min(last_cell);

        let local_x = x - cell_x as f32 * self.step_size;
        let local_z = z - cell_z as f32 * self.step_size;

        let near = self.post(cell_x, cell_z);
        let right = self.post(cell_x + 1, cell_z);
        let forward = self.post(cell_x, cell_z + 1);

        // counter-clockwise seen from above, so normals face up
        if local_x + local_z <= self.step_size {
            Ok(Triangle::new(near, forward, right))
        } else {
            let far = self.post(cell_x + 1, cell_z + 1);
            Ok(Triangle::new(right, forward, far))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_exclude_far_edge() {
        let field = HeightField::flat(5, 2.0, 0.0).unwrap();
        assert_eq!(field.size(), 8.0);
        assert!(field.is_in_bounds(0.0, 0.0));
        assert!(field.is_in_bounds(7.99, 7.99));
        assert!(!field.is_in_bounds(8.0, 1.0));
        assert!(!field.is_in_bounds(-0.01, 1.0));
    }

    #[test]
    fn test_out_of_bounds_query_fails() {
        let field = HeightField::flat(5, 2.0, 0.0).unwrap();
        assert!(matches!(
            field.locate_polygon(9.0, 1.0),
            Err(PhysicsError::OutOfBounds { .. })
        ));
        assert!(field.terrain_height_at(1.0, -3.0, false).is_err());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(HeightField::new(1, 1.0, vec![0.0]).is_err());
        assert!(HeightField::new(2, 0.0, vec![0.0; 4]).is_err());
        assert!(HeightField::new(3, 1.0, vec![0.0; 4]).is_err());
    }

    #[test]
    fn test_polygon_normals_face_up() {
        let field = HeightField::from_fn(4, 1.0, |x, z| (x * 0.7).sin() + z * 0.2).unwrap();
        for (x, z) in [(0.2, 0.3), (0.8, 0.9), (1.5, 2.7), (2.9, 0.1)] {
            let normal = field.locate_polygon(x, z).unwrap().normal().unwrap();
            assert!(normal.y > 0.0);
        }
    }

    #[test]
    fn test_height_interpolates_slope() {
        let field = HeightField::from_fn(3, 1.0, |x, _| x).unwrap();
        assert_relative_eq!(field.terrain_height_at(0.25, 0.5, false).unwrap(), 0.25, epsilon = 1e-5);
        assert_relative_eq!(field.terrain_height_at(1.75, 1.5, false).unwrap(), 1.75, epsilon = 1e-5);
    }

    #[test]
    fn test_height_matches_posts() {
        let field = HeightField::new(2, 1.0, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(field.terrain_height_at(0.0, 0.0, false).unwrap(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(field.terrain_height_at(0.999, 0.0, false).unwrap(), 0.999, epsilon = 1e-4);
        assert_relative_eq!(field.terrain_height_at(0.0, 0.999, false).unwrap(), 1.998, epsilon = 1e-4);
    }

    #[test]
    fn test_fluid_floor_clamps_only_when_asked() {
        let field = HeightField::flat(3, 1.0, -4.0).unwrap().with_fluid_floor(2.0);
        assert_eq!(field.terrain_height_at(0.5, 0.5, false).unwrap(), -4.0);
        assert_eq!(field.terrain_height_at(0.5, 0.5, true).unwrap(), 2.0);
    }
}
