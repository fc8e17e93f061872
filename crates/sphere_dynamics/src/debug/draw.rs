//! Debug drawing primitives and system
//!
//! The physics core never renders anything itself. Shapes describe their
//! collision volumes to a [`DebugDraw`] sink, which may be a no-op, a recorder
//! that keeps shapes around for a while, or an adapter onto a real renderer.

use crate::foundation::math::Vec3;

/// Sink for debug geometry emitted by the physics core
pub trait DebugDraw {
    /// Draw a sphere at a world-space center
    fn draw_sphere(&mut self, center: Vec3, radius: f32);
}

/// Debug sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDebugDraw;

impl DebugDraw for NullDebugDraw {
    fn draw_sphere(&mut self, _center: Vec3, _radius: f32) {}
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Sphere at center with radius
    Sphere {
        /// World-space center
        center: Vec3,
        /// Radius
        radius: f32,
        /// Seconds left before the shape expires
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            Self::Sphere { duration, .. } => *duration,
        }
    }

    /// Decrease duration by `delta_time`, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            Self::Sphere { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Debug drawing system that keeps shapes alive for a fixed duration
///
/// Shapes drawn through the [`DebugDraw`] trait live for `shape_duration`
/// seconds and are dropped by [`DebugDrawSystem::update`].
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,
    shape_duration: f32,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system whose shapes last one frame
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            shape_duration: 0.0,
            enabled: true,
        }
    }

    /// Keep drawn shapes alive for `seconds`
    pub fn with_shape_duration(mut self, seconds: f32) -> Self {
        self.shape_duration = seconds;
        self
    }

    /// Update shape lifetimes and remove expired shapes
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// All live shapes
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Clear all shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugDraw for DebugDrawSystem {
    fn draw_sphere(&mut self, center: Vec3, radius: f32) {
        if !self.enabled {
            return;
        }
        log::trace!("debug sphere at {center:?} r={radius}");
        self.shapes.push(DebugShape::Sphere {
            center,
            radius,
            duration: self.shape_duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_expiration() {
        let mut system = DebugDrawSystem::new().with_shape_duration(1.0);
        system.draw_sphere(Vec3::zeros(), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_records_nothing() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;
        system.draw_sphere(Vec3::zeros(), 1.0);
        assert_eq!(system.shape_count(), 0);
    }
}
