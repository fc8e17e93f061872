//! Debug module for visualization and debugging tools
//!
//! Collision volumes are reported through the [`DebugDraw`] trait so that the
//! simulation stays independent of any renderer.

pub mod draw;

pub use draw::{DebugDraw, DebugDrawSystem, DebugShape, NullDebugDraw};
