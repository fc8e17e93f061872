//! Low-level helpers shared by the physics core
//!
//! - [`math`]: vector aliases, tolerance-banded vector helpers and rotation
//! - [`time`]: fixed-tick accumulator and stopwatch for the simulation loop
//! - [`logging`]: `env_logger` setup

pub mod logging;
pub mod math;
pub mod time;
