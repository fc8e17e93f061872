//! # Unified Configuration System
//!
//! All tuning values of the physics core live here instead of being scattered
//! through the solver as literals. Every structure has a `Default` carrying the
//! tuned values the simulation was balanced with, and can be loaded from TOML
//! or RON through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: tolerances, clamps and response tuning
//! - **Environment Config**: gravity, fluid and gas properties
//! - **Simulation Config**: top-level settings for a run (logging, scene size)

use serde::{Serialize, Deserialize};

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Physics Configuration
///
/// Numeric tuning for integration, detection and response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Half-width of the band around zero treated as zero
    pub tolerance: f32,
    /// Limit for any single angular velocity component (radians/s)
    pub velocity_limit: f32,
    /// Multiplier applied to friction when turning a terrain impulse into spin
    pub grip_multiplier: f32,
    /// Per-tick velocity scale applied while a body rolls on the terrain
    pub rolling_damping: f32,
    /// Speed into the terrain below which a body becomes grounded
    pub grounded_speed_threshold: f32,
    /// Multiplier applied to friction when spin is bled off by a bounce
    pub spin_damping_scale: f32,
    /// Divisor applied to friction coefficients before storage
    pub friction_divisor: f32,
    /// Drag coefficient reported by spheres
    pub sphere_drag_coefficient: f32,
}

impl PhysicsConfig {
    /// Set the tolerance band
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the angular velocity clamp
    pub fn with_velocity_limit(mut self, limit: f32) -> Self {
        self.velocity_limit = limit;
        self
    }

    /// Set the rolling damping factor
    pub fn with_rolling_damping(mut self, damping: f32) -> Self {
        self.rolling_damping = damping;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if self.velocity_limit <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "velocity_limit must be positive, got {}",
                self.velocity_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.rolling_damping) {
            return Err(ConfigError::Invalid(format!(
                "rolling_damping must be in [0, 1], got {}",
                self.rolling_damping
            )));
        }
        if self.friction_divisor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "friction_divisor must be positive, got {}",
                self.friction_divisor
            )));
        }
        if self.grounded_speed_threshold < 0.0 || self.sphere_drag_coefficient < 0.0 {
            return Err(ConfigError::Invalid(
                "grounded_speed_threshold and sphere_drag_coefficient cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.00005,
            velocity_limit: 5.0,
            grip_multiplier: 10.0,
            rolling_damping: 0.9,
            grounded_speed_threshold: 1.0,
            spin_damping_scale: 5.0,
            friction_divisor: 10.0,
            sphere_drag_coefficient: 0.4,
        }
    }
}

/// # Environment Configuration
///
/// Properties of the world the bodies move through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Height of the fluid surface
    pub fluid_surface_height: f32,
    /// Density of the fluid below the surface
    pub fluid_density: f32,
    /// Density of the gas above the surface
    pub gas_density: f32,
    /// Gravitational acceleration along Y (negative is down)
    pub gravity: f32,
}

impl EnvironmentConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fluid_density < 0.0 || self.gas_density < 0.0 {
            return Err(ConfigError::Invalid(
                "densities cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            fluid_surface_height: 25.0,
            fluid_density: 1.0,
            gas_density: 0.0,
            gravity: -30.0,
        }
    }
}

/// # Simulation Configuration
///
/// Top-level configuration that encompasses the physics core and the scene it
/// runs. This is the structure applications load from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Fixed physics tick length in seconds
    pub tick_seconds: f32,
    /// Maximum number of models the scene may hold
    pub max_models: usize,
    /// Physics tuning
    pub physics: PhysicsConfig,
    /// World environment
    pub environment: EnvironmentConfig,
}

impl SimulationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_seconds <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tick_seconds must be positive, got {}",
                self.tick_seconds
            )));
        }
        if self.max_models == 0 {
            return Err(ConfigError::Invalid("max_models must be at least 1".to_string()));
        }
        self.physics.validate()?;
        self.environment.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_seconds: 1.0 / 60.0,
            max_models: 16,
            physics: PhysicsConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl Config for SimulationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let text = r#"
            max_models = 4

            [physics]
            velocity_limit = 8.0
        "#;
        let config: SimulationConfig = toml::from_str(text).unwrap();
        assert_eq!(config.max_models, 4);
        assert_eq!(config.physics.velocity_limit, 8.0);
        assert_eq!(config.physics.rolling_damping, 0.9);
        assert_eq!(config.environment, EnvironmentConfig::default());
    }

    #[test]
    fn test_ron_config_parses() {
        let text = "(tick_seconds: 0.02, environment: (gravity: -9.8))";
        let config: SimulationConfig = ron::from_str(text).unwrap();
        assert_eq!(config.tick_seconds, 0.02);
        assert_eq!(config.environment.gravity, -9.8);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let physics = PhysicsConfig::default().with_velocity_limit(0.0);
        assert!(matches!(physics.validate(), Err(ConfigError::Invalid(_))));

        let physics = PhysicsConfig::default().with_rolling_damping(1.5);
        assert!(physics.validate().is_err());

        let config = SimulationConfig { max_models: 0, ..SimulationConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension_is_reported() {
        let result = SimulationConfig::load_from_file("scene.yaml");
        assert!(result.is_err());
    }
}
