//! Bouncing spheres demo
//!
//! Drops a handful of spheres onto a rolling height field that is partly
//! flooded, runs the simulation headless for a fixed number of frames and logs
//! where everything ends up.
//!
//! Usage: `bounce_demo [config.toml|config.ron]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sphere_dynamics::core::ConfigError;
use sphere_dynamics::foundation::logging;
use sphere_dynamics::prelude::*;

// Scene configuration
const TERRAIN_POSTS: usize = 65;
const TERRAIN_STEP: f32 = 1.0;
const HILL_HEIGHT: f32 = 6.0;
const DROP_HEIGHT: f32 = 40.0;
const SCENE_SEED: u64 = 0x5eed;
const FRAME_SECONDS: f32 = 1.0 / 30.0;
const FRAME_COUNT: u32 = 600;
const LOG_EVERY_FRAMES: u32 = 60;

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

fn load_config() -> Result<SimulationConfig, AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_from_file(&path)?,
        None => SimulationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn build_terrain(rng: &mut StdRng) -> PhysicsResult<HeightField> {
    let phase_x = rng.gen_range(0.0..std::f32::consts::TAU);
    let phase_z = rng.gen_range(0.0..std::f32::consts::TAU);

    HeightField::from_fn(TERRAIN_POSTS, TERRAIN_STEP, |x, z| {
        HILL_HEIGHT * ((x * 0.15 + phase_x).sin() + (z * 0.1 + phase_z).cos())
    })
}

fn spawn_spheres<'a>(
    models: &mut GameModelCollection<'a>,
    terrain: &'a HeightField,
    environment: &'a FluidEnvironment,
    config: &SimulationConfig,
    rng: &mut StdRng,
) -> PhysicsResult<()> {
    let margin = 4.0;
    let extent = terrain.size() - margin;

    for _ in 0..config.max_models {
        let radius = rng.gen_range(0.5..1.5);
        let position = Vec3::new(
            rng.gen_range(margin..extent),
            DROP_HEIGHT + rng.gen_range(0.0..10.0),
            rng.gen_range(margin..extent),
        );
        let velocity = Vec3::new(rng.gen_range(-3.0..3.0), 0.0, rng.gen_range(-3.0..3.0));
        let spin = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));

        let model = GameModel::new(CollisionShape::sphere(radius)?, terrain, environment, config.physics)?
            .with_mass(radius * 8.0)?
            .with_restitution(rng.gen_range(0.5..0.9))?
            .with_friction(rng.gen_range(0.2..1.0))?
            .with_position(position)
            .with_velocity(velocity)
            .with_angular_velocity(spin);

        models.add_game_model(model)?;
    }

    log::info!("Spawned {} spheres", models.len());
    Ok(())
}

fn log_positions(models: &GameModelCollection<'_>, frame: u32) -> PhysicsResult<()> {
    for index in 0..models.len() {
        let position = models.model_position(index)?;
        log::info!(
            "frame {frame:4} sphere {index:2}: ({:7.2}, {:7.2}, {:7.2})",
            position.x,
            position.y,
            position.z
        );
    }
    Ok(())
}

fn run(config: &SimulationConfig) -> Result<(), AppError> {
    let mut rng = StdRng::seed_from_u64(SCENE_SEED);

    let terrain = build_terrain(&mut rng)?.with_fluid_floor(config.environment.fluid_surface_height);
    let environment = FluidEnvironment::new(&config.environment, &config.physics);

    let mut models = GameModelCollection::new(config.max_models);
    spawn_spheres(&mut models, &terrain, &environment, config, &mut rng)?;

    let mut timestep = FixedTimestep::new(config.tick_seconds, 8);
    let mut debug_draw = DebugDrawSystem::new().with_shape_duration(FRAME_SECONDS);
    let mut stopwatch = Stopwatch::new();

    for frame in 0..FRAME_COUNT {
        let due = timestep.advance(FRAME_SECONDS);

        stopwatch.start();
        for _ in 0..due {
            models.run_physics(timestep.tick())?;
        }
        stopwatch.stop();

        debug_draw.update(FRAME_SECONDS);
        models.render_models(&mut debug_draw);

        if frame % LOG_EVERY_FRAMES == 0 {
            log_positions(&models, frame)?;
        }
    }

    let grounded = models.iter().filter(|model| model.is_grounded()).count();
    log::info!(
        "Simulated {} ticks in {:.2} ms, {grounded}/{} spheres grounded, {} debug shapes live",
        timestep.total_ticks(),
        stopwatch.elapsed_millis(),
        models.len(),
        debug_draw.shape_count()
    );
    log_positions(&models, FRAME_COUNT)?;
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init_with_level("info");
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    logging::init_with_level(&config.log_level);
    log::info!("Starting bounce demo with a {:.4}s tick", config.tick_seconds);

    if let Err(e) = run(&config) {
        log::error!("Simulation stopped: {e}");
        std::process::exit(1);
    }
}
