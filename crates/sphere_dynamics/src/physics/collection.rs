//! Fixed-capacity collection of game models and the per-tick scheduler

use crate::debug::DebugDraw;
use crate::foundation::math::Vec3;
use super::error::{PhysicsError, PhysicsResult};
use super::game_model::GameModel;

/// Owns up to `capacity` game models and advances them together
pub struct GameModelCollection<'a> {
    models: Vec<GameModel<'a>>,
    capacity: usize,
}

impl<'a> GameModelCollection<'a> {
    /// Create an empty collection that accepts at most `capacity` models
    pub fn new(capacity: usize) -> Self {
        Self {
            models: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a model, returning its index
    pub fn add_game_model(&mut self, model: GameModel<'a>) -> PhysicsResult<usize> {
        if self.models.len() >= self.capacity {
            log::warn!("game model collection is full ({} models)", self.capacity);
            return Err(PhysicsError::PreconditionViolation(format!(
                "collection capacity of {} models reached",
                self.capacity
            )));
        }

        self.models.push(model);
        Ok(self.models.len() - 1)
    }

    /// Number of models held
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when no model has been added
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Maximum number of models
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Model at `index`
    pub fn get(&self, index: usize) -> Option<&GameModel<'a>> {
        self.models.get(index)
    }

    /// Mutable model at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut GameModel<'a>> {
        self.models.get_mut(index)
    }

    /// Models in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GameModel<'a>> {
        self.models.iter()
    }

    /// World position of the model at `index`
    pub fn model_position(&self, index: usize) -> PhysicsResult<Vec3> {
        self.models
            .get(index)
            .map(|model| model.position())
            .ok_or_else(|| {
                PhysicsError::PreconditionViolation(format!(
                    "no game model at index {index} (collection holds {})",
                    self.models.len()
                ))
            })
    }

    /// Advance every model by one tick of `dt` seconds
    ///
    /// 1. World forces and impulses update every model's velocity.
    /// 2. Pairs `(i, j)` with `i < j` are swept against each other. The first
    ///    collision found for a model resolves it for the rest of the tick.
    /// 3. Models still unresolved are swept against the terrain.
    /// 4. Anything left simply moves for the whole tick.
    pub fn run_physics(&mut self, dt: f32) -> PhysicsResult<()> {
        for model in &mut self.models {
            model.apply_forces(dt)?;
        }

        let count = self.models.len();
        let mut resolved = vec![false; count];

        for i in 0..count {
            for j in (i + 1)..count {
                if resolved[i] || resolved[j] {
                    continue;
                }

                let (head, tail) = self.models.split_at_mut(j);
                let focus = &mut head[i];
                let target = &mut tail[0];

                let time = focus.collision_detect_game_model(target, dt)?;
                if focus.is_response_required() && target.is_response_required() {
                    focus.update_position(time)?;
                    target.update_position(time)?;
                    focus.collision_response_game_model(target, dt - time)?;

                    resolved[i] = true;
                    resolved[j] = true;
                }
            }
        }

        for (model, done) in self.models.iter_mut().zip(resolved.iter_mut()) {
            if *done {
                continue;
            }

            let time = model.collision_detect_terrain(dt)?;
            if model.is_response_required() {
                model.update_position(time)?;
                model.collision_response_terrain(dt - time)?;
                *done = true;
            }
        }

        for (model, done) in self.models.iter_mut().zip(resolved) {
            if !done {
                model.update_position(dt)?;
            }
        }

        log::trace!("physics tick of {dt}s complete for {count} models");
        Ok(())
    }

    /// Emit every model's collision volume
    pub fn render_models(&self, draw: &mut dyn DebugDraw) {
        for model in &self.models {
            model.render_collision_bounds(draw);
        }
    }
}
