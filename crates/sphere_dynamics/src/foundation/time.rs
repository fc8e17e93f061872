//! Time management utilities
//!
//! The physics step is frame-synchronous: one `run_physics` call consumes one
//! tick. `FixedTimestep` turns variable frame times into a stream of equal
//! ticks, and `Stopwatch` measures how long those ticks take to simulate.

use std::time::{Duration, Instant};

/// Accumulator that slices elapsed frame time into fixed physics ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: f32,
    max_ticks_per_frame: u32,
    accumulated: f32,
    total_ticks: u64,
}

impl FixedTimestep {
    /// Create a new accumulator producing ticks of `tick` seconds
    ///
    /// `max_ticks_per_frame` bounds the catch-up work after a long stall; any
    /// time beyond it is dropped.
    pub fn new(tick: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            tick,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulated: 0.0,
            total_ticks: 0,
        }
    }

    /// Length of one tick in seconds
    pub fn tick(&self) -> f32 {
        self.tick
    }

    /// Add a frame's elapsed time and return how many ticks are now due
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulated += frame_time.max(0.0);

        let mut due = 0;
        while self.accumulated >= self.tick && due < self.max_ticks_per_frame {
            self.accumulated -= self.tick;
            due += 1;
        }

        if due == self.max_ticks_per_frame && self.accumulated >= self.tick {
            log::warn!(
                "Dropping {:.3}s of simulation time after a long frame",
                self.accumulated
            );
            self.accumulated = 0.0;
        }

        self.total_ticks += u64::from(due);
        due
    }

    /// Fraction of a tick left over in the accumulator (for interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulated / self.tick
    }

    /// Total ticks handed out since creation
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
