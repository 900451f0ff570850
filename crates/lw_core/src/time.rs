//! Fixed-timestep clock for the simulation tick.
//!
//! Wall-clock time is fed into an accumulator and drained in whole
//! `fixed_dt` slices; each slice is one tick. A tick always runs to
//! completion before the next one is handed out, so ticks never overlap.

use std::time::Instant;

/// Nominal tick interval, 60 Hz.
pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;

/// Longest wall-clock gap a single frame may contribute.
pub const DEFAULT_MAX_ACCUMULATOR: f64 = 0.25;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(DEFAULT_FIXED_DT)
    }

    /// Non-positive or non-finite intervals fall back to the default.
    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        let fixed_dt = if fixed_dt.is_finite() && fixed_dt > 0.0 {
            fixed_dt
        } else {
            log::warn!("Invalid fixed dt {fixed_dt}, using {DEFAULT_FIXED_DT}");
            DEFAULT_FIXED_DT
        };
        Self {
            fixed_dt,
            max_accumulator: DEFAULT_MAX_ACCUMULATOR,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
        }
    }

    /// Measure the wall-clock gap since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Feed an explicit frame delta. Headless hosts and tests drive the
    /// clock through this instead of `begin_frame`.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    /// Hands out one tick if a whole slice is available.
    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }

    /// Time left until the next tick becomes due.
    pub fn until_next_step(&self) -> f64 {
        (self.fixed_dt - self.accumulator).max(0.0)
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
