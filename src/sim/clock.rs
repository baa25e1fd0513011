//! Simulation clock
//!
//! Turns measured frame time into a number of simulation steps. A stopped
//! clock produces no steps and drops whatever it had accumulated, so resuming
//! never replays the time spent paused.

use crate::config::TimingConfig;

/// How many steps to run this frame, and how long each one is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub steps: u32,
    pub dt: f32,
}

impl StepPlan {
    pub const IDLE: StepPlan = StepPlan { steps: 0, dt: 0.0 };
}

#[derive(Debug, Clone)]
pub struct Clock {
    config: TimingConfig,
    running: bool,
    accumulator: f32,
    /// Simulated seconds since the last start from zero
    elapsed: f64,
}

impl Clock {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            config: config.clone(),
            running: false,
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    /// Zero elapsed time (used on restart)
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Account for one simulated step
    pub fn record(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);
    }

    /// Plan the steps for a rendered frame of `frame_dt` seconds
    pub fn advance(&mut self, frame_dt: f32) -> StepPlan {
        if !self.running {
            return StepPlan::IDLE;
        }
        let frame_dt = frame_dt.clamp(0.0, self.config.max_frame_dt);

        if !self.config.fixed_timestep {
            if frame_dt <= 0.0 {
                return StepPlan::IDLE;
            }
            return StepPlan { steps: 1, dt: frame_dt };
        }

        let step = self.config.step;
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= step && steps < self.config.max_substeps {
            self.accumulator -= step;
            steps += 1;
        }
        // Spiral-of-death guard: drop time we could not catch up on
        if steps == self.config.max_substeps {
            self.accumulator = self.accumulator.min(step);
        }
        StepPlan { steps, dt: step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(step: f32, max_substeps: u32) -> Clock {
        let mut clock = Clock::new(&TimingConfig {
            fixed_timestep: true,
            step,
            max_substeps,
            max_frame_dt: 0.25,
        });
        clock.start();
        clock
    }

    #[test]
    fn test_fixed_step_accumulates_partial_frames() {
        let mut clock = fixed(0.25, 8);
        assert_eq!(clock.advance(0.125).steps, 0);
        assert_eq!(clock.advance(0.125).steps, 1);
        let plan = clock.advance(0.25);
        assert_eq!(plan, StepPlan { steps: 1, dt: 0.25 });
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = fixed(0.015625, 4);
        let plan = clock.advance(0.25);
        assert_eq!(plan.steps, 4);
        // The backlog was dropped, not carried into the next frame
        assert!(clock.advance(0.0).steps <= 1);
    }

    #[test]
    fn test_stopped_clock_does_not_accumulate() {
        let mut clock = fixed(0.125, 8);
        clock.advance(0.0625);
        clock.stop();
        assert_eq!(clock.advance(0.25), StepPlan::IDLE);
        assert_eq!(clock.advance(0.25), StepPlan::IDLE);
        clock.start();
        // Only the new frame counts after resuming
        assert_eq!(clock.advance(0.0625).steps, 0);
        assert_eq!(clock.advance(0.0625).steps, 1);
    }

    #[test]
    fn test_measured_mode_clamps_long_frames() {
        let mut clock = Clock::new(&TimingConfig {
            fixed_timestep: false,
            step: 0.01,
            max_substeps: 8,
            max_frame_dt: 0.1,
        });
        clock.start();
        assert_eq!(clock.advance(2.0), StepPlan { steps: 1, dt: 0.1 });
        assert_eq!(clock.advance(0.0), StepPlan::IDLE);
    }

    #[test]
    fn test_record_tracks_elapsed() {
        let mut clock = fixed(0.5, 8);
        clock.record(0.5);
        clock.record(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 1e-9);
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
    }
}
