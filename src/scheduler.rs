//! Frame scheduler
//!
//! Render runs on every animation frame; simulation steps run at a fixed
//! rate. Two step policies:
//! - `SingleStep`: last-timestamp throttle, at most one step per frame. Under
//!   heavy lag the extra time is dropped and the game slows down.
//! - `CatchUp`: fixed-timestep accumulator that runs several steps to catch
//!   up, capped to avoid a spiral of death.

use crate::platform::{InputSource, Renderer};
use crate::settings::{Settings, StepPolicy};
use crate::sim::Simulation;

/// Drives a `Simulation` from frame timestamps
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    /// Milliseconds per step
    interval_ms: f64,
    policy: StepPolicy,
    /// Timestamp of the last step (SingleStep) or the last frame (CatchUp)
    last_ms: Option<f64>,
    accumulator_ms: f64,
}

impl FrameScheduler {
    pub fn new(tick_rate_hz: f64, policy: StepPolicy) -> Self {
        let hz = if tick_rate_hz.is_finite() && tick_rate_hz > 0.0 {
            tick_rate_hz
        } else {
            log::warn!("Invalid tick rate {tick_rate_hz}, using {}", crate::consts::TICK_RATE_HZ);
            crate::consts::TICK_RATE_HZ
        };
        Self {
            interval_ms: 1000.0 / hz,
            policy,
            last_ms: None,
            accumulator_ms: 0.0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.tick_rate_hz, settings.step_policy)
    }

    /// Seconds simulated by one step
    pub fn dt(&self) -> f32 {
        (self.interval_ms / 1000.0) as f32
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    /// Forget timing history; the next frame only sets the reference time
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator_ms = 0.0;
    }

    /// Number of simulation steps to run for a frame at `now_ms`
    pub fn steps_due(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return 0;
        };
        // A clock that runs backwards restarts the reference
        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            self.last_ms = Some(now_ms);
            return 0;
        }

        match self.policy {
            StepPolicy::SingleStep => {
                if elapsed >= self.interval_ms {
                    self.last_ms = Some(now_ms - elapsed % self.interval_ms);
                    1
                } else {
                    0
                }
            }
            StepPolicy::CatchUp { max_steps } => {
                self.last_ms = Some(now_ms);
                let cap = self.interval_ms * f64::from(max_steps.max(1));
                self.accumulator_ms = (self.accumulator_ms + elapsed).min(cap);
                let steps = (self.accumulator_ms / self.interval_ms).floor() as u32;
                self.accumulator_ms -= f64::from(steps) * self.interval_ms;
                steps
            }
        }
    }

    /// Run one animation frame: the steps that are due, then one render.
    /// Returns the number of steps run.
    pub fn frame<G, I, R>(
        &mut self,
        now_ms: f64,
        game: &mut G,
        input: &mut I,
        renderer: &mut R,
    ) -> u32
    where
        G: Simulation,
        I: InputSource + ?Sized,
        R: Renderer<G> + ?Sized,
    {
        let steps = self.steps_due(now_ms);
        let dt = self.dt();
        for _ in 0..steps {
            let tick_input = input.poll();
            game.tick(&tick_input, dt);
        }
        renderer.render(game);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ScriptedInput;
    use crate::sim::{GamePhase, TickInput};

    // 50 Hz keeps every interval an exact 20 ms
    const HZ: f64 = 50.0;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        total_dt: f32,
    }

    impl Simulation for Counter {
        fn tick(&mut self, _input: &TickInput, dt: f32) {
            self.ticks += 1;
            self.total_dt += dt;
        }

        fn phase(&self) -> GamePhase {
            GamePhase::Playing
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: u32,
    }

    impl Renderer<Counter> for CountingRenderer {
        fn render(&mut self, _game: &Counter) {
            self.frames += 1;
        }
    }

    #[test]
    fn test_first_frame_only_sets_reference() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::SingleStep);
        assert_eq!(s.steps_due(1000.0), 0);
        assert_eq!(s.steps_due(1019.0), 0);
        assert_eq!(s.steps_due(1020.0), 1);
    }

    #[test]
    fn test_single_step_carries_remainder() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::SingleStep);
        s.steps_due(0.0);
        assert_eq!(s.steps_due(25.0), 1); // last = 20
        assert_eq!(s.steps_due(39.0), 0);
        assert_eq!(s.steps_due(40.0), 1);
    }

    #[test]
    fn test_single_step_drops_time_under_lag() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::SingleStep);
        s.steps_due(0.0);
        // 10 intervals late: still one step, the rest is dropped
        assert_eq!(s.steps_due(205.0), 1);
        assert_eq!(s.steps_due(210.0), 0);
        assert_eq!(s.steps_due(220.0), 1);
    }

    #[test]
    fn test_catch_up_runs_multiple_steps() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::CatchUp { max_steps: 8 });
        s.steps_due(0.0);
        assert_eq!(s.steps_due(10.0), 0);
        assert_eq!(s.steps_due(70.0), 3);
        assert_eq!(s.steps_due(80.0), 1);
    }

    #[test]
    fn test_catch_up_caps_steps() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::CatchUp { max_steps: 8 });
        s.steps_due(0.0);
        assert_eq!(s.steps_due(1000.0), 8);
        // Excess beyond the cap was discarded
        assert_eq!(s.steps_due(1010.0), 0);
    }

    #[test]
    fn test_backwards_clock_resets_reference() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::SingleStep);
        s.steps_due(500.0);
        assert_eq!(s.steps_due(100.0), 0);
        assert_eq!(s.steps_due(120.0), 1);
    }

    #[test]
    fn test_frame_always_renders() {
        let mut s = FrameScheduler::new(HZ, StepPolicy::SingleStep);
        let mut game = Counter::default();
        let mut input = ScriptedInput::default();
        let mut renderer = CountingRenderer::default();

        for now in [0.0, 5.0, 10.0, 20.0, 30.0, 40.0] {
            s.frame(now, &mut game, &mut input, &mut renderer);
        }
        assert_eq!(renderer.frames, 6);
        assert_eq!(game.ticks, 2);
        assert!((game.total_dt - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let s = FrameScheduler::new(0.0, StepPolicy::SingleStep);
        assert!((s.dt() - 1.0 / 60.0).abs() < 1e-6);
    }
}
