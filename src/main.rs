//! Arcade Sim entry point
//!
//! Native: runs each game headless in idle mode for a stretch of simulated
//! time and logs how it went. Pass the number of seconds as the first
//! argument (default 60). Set `ARCADE_SIM_SCORES` to keep best scores in a
//! JSON file between runs.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result};

    use arcade_sim::audio::LogCues;
    use arcade_sim::platform::{JsonFileStore, MemoryStore, NullRenderer, ScoreStore, ScriptedInput};
    use arcade_sim::sim::{Simulation, TickInput};
    use arcade_sim::{Breakout, Flappy, FrameScheduler, Pong, PongMode, Settings};

    const SCORES_ENV: &str = "ARCADE_SIM_SCORES";
    /// Display refresh the synthetic clock imitates
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Step `game` through `secs` of synthetic frames with the autopilot on.
    /// Returns the number of simulation steps run.
    fn drive<G: Simulation>(settings: &Settings, game: &mut G, secs: f64) -> u64 {
        let mut scheduler = FrameScheduler::from_settings(settings);
        let idle = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };
        let mut input = ScriptedInput::default().with_fallback(idle);
        let mut renderer = NullRenderer;

        let frames = (secs * 1000.0 / FRAME_MS).ceil() as u64;
        let mut steps = 0;
        for frame in 0..=frames {
            let now = frame as f64 * FRAME_MS;
            steps += u64::from(scheduler.frame(now, game, &mut input, &mut renderer));
        }
        steps
    }

    pub fn run() -> Result<()> {
        let secs = match std::env::args().nth(1) {
            Some(arg) => arg
                .parse::<f64>()
                .with_context(|| format!("invalid duration {arg:?}"))?,
            None => 60.0,
        };
        anyhow::ensure!(secs.is_finite() && secs > 0.0, "duration must be positive");

        let settings = Settings::load();
        settings.validate().context("invalid settings")?;

        let mut store: Box<dyn ScoreStore> = match std::env::var(SCORES_ENV) {
            Ok(path) => Box::new(
                JsonFileStore::open(&path).with_context(|| format!("opening score file {path}"))?,
            ),
            Err(_) => Box::new(MemoryStore::new()),
        };

        log::info!(
            "Running {secs} s per game at {} Hz ({:?})",
            settings.tick_rate_hz,
            settings.step_policy
        );

        let mut breakout = Breakout::new(&settings, &mut *store, LogCues);
        let steps = drive(&settings, &mut breakout, secs);
        let board = &breakout.session().board;
        log::info!(
            "Breakout: {steps} steps, {:?}, level {}, score {}, lives {}, best {}",
            breakout.phase(),
            board.level,
            board.score,
            board.lives,
            breakout.best_score()
        );

        let mut pong = Pong::new(&settings, PongMode::VersusAi, &mut *store, LogCues);
        let steps = drive(&settings, &mut pong, secs);
        log::info!(
            "Pong: {steps} steps, {:?}, {}-{}, best {}",
            pong.phase(),
            pong.session().left_score,
            pong.session().right_score,
            pong.best_score()
        );

        let mut flappy = Flappy::new(&settings, &mut *store, LogCues);
        let steps = drive(&settings, &mut flappy, secs);
        log::info!(
            "Flappy: {steps} steps, {:?}, score {}, best {}",
            flappy.phase(),
            flappy.session().score,
            flappy.best_score()
        );

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    let settings = arcade_sim::Settings::load();
    if let Err(e) = settings.validate() {
        log::warn!("Stored settings are invalid: {e}");
    }
    log::info!("Arcade Sim ready ({} Hz)", settings.tick_rate_hz);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Sim (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
