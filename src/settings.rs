//! Runtime configuration and per-game tuning
//!
//! Every field has a default, so a partial JSON document only overrides what
//! it names. Persisted in LocalStorage on the web; read from a file natively.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};

/// How the frame scheduler turns elapsed time into simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// At most one step per frame; lag beyond one interval is dropped
    #[default]
    SingleStep,
    /// Accumulate and run up to `max_steps` per frame, dropping the excess
    CatchUp { max_steps: u32 },
}

impl StepPolicy {
    /// Accumulating policy with the default step cap
    pub fn catch_up() -> Self {
        Self::CatchUp {
            max_steps: crate::consts::MAX_CATCH_UP_STEPS,
        }
    }
}

/// Breakout constants, px and px/s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Top edge of the paddle
    pub paddle_y: f32,
    pub paddle_speed: f32,
    pub wide_paddle_width: f32,
    pub wide_paddle_secs: f64,
    pub ball_radius: f32,
    pub ball_speed: f32,
    /// Largest paddle rebound angle from vertical
    pub max_bounce_deg: f32,
    pub lives: u8,
    pub points_per_obstacle: u64,
    /// Chance that a destroyed obstacle drops a pickup
    pub power_up_chance: f64,
    pub power_up_size: Vec2,
    pub power_up_fall_speed: f32,
    /// Velocity multiplier applied once by the slow-ball pickup
    pub slow_factor: f32,
    pub particles_per_hit: u32,
    pub particle_speed: f32,
    pub particle_gravity: f32,
    pub particle_life: f32,
}

impl Default for BreakoutTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: 120.0,
            paddle_height: 16.0,
            paddle_y: 550.0,
            paddle_speed: 480.0,
            wide_paddle_width: 180.0,
            wide_paddle_secs: 10.0,
            ball_radius: 8.0,
            ball_speed: 300.0,
            max_bounce_deg: 75.0,
            lives: 3,
            points_per_obstacle: 10,
            power_up_chance: 0.3,
            power_up_size: Vec2::new(30.0, 20.0),
            power_up_fall_speed: 120.0,
            slow_factor: 0.6,
            particles_per_hit: 8,
            particle_speed: 180.0,
            particle_gravity: 720.0,
            particle_life: 0.5,
        }
    }
}

/// Pong constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    /// AI paddle speed as a fraction of `paddle_speed`
    pub ai_speed_factor: f32,
    /// AI ignores offsets smaller than this
    pub ai_dead_zone: f32,
    /// Horizontal speed multiplier on every paddle hit
    pub speed_up: f32,
    /// Random vertical jitter added on paddle hits (±)
    pub spin_jitter: f32,
    pub winning_score: u32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            paddle_width: 15.0,
            paddle_height: 100.0,
            paddle_speed: 420.0,
            ball_radius: 6.0,
            ball_speed: 360.0,
            ai_speed_factor: 0.8,
            ai_dead_zone: 10.0,
            speed_up: 1.05,
            spin_jitter: 30.0,
            winning_score: 7,
        }
    }
}

/// Flappy constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub width: f32,
    pub height: f32,
    pub bird_x: f32,
    pub bird_size: f32,
    /// px/s²
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative is up)
    pub flap_velocity: f32,
    pub pipe_width: f32,
    pub pipe_speed: f32,
    pub pipe_gap: f32,
    /// Seconds between pipe spawns
    pub pipe_interval: f32,
    pub floor_height: f32,
    /// Minimum distance from the gap to the ceiling and the floor
    pub gap_margin: f32,
    /// Pipes are dropped once this far past the left edge
    pub cull_margin: f32,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 720.0,
            bird_x: 120.0,
            bird_size: 26.0,
            gravity: 1300.0,
            flap_velocity: -380.0,
            pipe_width: 70.0,
            pipe_speed: 180.0,
            pipe_gap: 180.0,
            pipe_interval: 1.3,
            floor_height: 90.0,
            gap_margin: 80.0,
            cull_margin: 100.0,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation steps per second
    pub tick_rate_hz: f64,
    pub step_policy: StepPolicy,
    /// Base RNG seed; each new session offsets it
    pub seed: u64,
    pub breakout: BreakoutTuning,
    pub pong: PongTuning,
    pub flappy: FlappyTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: crate::consts::TICK_RATE_HZ,
            step_policy: StepPolicy::SingleStep,
            seed: crate::consts::DEFAULT_SEED,
            breakout: BreakoutTuning::default(),
            pong: PongTuning::default(),
            flappy: FlappyTuning::default(),
        }
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ArcadeError::invalid(field, format!("must be zero or more, got {value}")))
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ArcadeError::invalid(field, format!("must be positive, got {value}")))
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arcade_sim_settings";

    /// Environment variable naming a settings file (native only)
    pub const PATH_ENV: &'static str = "ARCADE_SIM_SETTINGS";

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        require_positive("tick_rate_hz", self.tick_rate_hz)?;
        if let StepPolicy::CatchUp { max_steps: 0 } = self.step_policy {
            return Err(ArcadeError::invalid("step_policy.max_steps", "must be at least 1"));
        }

        let b = &self.breakout;
        require_positive("breakout.width", b.width.into())?;
        require_positive("breakout.height", b.height.into())?;
        require_positive("breakout.paddle_width", b.paddle_width.into())?;
        require_positive("breakout.ball_radius", b.ball_radius.into())?;
        require_positive("breakout.ball_speed", b.ball_speed.into())?;
        require_positive("breakout.wide_paddle_secs", b.wide_paddle_secs)?;
        if !(0.0..=1.0).contains(&b.power_up_chance) {
            return Err(ArcadeError::invalid(
                "breakout.power_up_chance",
                format!("must be within [0, 1], got {}", b.power_up_chance),
            ));
        }
        if b.lives == 0 {
            return Err(ArcadeError::invalid("breakout.lives", "must be at least 1"));
        }

        let p = &self.pong;
        require_positive("pong.width", p.width.into())?;
        require_positive("pong.height", p.height.into())?;
        require_positive("pong.paddle_height", p.paddle_height.into())?;
        require_positive("pong.ball_speed", p.ball_speed.into())?;
        require_non_negative("pong.spin_jitter", p.spin_jitter.into())?;
        if p.winning_score == 0 {
            return Err(ArcadeError::invalid("pong.winning_score", "must be at least 1"));
        }

        let f = &self.flappy;
        require_positive("flappy.width", f.width.into())?;
        require_positive("flappy.height", f.height.into())?;
        require_positive("flappy.pipe_interval", f.pipe_interval.into())?;
        if f.height - f.floor_height - 2.0 * f.gap_margin < f.pipe_gap {
            return Err(ArcadeError::invalid(
                "flappy.pipe_gap",
                "gap does not fit between the margins",
            ));
        }
        Ok(())
    }

    /// Seconds per simulation step
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Load from the file named by `ARCADE_SIM_SETTINGS`, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            return Self::default();
        };
        match Self::load_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {path}: {e}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
