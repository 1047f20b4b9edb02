//! Audio cues
//!
//! The kernel only names cues; what a cue sounds like is up to the sink. On
//! the web, `WebAudioCues` synthesizes a short tone per cue with the Web
//! Audio API, so no sound files are needed.

use crate::platform::CueSink;
use crate::sim::{GameEvent, GamePhase};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Obstacle destroyed
    BrickBreak,
    /// Pickup collected
    PickupCollect,
    /// Ball fell out or a life was lost
    LifeLost,
    /// Pong point
    Score,
    /// Bird flap
    Flap,
    /// Pipe passed
    Point,
    /// Level cleared
    Win,
    GameOver,
    /// New best score
    HighScore,
}

impl AudioCue {
    /// Stable name, as passed to an external `play(eventName)`
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::PaddleHit => "paddle_hit",
            AudioCue::WallHit => "wall_hit",
            AudioCue::BrickBreak => "brick_break",
            AudioCue::PickupCollect => "pickup",
            AudioCue::LifeLost => "life_lost",
            AudioCue::Score => "score",
            AudioCue::Flap => "flap",
            AudioCue::Point => "point",
            AudioCue::Win => "win",
            AudioCue::GameOver => "game_over",
            AudioCue::HighScore => "high_score",
        }
    }

    /// The cue for a simulation event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallBounce => Some(AudioCue::WallHit),
            GameEvent::PaddleHit => Some(AudioCue::PaddleHit),
            GameEvent::ObstacleDestroyed { .. } => Some(AudioCue::BrickBreak),
            GameEvent::PowerUpCollected { .. } => Some(AudioCue::PickupCollect),
            GameEvent::LifeLost { .. } => Some(AudioCue::LifeLost),
            GameEvent::PointScored { .. } => Some(AudioCue::Score),
            GameEvent::Flap => Some(AudioCue::Flap),
            GameEvent::PipePassed => Some(AudioCue::Point),
            GameEvent::NewBest { .. } => Some(AudioCue::HighScore),
            GameEvent::PhaseChanged { to: GamePhase::Win, .. } => Some(AudioCue::Win),
            GameEvent::PhaseChanged {
                to: GamePhase::GameOver,
                ..
            } => Some(AudioCue::GameOver),
            _ => None,
        }
    }

    /// Start frequency (Hz), duration (s) and relative gain of the cue's tone
    pub fn tone(self) -> (f32, f64, f32) {
        match self {
            AudioCue::PaddleHit => (150.0, 0.15, 0.6),
            AudioCue::WallHit => (400.0, 0.1, 0.3),
            AudioCue::BrickBreak => (800.0, 0.12, 0.4),
            AudioCue::PickupCollect => (660.0, 0.2, 0.4),
            AudioCue::LifeLost => (110.0, 0.5, 0.6),
            AudioCue::Score => (520.0, 0.25, 0.5),
            AudioCue::Flap => (300.0, 0.08, 0.3),
            AudioCue::Point => (880.0, 0.1, 0.3),
            AudioCue::Win => (1046.0, 0.6, 0.5),
            AudioCue::GameOver => (90.0, 0.8, 0.6),
            AudioCue::HighScore => (1318.0, 0.5, 0.5),
        }
    }
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCues;

impl CueSink for NullCues {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Logs each cue at debug level (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCues;

impl CueSink for LogCues {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("cue: {}", cue.name());
    }
}

/// Remembers every cue in order
#[derive(Debug, Default, Clone)]
pub struct RecordedCues {
    pub played: Vec<AudioCue>,
}

impl RecordedCues {
    pub fn count(&self, cue: AudioCue) -> usize {
        self.played.iter().filter(|&&c| c == cue).count()
    }
}

impl CueSink for RecordedCues {
    fn play(&mut self, cue: AudioCue) {
        self.played.push(cue);
    }
}

/// Web Audio sink: one decaying oscillator per cue
#[cfg(target_arch = "wasm32")]
pub struct WebAudioCues {
    ctx: Option<web_sys::AudioContext>,
    volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudioCues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl WebAudioCues {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn play_tone(&self, ctx: &web_sys::AudioContext, cue: AudioCue) -> Option<()> {
        let (freq, duration, gain_scale) = cue.tone();
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(web_sys::OscillatorType::Sine);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = ctx.current_time();
        gain.gain()
            .set_value_at_time(self.volume * gain_scale, t)
            .ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok()?;
        osc.start().ok()?;
        osc.stop_with_when(t + duration + 0.05).ok()?;
        Some(())
    }
}

#[cfg(target_arch = "wasm32")]
impl CueSink for WebAudioCues {
    fn play(&mut self, cue: AudioCue) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let _ = self.play_tone(ctx, cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_events_map_to_cues() {
        assert_eq!(
            AudioCue::from_event(&GameEvent::ObstacleDestroyed { id: 3, points: 10 }),
            Some(AudioCue::BrickBreak)
        );
        assert_eq!(
            AudioCue::from_event(&GameEvent::PowerUpCollected {
                kind: PowerUpKind::MultiBall
            }),
            Some(AudioCue::PickupCollect)
        );
        assert_eq!(
            AudioCue::from_event(&GameEvent::PhaseChanged {
                from: GamePhase::Playing,
                to: GamePhase::Win
            }),
            Some(AudioCue::Win)
        );
        assert_eq!(
            AudioCue::from_event(&GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Playing
            }),
            None
        );
        assert_eq!(AudioCue::from_event(&GameEvent::PowerUpExpired), None);
    }

    #[test]
    fn test_recorded_cues_count() {
        let mut sink = RecordedCues::default();
        sink.play(AudioCue::WallHit);
        sink.play(AudioCue::WallHit);
        sink.play(AudioCue::Flap);
        assert_eq!(sink.count(AudioCue::WallHit), 2);
        let names: Vec<_> = sink.played.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["wall_hit", "wall_hit", "flap"]);
    }
}
