//! Timed power-up effects
//!
//! Expiry is an absolute timestamp on the session's simulation clock and is
//! checked once per tick. Re-activating an effect moves its single expiry
//! forward; it never stacks. Effects belong to the session, so a new game
//! starts with none pending.

use serde::{Deserialize, Serialize};

/// One effect with a single shared expiry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    /// Simulation time (seconds) at which the effect ends
    expires_at: Option<f64>,
}

impl TimedEffect {
    /// Start or refresh the effect so it ends at `now + duration`
    pub fn activate(&mut self, now: f64, duration: f64) {
        self.expires_at = Some(now + duration);
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.expires_at.is_some_and(|t| now < t)
    }

    pub fn expires_at(&self) -> Option<f64> {
        self.expires_at
    }

    /// Seconds remaining, zero when inactive
    pub fn remaining(&self, now: f64) -> f64 {
        self.expires_at.map_or(0.0, |t| (t - now).max(0.0))
    }

    /// Clear the effect if it has run out. Returns true exactly once per activation.
    pub fn expire_if_due(&mut self, now: f64) -> bool {
        match self.expires_at {
            Some(t) if now >= t => {
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.expires_at = None;
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub wide_paddle: TimedEffect,
}

impl ActiveEffects {
    pub fn clear(&mut self) {
        self.wide_paddle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_expires_once() {
        let mut e = TimedEffect::default();
        assert!(!e.is_active(0.0));
        e.activate(0.0, 10.0);
        assert!(e.is_active(9.99));
        assert!(!e.expire_if_due(9.99));
        assert!(e.expire_if_due(10.0));
        assert!(!e.expire_if_due(10.5));
        assert!(!e.is_active(10.5));
    }

    #[test]
    fn test_reactivation_resets_single_expiry() {
        let mut e = TimedEffect::default();
        e.activate(0.0, 10.0);
        e.activate(1.0, 10.0);
        // The first activation's deadline no longer applies
        assert!(!e.expire_if_due(10.0));
        assert!(e.is_active(10.5));
        assert!(e.expire_if_due(11.0));
    }

    #[test]
    fn test_remaining() {
        let mut e = TimedEffect::default();
        assert_eq!(e.remaining(5.0), 0.0);
        e.activate(5.0, 2.0);
        assert!((e.remaining(6.0) - 1.0).abs() < 1e-9);
        assert_eq!(e.remaining(8.0), 0.0);
    }
}
