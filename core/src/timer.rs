use serde::{Deserialize, Serialize};

use crate::*;

/// Result of feeding one frame into a [`RoundTimer`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimerTick {
    /// Round is untimed
    Disabled,
    /// Seconds left
    Running(Seconds),
    /// Reached zero on this very tick
    Expired,
    /// Expired on an earlier tick
    Stopped,
}

/// Countdown that ends a round by timeout.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundTimer {
    enabled: bool,
    remaining: Seconds,
    expired: bool,
}

impl RoundTimer {
    pub fn new(enabled: bool, duration: Seconds) -> Self {
        Self {
            enabled,
            remaining: duration,
            expired: false,
        }
    }

    pub fn from_config(config: &RoundConfig) -> Self {
        Self::new(config.use_timer, config.game_duration)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining(&self) -> Seconds {
        self.remaining
    }

    pub(crate) fn set_remaining(&mut self, remaining: Seconds) {
        self.remaining = remaining;
    }

    pub fn tick(&mut self, dt: Seconds) -> TimerTick {
        if !self.enabled {
            return TimerTick::Disabled;
        }
        if self.expired {
            return TimerTick::Stopped;
        }

        self.remaining -= dt;
        if self.remaining <= 0. {
            self.remaining = 0.;
            self.expired = true;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(false, 0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_once() {
        let mut timer = RoundTimer::new(true, 1.);

        assert_eq!(timer.tick(0.25), TimerTick::Running(0.75));
        assert_eq!(timer.tick(0.5), TimerTick::Running(0.25));
        assert_eq!(timer.tick(0.5), TimerTick::Expired);
        assert_eq!(timer.remaining(), 0.);
        assert_eq!(timer.tick(0.5), TimerTick::Stopped);
        assert!(timer.is_expired());
    }

    #[test]
    fn disabled_timer_never_expires() {
        let config = RoundConfig {
            use_timer: false,
            ..Default::default()
        };
        let mut timer = RoundTimer::from_config(&config);

        for _ in 0..1000 {
            assert_eq!(timer.tick(1.), TimerTick::Disabled);
        }
        assert!(!timer.is_expired());
    }
}
