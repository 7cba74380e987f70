use core::cell::Cell;
use core::time::Duration;

use crate::*;

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Real time, on native targets and in the browser alike.
#[derive(Copy, Clone, Debug)]
pub struct WallClock {
    origin: web_time::Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Turns successive clock readings into frame deltas.
#[derive(Clone, Debug)]
pub struct Ticker<C> {
    clock: C,
    last: Option<Duration>,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Seconds since the previous call, zero on the first one.
    pub fn tick(&mut self) -> Seconds {
        let now = self.clock.now();
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        dt.as_secs_f32()
    }
}
