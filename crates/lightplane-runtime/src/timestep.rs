use std::time::{Duration, Instant};

/// Fixed-rate update schedule.
///
/// Wall time is converted into whole ticks of `1 / rate` seconds. When the
/// loop falls behind (a slow frame, a suspended terminal), at most
/// `max_catch_up` ticks are run on the next wake-up and the rest of the
/// backlog is dropped, so the game slows down instead of fast-forwarding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestep {
    /// Ticks per second.
    pub rate: f64,
    pub max_catch_up: u32,
}

impl Timestep {
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            max_catch_up: 5,
        }
    }

    #[must_use]
    pub fn with_max_catch_up(self, max_catch_up: u32) -> Self {
        Self {
            max_catch_up,
            ..self
        }
    }

    /// Length of one tick, rounded to whole nanoseconds.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn interval(&self) -> Duration {
        let nanos = (1e9 / self.rate).round();
        Duration::from_nanos(nanos.clamp(1.0, u64::MAX as f64) as u64)
    }
}

/// Accumulates wall time and hands out due ticks.
#[derive(Debug, Clone)]
pub(crate) struct TickClock {
    interval: Duration,
    max_catch_up: u32,
    next_tick: Instant,
}

impl TickClock {
    pub(crate) fn new(timestep: Timestep, now: Instant) -> Self {
        let interval = timestep.interval().max(Duration::from_nanos(1));
        Self {
            interval,
            max_catch_up: timestep.max_catch_up.max(1),
            next_tick: now + interval,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Number of ticks to run now.
    pub(crate) fn take_due(&mut self, now: Instant) -> u32 {
        if now < self.next_tick {
            return 0;
        }
        let behind = now.duration_since(self.next_tick).as_nanos() / self.interval.as_nanos();
        let due = u32::try_from(behind).unwrap_or(u32::MAX).saturating_add(1);
        if due > self.max_catch_up {
            // drop the backlog
            self.next_tick = now + self.interval;
            self.max_catch_up
        } else {
            self.next_tick += self.interval * due;
            due
        }
    }
}
