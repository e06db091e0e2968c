//! Wall-clock scheduler
//!
//! Turns elapsed real time into a count of due ticks and clock seconds. It
//! keeps running while a game is paused; the controller ignores the calls.

use std::time::{Duration, Instant};

use crate::consts::CLOCK_PERIOD_MS;

/// Maximum ticks delivered per poll, so a stalled terminal can't trigger a burst
pub const MAX_CATCHUP: u32 = 8;

/// Work due at a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Due {
    pub ticks: u32,
    pub clocks: u32,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    tick_every: Duration,
    clock_every: Duration,
    next_tick: Instant,
    next_clock: Instant,
}

impl Scheduler {
    pub fn new(tick_ms: u64, now: Instant) -> Self {
        let tick_every = Duration::from_millis(tick_ms.max(1));
        let clock_every = Duration::from_millis(CLOCK_PERIOD_MS);
        Self {
            tick_every,
            clock_every,
            next_tick: now + tick_every,
            next_clock: now + clock_every,
        }
    }

    /// Restart both schedules from `now` (on session start)
    pub fn reset(&mut self, tick_ms: u64, now: Instant) {
        *self = Self::new(tick_ms, now);
    }

    /// Count ticks and seconds that have come due since the last poll
    pub fn poll(&mut self, now: Instant) -> Due {
        let mut due = Due::default();

        while now >= self.next_tick && due.ticks < MAX_CATCHUP {
            due.ticks += 1;
            self.next_tick += self.tick_every;
        }
        if now >= self.next_tick {
            // drop the backlog rather than replaying it
            self.next_tick = now + self.tick_every;
        }

        while now >= self.next_clock {
            due.clocks += 1;
            self.next_clock += self.clock_every;
        }
        due
    }

    /// Earliest instant at which `poll` can return work
    pub fn next_deadline(&self) -> Instant {
        self.next_tick.min(self.next_clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_early() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(100, t0);
        assert_eq!(s.poll(t0 + Duration::from_millis(99)), Due::default());
    }

    #[test]
    fn test_ticks_and_clock() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(100, t0);
        let due = s.poll(t0 + Duration::from_millis(250));
        assert_eq!(due, Due { ticks: 2, clocks: 0 });
        let due = s.poll(t0 + Duration::from_millis(1000));
        assert_eq!(due, Due { ticks: 8, clocks: 1 });
        assert_eq!(s.next_deadline(), t0 + Duration::from_millis(1100));
    }

    #[test]
    fn test_catchup_is_bounded() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(10, t0);
        let due = s.poll(t0 + Duration::from_secs(5));
        assert_eq!(due.ticks, MAX_CATCHUP);
        assert_eq!(due.clocks, 5);
        assert_eq!(s.poll(t0 + Duration::from_secs(5)), Due::default());
    }
}
