#![forbid(unsafe_code)]

//! Cooperative timers advanced by explicit `tick(delta)` calls.
//!
//! Nothing here reads a clock. The host drives time forward, which keeps the
//! whole tour deterministic under test and lets a dropped timer simply stop
//! existing: there is no background task to cancel.

use web_time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// One-shot countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
    fired: bool,
}

impl Countdown {
    /// Arm a countdown for `duration`.
    pub const fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
            fired: false,
        }
    }

    /// Advance by `delta`. Returns `true` exactly once, on the tick that
    /// crosses zero.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.fired = true;
            return true;
        }
        false
    }

    /// Time left before firing.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Repeating timer.
///
/// A large `delta` spanning several periods reports every elapsed period so
/// callers can decide whether to coalesce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
}

impl Interval {
    /// Create an interval. A zero period is bumped to one millisecond so the
    /// timer cannot spin.
    pub fn new(period: Duration) -> Self {
        let period = if period.is_zero() {
            Duration::from_millis(1)
        } else {
            period
        };
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `delta`, returning how many periods elapsed (saturating at
    /// `u32::MAX`). The remainder carries into the next tick.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed < self.period {
            return 0;
        }
        let period = self.period.as_nanos();
        let elapsed = self.elapsed.as_nanos();
        let rem = elapsed % period;
        // rem < period, so whole seconds fit back into a Duration
        let secs = u64::try_from(rem / NANOS_PER_SEC).unwrap_or(u64::MAX);
        let nanos = u32::try_from(rem % NANOS_PER_SEC).unwrap_or(0);
        self.elapsed = Duration::new(secs, nanos);
        u32::try_from(elapsed / period).unwrap_or(u32::MAX)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Restart the current period from zero.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
