//! Monotonic millisecond time
//!
//! Timestamps are a 32-bit counter that wraps after ~49.7 days. Never compare
//! two timestamps directly; ask how much time elapsed between them instead.

use std::cell::Cell;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// A wrapping millisecond timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed since `earlier`, correct across counter wraparound
    #[inline]
    pub fn elapsed_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Timestamp `ms` after this one (wraps)
    #[inline]
    pub fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

/// Source of monotonic timestamps
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Process clock, truncated to a wrapping 32-bit counter
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        // Truncation is the wrap.
        Millis(self.start.elapsed().as_millis() as u32)
    }
}

/// Hand-driven clock for tests and scripted runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_plain() {
        assert_eq!(Millis(1500).elapsed_since(Millis(1000)), 500);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let before = Millis(u32::MAX - 99);
        let after = before.wrapping_add(250);
        assert_eq!(after, Millis(150));
        assert_eq!(after.elapsed_since(before), 250);
    }

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::starting_at(u32::MAX);
        clock.advance(2);
        assert_eq!(clock.now(), Millis(1));
    }

    #[test]
    fn test_manual_clock_set_jumps_back() {
        let clock = ManualClock::default();
        assert_eq!(clock.now(), Millis::ZERO);
        clock.set(u32::MAX - 5);
        let before = clock.now();
        clock.set(10);
        assert_eq!(clock.now().elapsed_since(before), 16);
        assert_eq!(clock.now().elapsed_since(Millis::ZERO), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b.elapsed_since(a) < 1_000);
    }
}
