use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Monotonic timestamp, expressed as milliseconds since the clock was
/// constructed. `ZERO` means "never sampled" and always compares as older
/// than anything a real clock will report once a cooldown has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn saturating_sub(self, d: Duration) -> Timestamp {
        Timestamp(self.0.saturating_sub(d.as_millis() as u64))
    }
}

/// Supplies `now()` to the engine. Only used for timestamp comparisons, so
/// the resolution need only match `EngineConfig::cooldown`.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

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
    fn now(&self) -> Timestamp {
        Timestamp(self.start.elapsed().as_millis() as u64)
    }
}

/// Manually-advanced clock for deterministic cooldown tests.
#[derive(Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            millis: AtomicU64::new(1),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.millis.fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
pub(crate) fn test_ts(millis: u64) -> Timestamp {
    Timestamp(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_older_than_any_cutoff() {
        let now = Timestamp(5);
        let cutoff = now.saturating_sub(Duration::from_millis(10));
        assert!(Timestamp::ZERO <= cutoff);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        clock.advance(Duration::from_millis(100));
        let t1 = clock.now();
        assert!(t1 > t0);
    }
}
