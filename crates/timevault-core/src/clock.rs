use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time, in whole seconds since the Unix epoch.
///
/// Maturity is evaluated by comparing a clock read against the stored unlock
/// time at call time; nothing in the vault schedules or sleeps. Injecting the
/// clock keeps time-gated paths testable without waiting for wall time.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A system clock set before the epoch reads as 0.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests and simulations. Clones share one instant,
/// so advancing any handle advances them all.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_handles_share_one_instant() {
        let clock = ManualClock::at(100);
        let other = clock.clone();

        other.advance(50);
        assert_eq!(clock.now(), 150);

        clock.set(10);
        assert_eq!(other.now(), 10);
    }

    #[test]
    fn system_clock_reads_past_the_epoch() {
        assert!(SystemClock.now() > 0);
    }
}
