//! Injectable time sources.
//!
//! The scheduler and countdown timers never read the wall clock directly;
//! they ask a [`Clock`] so tests can pin or advance time explicitly.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Source of "now" in epoch milliseconds.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Wraps another clock so readings never go backwards.
///
/// A regression in the inner clock (NTP step, manual change) is clamped to
/// the highest value already handed out.
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    high_water_ms: AtomicI64,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            high_water_ms: AtomicI64::new(i64::MIN),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now_ms(&self) -> i64 {
        let reading = self.inner.now_ms();
        let previous = self.high_water_ms.fetch_max(reading, Ordering::SeqCst);
        if reading < previous {
            log::debug!(
                "Clock went backwards by {}ms; holding at {}",
                previous - reading,
                previous
            );
            previous
        } else {
            reading
        }
    }
}
