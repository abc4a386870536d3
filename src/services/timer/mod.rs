//! Tokio-driven timers for embedding surfaces.
//!
//! A bucket timer is the single owner of a [`GigBuckets`] value and ticks
//! the scheduler on a fixed cadence. Countdown timers re-derive one display
//! each. Both publish through `watch` channels and stop when their handle is
//! stopped or dropped.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::services::clock::Clock;
use crate::services::countdown::{derive_from_timestamp, CountdownDisplay, UrgencyThresholds};
use crate::services::lifecycle::{GigBuckets, LifecycleScheduler};
use crate::utils::time::Timestamp;

/// Owns a spawned timer task. Dropping it stops the task.
#[derive(Debug)]
pub struct TimerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    fn new(shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Stop the timer and wait for its task to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!("Timer task ended abnormally: {err}");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

fn cadence_interval(cadence: Duration) -> time::Interval {
    let mut interval = time::interval(cadence);
    // A stalled runtime should not replay a burst of stale ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

pub struct BucketTimerHandle {
    timer: TimerHandle,
    replacements: mpsc::UnboundedSender<GigBuckets>,
    updates: watch::Receiver<GigBuckets>,
}

impl BucketTimerHandle {
    pub fn subscribe(&self) -> watch::Receiver<GigBuckets> {
        self.updates.clone()
    }

    pub fn current(&self) -> GigBuckets {
        self.updates.borrow().clone()
    }

    /// Hand the timer a fresh set of gigs from the store. The timer applies
    /// it on its own task and ticks it straight away. Returns `false` once
    /// the timer has stopped.
    pub fn replace(&self, buckets: GigBuckets) -> bool {
        self.replacements.send(buckets).is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    pub async fn stop(self) {
        self.timer.stop().await;
    }
}

/// Spawn the timer that owns `initial` and re-buckets it every `cadence`.
///
/// The first tick runs immediately. A new state is published only when a
/// tick promoted something or the buckets were replaced.
pub fn spawn_bucket_timer<C>(initial: GigBuckets, clock: C, cadence: Duration) -> BucketTimerHandle
where
    C: Clock + 'static,
{
    let (updates_tx, updates_rx) = watch::channel(initial.clone());
    let (replacements_tx, mut replacements_rx) = mpsc::unbounded_channel::<GigBuckets>();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut scheduler = LifecycleScheduler::new();
        let mut buckets = initial;
        let mut interval = cadence_interval(cadence);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                Some(replacement) = replacements_rx.recv() => {
                    let (next, _) = scheduler.tick_with_clock(replacement, &clock);
                    buckets = next;
                    updates_tx.send_replace(buckets.clone());
                }
                _ = interval.tick() => {
                    let (next, report) = scheduler.tick_with_clock(buckets, &clock);
                    buckets = next;
                    if report.changed() {
                        updates_tx.send_replace(buckets.clone());
                    }
                }
            }
        }

        log::debug!("Bucket timer stopped after {} tick(s)", scheduler.tick_count());
    });

    BucketTimerHandle {
        timer: TimerHandle::new(shutdown_tx, task),
        replacements: replacements_tx,
        updates: updates_rx,
    }
}

pub struct CountdownTimerHandle {
    timer: TimerHandle,
    updates: watch::Receiver<CountdownDisplay>,
}

impl CountdownTimerHandle {
    pub fn subscribe(&self) -> watch::Receiver<CountdownDisplay> {
        self.updates.clone()
    }

    pub fn current(&self) -> CountdownDisplay {
        self.updates.borrow().clone()
    }

    pub async fn stop(self) {
        self.timer.stop().await;
    }
}

/// Spawn a per-surface countdown refreshing every `cadence`. Subscribers
/// are only woken when the rendered triple actually changes.
pub fn spawn_countdown_timer<C>(
    target: Timestamp,
    clock: C,
    cadence: Duration,
    window_ms: i64,
    thresholds: UrgencyThresholds,
) -> CountdownTimerHandle
where
    C: Clock + 'static,
{
    let initial = derive_from_timestamp(&target, clock.now_ms(), window_ms, &thresholds);
    let (updates_tx, updates_rx) = watch::channel(initial);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut interval = cadence_interval(cadence);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                _ = interval.tick() => {
                    let display = derive_from_timestamp(&target, clock.now_ms(), window_ms, &thresholds);
                    updates_tx.send_if_modified(|current| {
                        if *current == display {
                            false
                        } else {
                            *current = display;
                            true
                        }
                    });
                }
            }
        }
    });

    CountdownTimerHandle {
        timer: TimerHandle::new(shutdown_tx, task),
        updates: updates_rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gig::{Gig, GigId, GigStatus};
    use crate::services::clock::ManualClock;
    use crate::services::countdown::Urgency;
    use crate::utils::time::MS_PER_HOUR;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const NOW: i64 = 1_740_000_000_000;

    fn upcoming_at(id: &str, start_ms: i64) -> Gig {
        Gig::new(id, "Gig", "Client").with_start_time(start_ms)
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_timer_promotes_once_start_passes() {
        let clock = Arc::new(ManualClock::new(NOW));
        let buckets = GigBuckets::from_collections(vec![], vec![upcoming_at("a", NOW + 5_000)]);
        let handle = spawn_bucket_timer(buckets, clock.clone(), Duration::from_secs(5));
        let mut updates = handle.subscribe();

        time::sleep(Duration::from_millis(10)).await;
        assert!(handle.current().ongoing().is_empty());

        clock.advance(5_000);
        updates.changed().await.unwrap();

        let current = updates.borrow_and_update().clone();
        assert_eq!(current.status_of(&GigId::new("a")), Some(GigStatus::Ongoing));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_timer_ticks_replacements_immediately() {
        let clock = Arc::new(ManualClock::new(NOW));
        let handle = spawn_bucket_timer(GigBuckets::default(), clock, Duration::from_secs(15));
        let mut updates = handle.subscribe();

        let fresh = GigBuckets::from_collections(vec![], vec![upcoming_at("due", NOW - 1)]);
        assert!(handle.replace(fresh));
        updates.changed().await.unwrap();

        assert_eq!(updates.borrow_and_update().ongoing().len(), 1);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_bucket_timer_rejects_replacements() {
        let clock = Arc::new(ManualClock::new(NOW));
        let handle = spawn_bucket_timer(GigBuckets::default(), clock, Duration::from_secs(5));
        let replacements = handle.replacements.clone();
        time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());

        handle.stop().await;

        assert!(replacements.send(GigBuckets::default()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_timer_publishes_changes_until_expired() {
        let clock = Arc::new(ManualClock::new(NOW));
        let handle = spawn_countdown_timer(
            Timestamp::from(NOW + 3_000),
            clock.clone(),
            Duration::from_secs(1),
            24 * MS_PER_HOUR,
            UrgencyThresholds::default(),
        );
        assert_eq!(handle.current().formatted, "00:00:03");
        let mut updates = handle.subscribe();

        clock.advance(1_000);
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().formatted, "00:00:02");

        clock.advance(5_000);
        updates.changed().await.unwrap();
        let display = updates.borrow_and_update().clone();
        assert_eq!(display.urgency, Urgency::Expired);
        assert_eq!(display.fraction_remaining, 0.0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_countdown_handle_stops_its_task() {
        let clock = Arc::new(ManualClock::new(NOW));
        let handle = spawn_countdown_timer(
            Timestamp::from(NOW + MS_PER_HOUR),
            clock,
            Duration::from_secs(1),
            24 * MS_PER_HOUR,
            UrgencyThresholds::default(),
        );
        let mut updates = handle.subscribe();

        drop(handle);

        // The sender goes away with the task, so waiting reports closure.
        assert!(updates.changed().await.is_err());
    }
}
