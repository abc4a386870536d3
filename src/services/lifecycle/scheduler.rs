use crate::models::gig::{GigId, GigStatus};
use crate::services::clock::Clock;

use super::buckets::GigBuckets;

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Gigs moved from upcoming to ongoing, in promotion order.
    pub promoted: Vec<GigId>,
    /// Upcoming gigs whose start time could not be parsed.
    pub malformed: Vec<GigId>,
    /// Time until the next parseable start time falls due.
    pub next_due_in_ms: Option<i64>,
}

impl TickReport {
    pub fn promoted_count(&self) -> usize {
        self.promoted.len()
    }

    pub fn changed(&self) -> bool {
        !self.promoted.is_empty()
    }
}

/// Re-bucket gigs against `now_ms`.
///
/// Every upcoming gig whose start time has passed moves to the end of the
/// ongoing list, keeping its relative order. The result is a new value, so
/// a reader sees either the whole migration or none of it. Never fails:
/// unparseable start times are left in upcoming.
pub fn tick(buckets: GigBuckets, now_ms: i64) -> (GigBuckets, TickReport) {
    let (mut ongoing, upcoming, completed) = buckets.into_parts();
    let mut still_upcoming = Vec::with_capacity(upcoming.len());
    let mut report = TickReport::default();

    for mut gig in upcoming {
        match gig.start_ms() {
            Some(Ok(start_ms)) if start_ms <= now_ms => {
                gig.status = GigStatus::Ongoing;
                report.promoted.push(gig.id.clone());
                ongoing.push(gig);
            }
            Some(Ok(start_ms)) => {
                let wait = start_ms.saturating_sub(now_ms);
                report.next_due_in_ms = Some(report.next_due_in_ms.map_or(wait, |due| due.min(wait)));
                still_upcoming.push(gig);
            }
            Some(Err(err)) => {
                log::debug!("Leaving gig {} upcoming: {}", gig.id, err);
                report.malformed.push(gig.id.clone());
                still_upcoming.push(gig);
            }
            None => still_upcoming.push(gig),
        }
    }

    if report.changed() {
        log::info!(
            "Promoted {} gig(s) to ongoing: {:?}",
            report.promoted_count(),
            report.promoted
        );
    }

    (
        GigBuckets::from_parts(ongoing, still_upcoming, completed),
        report,
    )
}

/// Stateful wrapper around [`tick`] that refuses to let time run backwards.
///
/// Polls can arrive out of order; a tick carrying an older timestamp than
/// one already processed is evaluated at the newest time seen instead.
#[derive(Debug, Clone, Default)]
pub struct LifecycleScheduler {
    latest_now_ms: Option<i64>,
    tick_count: u64,
}

impl LifecycleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, buckets: GigBuckets, now_ms: i64) -> (GigBuckets, TickReport) {
        let effective_now = match self.latest_now_ms {
            Some(latest) if now_ms < latest => {
                log::debug!(
                    "Out-of-order tick at {} ignored in favour of {}",
                    now_ms,
                    latest
                );
                latest
            }
            _ => now_ms,
        };

        self.latest_now_ms = Some(effective_now);
        self.tick_count = self.tick_count.saturating_add(1);
        tick(buckets, effective_now)
    }

    pub fn tick_with_clock<C: Clock + ?Sized>(
        &mut self,
        buckets: GigBuckets,
        clock: &C,
    ) -> (GigBuckets, TickReport) {
        self.tick(buckets, clock.now_ms())
    }

    pub fn latest_now_ms(&self) -> Option<i64> {
        self.latest_now_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
