// Gig Board
// Runs the lifecycle engine against seed gigs and logs what a dashboard would render

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use gig_lifecycle::models::gig::Gig;
use gig_lifecycle::services::clock::{Clock, MonotonicClock, SystemClock};
use gig_lifecycle::services::countdown::{
    derive_for_gig, CountdownWindows, UrgencyThresholds, UrgencyTracker,
};
use gig_lifecycle::services::lifecycle::GigBuckets;
use gig_lifecycle::services::seed::load_buckets;
use gig_lifecycle::services::settings::SettingsService;
use gig_lifecycle::services::timer::{spawn_bucket_timer, spawn_countdown_timer};
use gig_lifecycle::utils::time::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Gig Board");

    let settings = SettingsService::from_default_location().load()?;
    let clock = Arc::new(MonotonicClock::new(SystemClock));

    let buckets = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_buckets(&path)?,
        None => demo_buckets(clock.now_ms()),
    };

    let windows = settings.windows();
    let thresholds = settings.thresholds();
    let mut tracker = UrgencyTracker::new();
    report(&buckets, clock.now_ms(), &windows, &thresholds, &mut tracker);

    let focus = buckets
        .ongoing()
        .first()
        .or_else(|| buckets.upcoming().first())
        .and_then(|gig| gig.countdown_target().cloned().map(|target| (gig.clone(), target)));

    let bucket_timer = spawn_bucket_timer(buckets, clock.clone(), settings.tick_interval());
    let mut bucket_updates = bucket_timer.subscribe();

    let countdown_timer = focus.map(|(gig, target)| {
        log::info!("Following countdown for {} ({})", gig.title, gig.id);
        spawn_countdown_timer(
            target,
            clock.clone(),
            settings.countdown_refresh(),
            windows.for_status(gig.status),
            thresholds.clone(),
        )
    });
    let mut countdown_updates = countdown_timer.as_ref().map(|timer| timer.subscribe());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = bucket_updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = bucket_updates.borrow_and_update().clone();
                report(&current, clock.now_ms(), &windows, &thresholds, &mut tracker);
            }
            Some(changed) = async {
                match countdown_updates.as_mut() {
                    Some(updates) => Some(updates.changed().await),
                    None => None,
                }
            } => {
                if changed.is_err() {
                    countdown_updates = None;
                    continue;
                }
                if let Some(updates) = countdown_updates.as_mut() {
                    let display = updates.borrow_and_update().clone();
                    log::info!(
                        "countdown {} ({}% left, {:?})",
                        display.formatted,
                        display.percent_remaining(),
                        display.urgency
                    );
                }
            }
        }
    }

    log::info!("Shutting down");
    if let Some(timer) = countdown_timer {
        timer.stop().await;
    }
    bucket_timer.stop().await;
    Ok(())
}

fn report(
    buckets: &GigBuckets,
    now_ms: i64,
    windows: &CountdownWindows,
    thresholds: &UrgencyThresholds,
    tracker: &mut UrgencyTracker,
) {
    for gig in buckets.ongoing().iter().chain(buckets.upcoming()) {
        let display = derive_for_gig(gig, now_ms, windows, thresholds);
        if let Some(escalation) = tracker.observe(&gig.id, display.urgency) {
            log::warn!(
                "{} became {:?} (was {:?})",
                gig.title,
                escalation.current,
                escalation.previous
            );
        }
        log::info!(
            "[{}] {} for {}: {} ({}%)",
            gig.status,
            gig.title,
            gig.client_name,
            display.formatted,
            display.percent_remaining()
        );
    }
    tracker.retain(|id| buckets.find(id).is_some());
}

/// A small dashboard's worth of gigs scheduled around `now_ms`.
fn demo_buckets(now_ms: i64) -> GigBuckets {
    GigBuckets::from_collections(
        vec![
            Gig::new("gig-101", "E-commerce product shoot", "Lumen Studio")
                .with_start_time(now_ms - 2 * MS_PER_HOUR)
                .with_deadline(now_ms + 5 * MS_PER_HOUR)
                .with_progress(35),
            Gig::new("gig-102", "Mobile app onboarding copy", "Brightpath")
                .with_start_time(now_ms - 26 * MS_PER_HOUR)
                .with_deadline(now_ms + 30 * MS_PER_HOUR)
                .with_progress(70),
        ],
        vec![
            Gig::new("gig-201", "Wedding highlight reel", "A. Moreno")
                .with_start_time(now_ms + 20 * MS_PER_SECOND)
                .with_deadline(now_ms + 20 * MS_PER_SECOND + 48 * MS_PER_HOUR),
            Gig::new("gig-202", "Quarterly bookkeeping", "Oakline Cafe")
                .with_start_time(now_ms + 3 * MS_PER_HOUR + 15 * MS_PER_MINUTE)
                .with_deadline(now_ms + 27 * MS_PER_HOUR),
            Gig::new("gig-203", "Logo refresh", "Tidewater Co."),
        ],
    )
}
