// Integration tests for the lifecycle scheduler and countdown deriver
mod fixtures;

use fixtures::{gigs, ids, DAY, HOUR, MINUTE, NOW, SECOND};
use gig_lifecycle::models::gig::{GigId, GigStatus};
use gig_lifecycle::services::countdown::{
    derive, derive_for_gig, CountdownDisplay, CountdownWindows, Urgency, UrgencyThresholds,
    UrgencyTracker,
};
use gig_lifecycle::services::lifecycle::{tick, GigBuckets, LifecycleScheduler};
use gig_lifecycle::services::seed::load_buckets;
use pretty_assertions::assert_eq;

#[test]
fn test_gig_started_one_ms_ago_moves_to_ongoing() {
    let buckets = GigBuckets::from_collections(vec![], vec![gigs::starting_at("a", NOW - 1)]);

    let (next, _) = tick(buckets, NOW);

    assert_eq!(ids(next.ongoing()), vec!["a"]);
    assert_eq!(next.ongoing()[0].status, GigStatus::Ongoing);
    assert!(next.upcoming().is_empty());
}

#[test]
fn test_only_the_due_gig_moves_and_queue_order_holds() {
    let buckets = GigBuckets::from_collections(
        vec![],
        vec![
            gigs::starting_at("past", NOW - 10_000),
            gigs::starting_at("future", NOW + 10_000),
        ],
    );

    let (next, report) = tick(buckets, NOW);

    assert_eq!(ids(next.ongoing()), vec!["past"]);
    assert_eq!(ids(next.upcoming()), vec!["future"]);
    assert_eq!(report.promoted, vec![GigId::new("past")]);
}

#[test]
fn test_dashboard_over_a_day_of_ticks() {
    let (ongoing, upcoming) = gigs::dashboard();
    let mut buckets = GigBuckets::from_collections(ongoing, upcoming);
    let total = buckets.len();
    let mut scheduler = LifecycleScheduler::new();

    let mut now = NOW;
    while now <= NOW + 4 * DAY {
        let (next, _) = scheduler.tick(buckets, now);
        buckets = next;
        assert_eq!(buckets.len(), total);
        now += 10 * MINUTE;
    }

    assert_eq!(
        ids(buckets.ongoing()),
        vec!["live-1", "live-2", "next-1", "next-2", "next-3"]
    );
    assert_eq!(ids(buckets.upcoming()), vec!["draft", "broken"]);
    assert!(buckets
        .ongoing()
        .iter()
        .all(|gig| gig.status == GigStatus::Ongoing));
}

#[test]
fn test_malformed_start_never_transitions() {
    let mut buckets = GigBuckets::from_collections(vec![], vec![gigs::malformed("broken")]);

    for step in 0..50 {
        let (next, report) = tick(buckets, NOW + step * DAY);
        assert_eq!(report.malformed, vec![GigId::new("broken")]);
        buckets = next;
    }

    assert_eq!(buckets.status_of(&GigId::new("broken")), Some(GigStatus::Upcoming));
}

#[test]
fn test_next_due_tells_the_surface_when_to_tick() {
    let (ongoing, upcoming) = gigs::dashboard();
    let buckets = GigBuckets::from_collections(ongoing, upcoming);

    let (buckets, report) = tick(buckets, NOW);
    assert_eq!(report.next_due_in_ms, Some(10 * SECOND));

    let (_, report) = tick(buckets, NOW + 10 * SECOND);
    assert_eq!(report.promoted, vec![GigId::new("next-1")]);
    assert_eq!(report.next_due_in_ms, Some(2 * HOUR - 10 * SECOND));
}

#[test]
fn test_countdown_ninety_minutes_in_two_day_window() {
    let display = derive(NOW + 5_400_000, NOW, 48 * HOUR, &UrgencyThresholds::default());

    assert_eq!(display.formatted, "01:30:00");
    assert!((display.fraction_remaining - 0.03125).abs() < 1e-9);
    assert_eq!(display.percent_remaining(), 3);
}

#[test]
fn test_countdowns_follow_gigs_across_promotion() {
    let windows = CountdownWindows::default();
    let thresholds = UrgencyThresholds::default();
    let gig = gigs::starting_at("g", NOW + HOUR).with_deadline(NOW + 13 * HOUR);
    let buckets = GigBuckets::from_collections(vec![], vec![gig]);

    let before = derive_for_gig(&buckets.upcoming()[0], NOW, &windows, &thresholds);
    assert_eq!(before.formatted, "01:00:00");
    assert_eq!(before.urgency, Urgency::Critical);

    let (buckets, _) = tick(buckets, NOW + HOUR);
    let after = derive_for_gig(&buckets.ongoing()[0], NOW + HOUR, &windows, &thresholds);
    assert_eq!(after.formatted, "12:00:00");
    assert_eq!(after.fraction_remaining, 0.5);
    assert_eq!(after.urgency, Urgency::Soon);
}

#[test]
fn test_tracker_escalates_once_per_level() {
    let thresholds = UrgencyThresholds::default();
    let gig = gigs::ongoing_until("g", NOW + 3 * DAY);
    let mut tracker = UrgencyTracker::new();
    let mut escalations = Vec::new();

    let mut now = NOW;
    while now <= NOW + 3 * DAY + HOUR {
        let display = derive(NOW + 3 * DAY, now, DAY, &thresholds);
        if let Some(escalation) = tracker.observe(&gig.id, display.urgency) {
            escalations.push(escalation.current);
        }
        now += 30 * MINUTE;
    }

    assert_eq!(
        escalations,
        vec![Urgency::Soon, Urgency::Critical, Urgency::Expired]
    );
}

#[test]
fn test_seed_fixture_feeds_the_scheduler() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("gigs.json");
    std::fs::write(
        &path,
        format!(
            r#"[
                {{ "id": "a", "title": "Menu design", "clientName": "Bistro", "startTime": {} }},
                {{ "id": "b", "title": "Site audit", "clientName": "Acme", "startTime": "not-a-date" }},
                {{ "id": "c", "title": "Brochure", "clientName": "Acme", "status": "completed" }}
            ]"#,
            NOW - MINUTE
        ),
    )
    .unwrap();

    let buckets = load_buckets(&path).unwrap();
    let (next, _) = tick(buckets, NOW);

    assert_eq!(ids(next.ongoing()), vec!["a"]);
    assert_eq!(ids(next.upcoming()), vec!["b"]);
    assert_eq!(ids(next.completed()), vec!["c"]);
}

#[test]
fn test_expired_display_is_shared_shape() {
    let display = derive(NOW, NOW, DAY, &UrgencyThresholds::default());
    assert_eq!(display, CountdownDisplay::expired());
}

#[test]
fn test_compact_date_start_is_not_promoted_early() {
    let buckets = GigBuckets::from_collections(
        vec![],
        vec![gigs::unscheduled("later").with_start_time("20991231")],
    );

    let (next, report) = tick(buckets, NOW);

    assert!(next.ongoing().is_empty());
    assert!(report.promoted.is_empty());
    assert!(report.next_due_in_ms.unwrap() > 365 * DAY);
}
