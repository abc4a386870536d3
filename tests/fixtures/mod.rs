// Test fixtures - reusable gig data
// Provides consistent gigs and clock readings across test files

#![allow(dead_code)]

use gig_lifecycle::models::gig::{Gig, GigStatus};

/// Fixed "now" used across tests: 2025-02-19T21:20:00Z
pub const NOW: i64 = 1_740_000_000_000;

pub const SECOND: i64 = 1_000;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;

/// Sample gigs for testing
pub mod gigs {
    use super::*;

    /// Upcoming gig starting at `start_ms`
    pub fn starting_at(id: &str, start_ms: i64) -> Gig {
        Gig::new(id, format!("Gig {id}"), "Test Client").with_start_time(start_ms)
    }

    /// Ongoing gig with a deadline
    pub fn ongoing_until(id: &str, deadline_ms: i64) -> Gig {
        Gig::new(id, format!("Gig {id}"), "Test Client")
            .with_status(GigStatus::Ongoing)
            .with_start_time(deadline_ms - DAY)
            .with_deadline(deadline_ms)
    }

    /// Upcoming gig nobody has scheduled yet
    pub fn unscheduled(id: &str) -> Gig {
        Gig::new(id, format!("Gig {id}"), "Test Client")
    }

    /// Upcoming gig whose start time is garbage
    pub fn malformed(id: &str) -> Gig {
        Gig::new(id, format!("Gig {id}"), "Test Client").with_start_time("not-a-date")
    }

    /// Mixed dashboard: two live gigs and a queue of upcoming ones
    pub fn dashboard() -> (Vec<Gig>, Vec<Gig>) {
        let ongoing = vec![
            ongoing_until("live-1", NOW + 5 * HOUR),
            ongoing_until("live-2", NOW + 30 * HOUR),
        ];
        let upcoming = vec![
            starting_at("next-1", NOW + 10 * SECOND),
            starting_at("next-2", NOW + 2 * HOUR),
            unscheduled("draft"),
            malformed("broken"),
            starting_at("next-3", NOW + 3 * DAY),
        ];
        (ongoing, upcoming)
    }
}

pub fn ids(gigs: &[Gig]) -> Vec<&str> {
    gigs.iter().map(|gig| gig.id.as_str()).collect()
}
