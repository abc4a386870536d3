//! Pure countdown projections.
//!
//! Nothing here holds state or mutates a gig, so any number of surfaces can
//! call these on their own cadence without coordinating.

use crate::models::gig::{Gig, GigStatus};
use crate::utils::time::{format_hms, hours_to_ms, TimeError, Timestamp};

use super::models::{CountdownDisplay, UrgencyThresholds};

/// Reference windows used to turn a remaining delta into a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownWindows {
    /// Window for ongoing gigs counting down to their deadline.
    pub ongoing_ms: i64,
    /// Window for upcoming gigs counting down to their start.
    pub upcoming_ms: i64,
}

impl CountdownWindows {
    pub fn from_hours(ongoing_hours: u32, upcoming_hours: u32) -> Self {
        Self {
            ongoing_ms: hours_to_ms(ongoing_hours),
            upcoming_ms: hours_to_ms(upcoming_hours),
        }
    }

    pub fn for_status(&self, status: GigStatus) -> i64 {
        match status {
            GigStatus::Ongoing => self.ongoing_ms,
            GigStatus::Upcoming | GigStatus::Completed => self.upcoming_ms,
        }
    }
}

impl Default for CountdownWindows {
    fn default() -> Self {
        Self::from_hours(24, 48)
    }
}

/// Share of `window_ms` still left, clamped to `0.0..=1.0`.
pub fn fraction_remaining(remaining_ms: i64, window_ms: i64) -> Result<f64, TimeError> {
    if window_ms <= 0 {
        return Err(TimeError::InvalidWindow(window_ms));
    }
    Ok((remaining_ms as f64 / window_ms as f64).clamp(0.0, 1.0))
}

/// Derive the display triple for a countdown towards `target_ms`.
///
/// # Examples
/// ```
/// use gig_lifecycle::services::countdown::{derive, UrgencyThresholds};
///
/// let now = 1_700_000_000_000;
/// let display = derive(now + 5_400_000, now, 48 * 3_600_000, &UrgencyThresholds::default());
/// assert_eq!(display.formatted, "01:30:00");
/// ```
pub fn derive(
    target_ms: i64,
    now_ms: i64,
    window_ms: i64,
    thresholds: &UrgencyThresholds,
) -> CountdownDisplay {
    let remaining_ms = target_ms.saturating_sub(now_ms);
    if remaining_ms <= 0 {
        return CountdownDisplay::expired();
    }

    let fraction = fraction_remaining(remaining_ms, window_ms).unwrap_or_else(|err| {
        log::debug!("Countdown shows 0% remaining: {}", err);
        0.0
    });

    CountdownDisplay {
        formatted: format_hms(remaining_ms),
        fraction_remaining: fraction,
        urgency: thresholds.classify(remaining_ms),
    }
}

/// Same as [`derive`] for a timestamp that may not parse. A malformed
/// target shows as expired.
pub fn derive_from_timestamp(
    target: &Timestamp,
    now_ms: i64,
    window_ms: i64,
    thresholds: &UrgencyThresholds,
) -> CountdownDisplay {
    match target.to_epoch_ms() {
        Ok(target_ms) => derive(target_ms, now_ms, window_ms, thresholds),
        Err(err) => {
            log::debug!("Countdown shows expired: {}", err);
            CountdownDisplay::expired()
        }
    }
}

/// Countdown for a gig: upcoming gigs count to their start, ongoing gigs to
/// their deadline. Completed gigs and gigs missing that timestamp are expired.
pub fn derive_for_gig(
    gig: &Gig,
    now_ms: i64,
    windows: &CountdownWindows,
    thresholds: &UrgencyThresholds,
) -> CountdownDisplay {
    match gig.countdown_target() {
        Some(target) => {
            derive_from_timestamp(target, now_ms, windows.for_status(gig.status), thresholds)
        }
        None => CountdownDisplay::expired(),
    }
}

/// Whether `target` falls inside the next `window_ms`, exclusive of now.
/// Malformed targets are never starting soon.
pub fn is_starting_soon(target: &Timestamp, now_ms: i64, window_ms: i64) -> bool {
    match target.to_epoch_ms() {
        Ok(target_ms) => {
            let remaining_ms = target_ms.saturating_sub(now_ms);
            remaining_ms > 0 && remaining_ms <= window_ms
        }
        Err(_) => false,
    }
}
