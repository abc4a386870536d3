// Settings module
// Tunables for the lifecycle scheduler and countdown surfaces

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::countdown::{CountdownWindows, UrgencyThresholds, UrgencyTier};

pub const MIN_TICK_INTERVAL_SECS: u64 = 5;
pub const MAX_TICK_INTERVAL_SECS: u64 = 15;
pub const MIN_COUNTDOWN_REFRESH_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Seconds between lifecycle ticks
    pub tick_interval_secs: u64,
    /// Milliseconds between countdown refreshes on a visible surface
    pub countdown_refresh_ms: u64,
    /// Reference window for ongoing-gig deadline rings
    pub ongoing_window_hours: u32,
    /// Reference window for the "starting soon" classification
    pub upcoming_window_hours: u32,
    pub urgency_tiers: Vec<UrgencyTier>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: 10,
            countdown_refresh_ms: 1_000,
            ongoing_window_hours: 24,
            upcoming_window_hours: 48,
            urgency_tiers: UrgencyThresholds::default().tiers().to_vec(),
        }
    }
}

impl EngineSettings {
    /// Tick cadence, clamped to the supported 5-15 second range.
    pub fn tick_interval(&self) -> Duration {
        let secs = self
            .tick_interval_secs
            .clamp(MIN_TICK_INTERVAL_SECS, MAX_TICK_INTERVAL_SECS);
        if secs != self.tick_interval_secs {
            log::warn!(
                "tick_interval_secs={} outside {}-{}; using {}",
                self.tick_interval_secs,
                MIN_TICK_INTERVAL_SECS,
                MAX_TICK_INTERVAL_SECS,
                secs
            );
        }
        Duration::from_secs(secs)
    }

    pub fn countdown_refresh(&self) -> Duration {
        Duration::from_millis(self.countdown_refresh_ms.max(MIN_COUNTDOWN_REFRESH_MS))
    }

    pub fn windows(&self) -> CountdownWindows {
        CountdownWindows::from_hours(self.ongoing_window_hours, self.upcoming_window_hours)
    }

    pub fn thresholds(&self) -> UrgencyThresholds {
        UrgencyThresholds::new(self.urgency_tiers.clone())
    }
}
