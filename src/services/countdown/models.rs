use serde::{Deserialize, Serialize};

use crate::utils::time::minutes_to_ms;

/// How pressing the remaining time is, ordered from calm to expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Soon,
    Critical,
    /// Target time has passed (remaining <= 0)
    Expired,
}

/// One row of a threshold table: remaining time strictly below
/// `below_minutes` maps to `urgency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyTier {
    pub below_minutes: u32,
    pub urgency: Urgency,
}

impl UrgencyTier {
    pub const fn minutes(below_minutes: u32, urgency: Urgency) -> Self {
        Self {
            below_minutes,
            urgency,
        }
    }

    pub const fn hours(below_hours: u32, urgency: Urgency) -> Self {
        Self::minutes(below_hours.saturating_mul(60), urgency)
    }

    fn below_ms(&self) -> i64 {
        minutes_to_ms(self.below_minutes)
    }
}

/// Caller-owned threshold table. Tiers are kept sorted by bound so the
/// tightest matching tier wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UrgencyTier>", into = "Vec<UrgencyTier>")]
pub struct UrgencyThresholds {
    tiers: Vec<UrgencyTier>,
}

impl UrgencyThresholds {
    pub fn new(mut tiers: Vec<UrgencyTier>) -> Self {
        tiers.sort_by_key(|tier| tier.below_minutes);
        Self { tiers }
    }

    /// An empty table classifies every live countdown as `Normal`.
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn tiers(&self) -> &[UrgencyTier] {
        &self.tiers
    }

    /// Classify a remaining-time delta.
    pub fn classify(&self, remaining_ms: i64) -> Urgency {
        if remaining_ms <= 0 {
            return Urgency::Expired;
        }

        self.tiers
            .iter()
            .find(|tier| remaining_ms < tier.below_ms())
            .map(|tier| tier.urgency)
            .unwrap_or(Urgency::Normal)
    }
}

impl Default for UrgencyThresholds {
    /// Under 6 hours is critical, under 48 hours is soon.
    fn default() -> Self {
        Self::new(vec![
            UrgencyTier::hours(6, Urgency::Critical),
            UrgencyTier::hours(48, Urgency::Soon),
        ])
    }
}

impl From<Vec<UrgencyTier>> for UrgencyThresholds {
    fn from(tiers: Vec<UrgencyTier>) -> Self {
        Self::new(tiers)
    }
}

impl From<UrgencyThresholds> for Vec<UrgencyTier> {
    fn from(thresholds: UrgencyThresholds) -> Self {
        thresholds.tiers
    }
}

/// What a countdown surface renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    /// `HH:MM:SS`, hours uncapped.
    pub formatted: String,
    /// Share of the reference window still remaining, in `0.0..=1.0`.
    pub fraction_remaining: f64,
    pub urgency: Urgency,
}

impl CountdownDisplay {
    pub fn expired() -> Self {
        Self {
            formatted: "00:00:00".to_string(),
            fraction_remaining: 0.0,
            urgency: Urgency::Expired,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.urgency == Urgency::Expired
    }

    /// Remaining share as a whole percentage, rounded half away from zero.
    /// Every surface goes through this so rings and labels agree.
    pub fn percent_remaining(&self) -> u8 {
        (self.fraction_remaining * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
