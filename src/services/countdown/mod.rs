mod deriver;
mod escalation;
mod models;

pub use deriver::{
    derive, derive_for_gig, derive_from_timestamp, fraction_remaining, is_starting_soon,
    CountdownWindows,
};
pub use escalation::{UrgencyEscalation, UrgencyTracker};
pub use models::{CountdownDisplay, Urgency, UrgencyThresholds, UrgencyTier};
