// Gig Lifecycle Library
// Bucket scheduling and countdown derivation for gig marketplace surfaces

pub mod models;
pub mod services;
pub mod utils;

pub use models::gig::{Gig, GigId, GigStatus};
pub use services::countdown::{CountdownDisplay, Urgency, UrgencyThresholds};
pub use services::lifecycle::{tick, GigBuckets, LifecycleScheduler, TickReport};
pub use utils::time::{TimeError, Timestamp};
