//! Gig lifecycle scheduling.
//!
//! Keeps the upcoming/ongoing partition in step with the clock. The
//! embedding surface owns the timer and stores the returned buckets.

mod buckets;
mod scheduler;

pub use buckets::GigBuckets;
pub use scheduler::{tick, LifecycleScheduler, TickReport};
