// Gig module
// The record handed to the lifecycle engine by the external gig store

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::time::{TimeError, Timestamp};

/// Stable identifier for a gig. Bucket membership is decided by this id,
/// never by object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GigId(pub String);

impl GigId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GigId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Temporal bucket a gig lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Upcoming => "upcoming",
            GigStatus::Ongoing => "ongoing",
            GigStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for GigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: GigId,
    pub title: String,
    pub client_name: String,
    #[serde(default)]
    pub status: GigStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Timestamp>,
    /// Externally supplied completion percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl Gig {
    /// Create an upcoming gig with no schedule attached.
    ///
    /// # Examples
    /// ```
    /// use gig_lifecycle::models::gig::{Gig, GigStatus};
    ///
    /// let gig = Gig::new("g-1", "Logo redesign", "Acme").with_start_time(1_700_000_000_000_i64);
    /// assert_eq!(gig.status, GigStatus::Upcoming);
    /// assert!(gig.is_due(1_700_000_000_000));
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            id: GigId(id.into()),
            title: title.into(),
            client_name: client_name.into(),
            status: GigStatus::Upcoming,
            start_time: None,
            deadline: None,
            progress: None,
        }
    }

    pub fn with_status(mut self, status: GigStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_start_time(mut self, start_time: impl Into<Timestamp>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<Timestamp>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Set the externally tracked progress, clamped to 100.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress.min(100));
        self
    }

    /// Scheduled start in epoch ms. `None` when no start time was supplied.
    pub fn start_ms(&self) -> Option<Result<i64, TimeError>> {
        self.start_time.as_ref().map(Timestamp::to_epoch_ms)
    }

    /// Whether the scheduled start has passed at `now_ms`.
    ///
    /// Missing or unparseable start times are never due.
    pub fn is_due(&self, now_ms: i64) -> bool {
        matches!(self.start_ms(), Some(Ok(start)) if start <= now_ms)
    }

    /// The timestamp a countdown for this gig runs towards: the start for
    /// upcoming gigs, the deadline for ongoing ones, nothing once completed.
    pub fn countdown_target(&self) -> Option<&Timestamp> {
        match self.status {
            GigStatus::Upcoming => self.start_time.as_ref(),
            GigStatus::Ongoing => self.deadline.as_ref(),
            GigStatus::Completed => None,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.unwrap_or(0).min(100)
    }
}
