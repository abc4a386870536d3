//! The explicit bucket state the scheduler consumes and returns.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::gig::{Gig, GigId, GigStatus};

/// Partition of gigs into temporal buckets.
///
/// Every gig sits in exactly one bucket and its `status` matches that
/// bucket. Fields are private so the only way to move a gig is through
/// the scheduler. Deserializing goes through the same normalization as
/// [`GigBuckets::from_collections`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BucketLists")]
pub struct GigBuckets {
    ongoing: Vec<Gig>,
    upcoming: Vec<Gig>,
    completed: Vec<Gig>,
}

/// Wire form of [`GigBuckets`] before ids and statuses are checked.
#[derive(Deserialize)]
struct BucketLists {
    #[serde(default)]
    ongoing: Vec<Gig>,
    #[serde(default)]
    upcoming: Vec<Gig>,
    #[serde(default)]
    completed: Vec<Gig>,
}

impl From<BucketLists> for GigBuckets {
    fn from(lists: BucketLists) -> Self {
        Self::normalized(lists.ongoing, lists.upcoming, lists.completed)
    }
}

impl GigBuckets {
    /// Build buckets from the two collections the gig store hands over.
    ///
    /// Status is rewritten to match the collection and repeated ids are
    /// dropped (first occurrence wins).
    pub fn from_collections(ongoing: Vec<Gig>, upcoming: Vec<Gig>) -> Self {
        Self::normalized(ongoing, upcoming, Vec::new())
    }

    fn normalized(ongoing: Vec<Gig>, upcoming: Vec<Gig>, completed: Vec<Gig>) -> Self {
        let mut seen = HashSet::new();
        Self {
            ongoing: normalize(ongoing, GigStatus::Ongoing, &mut seen),
            upcoming: normalize(upcoming, GigStatus::Upcoming, &mut seen),
            completed: normalize(completed, GigStatus::Completed, &mut seen),
        }
    }

    /// Partition a flat list of gigs by their own `status` field.
    pub fn from_gigs(gigs: impl IntoIterator<Item = Gig>) -> Self {
        let mut seen = HashSet::new();
        let mut buckets = Self::default();
        for gig in gigs {
            if !seen.insert(gig.id.clone()) {
                log::warn!("Dropping duplicate gig id {} from seed data", gig.id);
                continue;
            }
            match gig.status {
                GigStatus::Ongoing => buckets.ongoing.push(gig),
                GigStatus::Upcoming => buckets.upcoming.push(gig),
                GigStatus::Completed => buckets.completed.push(gig),
            }
        }
        buckets
    }

    pub(crate) fn into_parts(self) -> (Vec<Gig>, Vec<Gig>, Vec<Gig>) {
        (self.ongoing, self.upcoming, self.completed)
    }

    pub(crate) fn from_parts(ongoing: Vec<Gig>, upcoming: Vec<Gig>, completed: Vec<Gig>) -> Self {
        Self {
            ongoing,
            upcoming,
            completed,
        }
    }

    pub fn ongoing(&self) -> &[Gig] {
        &self.ongoing
    }

    pub fn upcoming(&self) -> &[Gig] {
        &self.upcoming
    }

    pub fn completed(&self) -> &[Gig] {
        &self.completed
    }

    /// Total gigs across every bucket.
    pub fn len(&self) -> usize {
        self.ongoing.len() + self.upcoming.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &GigId) -> Option<&Gig> {
        self.iter().find(|gig| &gig.id == id)
    }

    pub fn status_of(&self, id: &GigId) -> Option<GigStatus> {
        self.find(id).map(|gig| gig.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gig> {
        self.ongoing
            .iter()
            .chain(self.upcoming.iter())
            .chain(self.completed.iter())
    }
}

fn normalize(gigs: Vec<Gig>, status: GigStatus, seen: &mut HashSet<GigId>) -> Vec<Gig> {
    gigs.into_iter()
        .filter_map(|mut gig| {
            if !seen.insert(gig.id.clone()) {
                log::warn!("Gig {} appears in more than one collection; keeping the first", gig.id);
                return None;
            }
            if gig.status != status {
                log::warn!(
                    "Gig {} handed over as {} but marked {}; treating it as {}",
                    gig.id,
                    status,
                    gig.status,
                    status
                );
                gig.status = status;
            }
            Some(gig)
        })
        .collect()
}
