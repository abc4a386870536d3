//! Urgency escalation tracking for a single display surface.
//!
//! Watches urgency transitions so a surface can flash or notify once when a
//! gig becomes more urgent, not on every refresh.

use std::collections::HashMap;

use crate::models::gig::GigId;

use super::models::Urgency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencyEscalation {
    pub gig_id: GigId,
    pub previous: Option<Urgency>,
    pub current: Urgency,
}

/// Per-surface memory of the last urgency seen for each gig.
#[derive(Debug, Clone, Default)]
pub struct UrgencyTracker {
    last_seen: HashMap<GigId, Urgency>,
}

impl UrgencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest urgency for `gig_id`, returning an escalation only
    /// when urgency went up. A first sighting only counts when it is
    /// already above normal.
    pub fn observe(&mut self, gig_id: &GigId, current: Urgency) -> Option<UrgencyEscalation> {
        let previous = self.last_seen.insert(gig_id.clone(), current);

        let escalated = match previous {
            None => current > Urgency::Normal,
            Some(old) => current > old,
        };

        escalated.then(|| UrgencyEscalation {
            gig_id: gig_id.clone(),
            previous,
            current,
        })
    }

    pub fn last_seen(&self, gig_id: &GigId) -> Option<Urgency> {
        self.last_seen.get(gig_id).copied()
    }

    /// Drop gigs no longer shown on this surface.
    pub fn retain(&mut self, mut keep: impl FnMut(&GigId) -> bool) {
        self.last_seen.retain(|id, _| keep(id));
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
