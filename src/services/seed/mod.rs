//! Loading gig records from JSON fixtures.
//!
//! Stands in for the external gig store: mock data and backend exports are
//! both a JSON array of gig records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Error as SerdeError;

use crate::models::gig::Gig;
use crate::services::lifecycle::GigBuckets;

pub fn load_gigs(path: &Path) -> Result<Vec<Gig>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read gigs from {}", path.display()))?;
    parse_gigs(&data).map_err(|err| map_deser_error(err, path))
}

pub fn parse_gigs(data: &str) -> Result<Vec<Gig>, SerdeError> {
    serde_json::from_str(data)
}

/// Load a fixture and partition it into buckets by each record's status.
pub fn load_buckets(path: &Path) -> Result<GigBuckets> {
    let gigs = load_gigs(path)?;
    log::info!("Loaded {} gig(s) from {}", gigs.len(), path.display());
    Ok(GigBuckets::from_gigs(gigs))
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("failed to deserialize gigs from {}", path.display()))
}
