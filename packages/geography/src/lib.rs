#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate repair for incidents recorded without a location.
//!
//! The accident dataset marks unknown locations with `(0, 0)`. Those rows
//! are moved to their state's centroid so they still show up on the map in
//! roughly the right place. Rows whose state has no centroid keep the
//! sentinel and stay in the collection.

use avy_dashboard_geography_models::CentroidTable;
use avy_dashboard_incident_models::Incident;

/// Outcome of a [`repair_coordinates`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Rows moved from `(0, 0)` to their state's centroid.
    pub repaired: usize,
    /// Rows left at `(0, 0)` because their state has no centroid.
    pub unresolved: usize,
}

/// Replaces `(0, 0)` coordinates with the centroid of the incident's state.
///
/// Rows with any non-zero coordinate are left untouched, which makes the
/// pass idempotent: repaired rows no longer carry the sentinel (unless the
/// centroid itself is `(0, 0)`, in which case rewriting it is a no-op).
pub fn repair_coordinates(incidents: &mut [Incident], centroids: &CentroidTable) -> RepairStats {
    let mut stats = RepairStats::default();

    for incident in incidents
        .iter_mut()
        .filter(|i| i.coordinates().is_unknown())
    {
        if let Some(centroid) = centroids.get(&incident.state) {
            incident.set_coordinates(centroid);
            stats.repaired += 1;
        } else {
            log::debug!(
                "No centroid for state '{}' ({} on {}), keeping (0, 0)",
                incident.state,
                incident.location,
                incident.date
            );
            stats.unresolved += 1;
        }
    }

    log::info!(
        "Coordinate repair: {} repaired, {} unresolved",
        stats.repaired,
        stats.unresolved
    );

    stats
}
