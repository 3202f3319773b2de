#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State centroid lookup types.
//!
//! A [`CentroidTable`] maps two-letter state abbreviations to a
//! representative point. The default table is built from
//! [`centroids::STATE_CENTROIDS`].

pub mod centroids;

use std::collections::BTreeMap;

use avy_dashboard_incident_models::Coordinates;
use serde::{Deserialize, Serialize};

/// Immutable mapping from state abbreviation to a representative point.
///
/// Keys are stored uppercase; lookups trim and uppercase their input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidTable {
    entries: BTreeMap<String, Coordinates>,
}

impl CentroidTable {
    /// Builds a table from `(abbreviation, coordinates)` pairs.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(abbr, coords)| (normalize(abbr.as_ref()), coords))
                .collect(),
        }
    }

    /// The geographic centers of the 50 US states + DC.
    #[must_use]
    pub fn us_states() -> Self {
        Self::from_entries(
            centroids::STATE_CENTROIDS
                .iter()
                .map(|(abbr, lat, lon)| (*abbr, Coordinates::new(*lat, *lon))),
        )
    }

    /// Returns the centroid for `state`, if the table has one.
    #[must_use]
    pub fn get(&self, state: &str) -> Option<Coordinates> {
        self.entries.get(&normalize(state)).copied()
    }

    /// Number of states in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CentroidTable {
    fn default() -> Self {
        Self::us_states()
    }
}

fn normalize(abbr: &str) -> String {
    abbr.trim().to_uppercase()
}
