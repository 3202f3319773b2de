#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine and aggregations over the avalanche incident collection.
//!
//! The collection is wrapped in an immutable [`Dataset`] handle once it has
//! been loaded and repaired. Every query is a pure function of that handle
//! and an [`IncidentFilter`], so the dashboard can be re-rendered for any
//! filter state without touching shared mutable data.

pub mod aggregate;
pub mod filter;

use std::collections::BTreeSet;

use avy_dashboard_incident_models::{DateRange, Incident, IncidentFilter};

/// Read-only handle to the loaded incident collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    incidents: Vec<Incident>,
}

impl Dataset {
    /// Wraps an already-cleaned incident collection.
    #[must_use]
    pub const fn new(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    /// All incidents, in load order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Returns `true` if the dataset holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Distinct `PrimaryActivity` values in order of first appearance.
    #[must_use]
    pub fn activities(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.incidents
            .iter()
            .map(|i| i.primary_activity.as_str())
            .filter(|activity| seen.insert(*activity))
            .collect()
    }

    /// Earliest and latest incident dates, or `None` for an empty dataset.
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        let start = self.incidents.iter().map(|i| i.date).min()?;
        let end = self.incidents.iter().map(|i| i.date).max()?;
        Some(DateRange::new(start, end))
    }

    /// A filter that selects every incident: the full date range and every
    /// activity. Matches the dashboard's initial control state.
    #[must_use]
    pub fn select_all(&self) -> Option<IncidentFilter> {
        Some(IncidentFilter::new(self.date_range()?, self.activities()))
    }

    /// Incidents satisfying `filter`. See [`filter::filter_incidents`].
    #[must_use]
    pub fn filter(&self, filter: &IncidentFilter) -> Vec<&Incident> {
        filter::filter_incidents(&self.incidents, filter)
    }
}

#[cfg(test)]
mod tests {
    use avy_dashboard_incident_models::Coordinates;
    use chrono::NaiveDate;

    use super::*;

    fn incident(y: i32, m: u32, d: u32, activity: &str) -> Incident {
        Incident::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            activity,
            "CO",
            "Loveland Pass",
            Coordinates::new(39.66, -105.88),
            1,
        )
    }

    #[test]
    fn activities_keep_first_seen_order() {
        let dataset = Dataset::new(vec![
            incident(2020, 1, 5, "Snowmobiler"),
            incident(2020, 1, 6, "Backcountry Tourer"),
            incident(2020, 1, 7, "Snowmobiler"),
            incident(2020, 1, 8, "Climber"),
        ]);
        assert_eq!(
            dataset.activities(),
            vec!["Snowmobiler", "Backcountry Tourer", "Climber"]
        );
    }

    #[test]
    fn date_range_spans_min_and_max() {
        let dataset = Dataset::new(vec![
            incident(2021, 3, 1, "Skiing"),
            incident(1951, 12, 30, "Skiing"),
            incident(2022, 6, 12, "Skiing"),
        ]);
        let range = dataset.date_range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(1951, 12, 30).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2022, 6, 12).unwrap());
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let dataset = Dataset::default();
        assert!(dataset.date_range().is_none());
        assert!(dataset.select_all().is_none());
        assert!(dataset.activities().is_empty());
    }

    #[test]
    fn select_all_matches_everything() {
        let dataset = Dataset::new(vec![
            incident(2020, 1, 5, "Skiing"),
            incident(2020, 2, 6, "Hiking"),
        ]);
        let filter = dataset.select_all().unwrap();
        assert_eq!(dataset.filter(&filter).len(), dataset.len());
    }
}
