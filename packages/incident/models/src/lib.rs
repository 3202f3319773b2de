#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Avalanche incident record and filter predicate types.
//!
//! Every loader produces [`Incident`] records; every query over the loaded
//! collection is expressed as an [`IncidentFilter`].

use std::collections::BTreeSet;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// The `(0, 0)` sentinel the dataset uses for "location unknown".
    pub const UNKNOWN: Self = Self::new(0.0, 0.0);

    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are exactly zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unknown(self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// One recorded avalanche accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Calendar date of the accident.
    pub date: NaiveDate,
    /// Primary activity of the party involved (e.g. "Backcountry Tourer").
    pub primary_activity: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Free-text location description.
    pub location: String,
    /// Latitude. `0.0` together with a zero longitude means unknown.
    pub latitude: f64,
    /// Longitude. `0.0` together with a zero latitude means unknown.
    pub longitude: f64,
    /// Number of people killed.
    pub killed: u32,
    /// Month number (1-12).
    pub month: u8,
}

impl Incident {
    /// Creates an incident whose month is derived from `date`.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        primary_activity: impl Into<String>,
        state: impl Into<String>,
        location: impl Into<String>,
        coordinates: Coordinates,
        killed: u32,
    ) -> Self {
        Self {
            date,
            primary_activity: primary_activity.into(),
            state: state.into(),
            location: location.into(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            killed,
            month: u8::try_from(date.month()).unwrap_or_default(),
        }
    }

    /// Returns the incident's coordinates.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Overwrites the incident's coordinates.
    pub const fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.latitude = coordinates.latitude;
        self.longitude = coordinates.longitude;
    }
}

/// An inclusive calendar date interval.
///
/// A range with `start > end` is accepted and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First date included in the range.
    pub start: NaiveDate,
    /// Last date included in the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `date` lies within the range, both ends inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` if no date can satisfy the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// The dashboard's filter predicate: a date range and a set of allowed
/// activities, applied conjunctively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilter {
    /// Dates to include.
    pub range: DateRange,
    /// `PrimaryActivity` values to include. Empty matches nothing.
    pub activities: BTreeSet<String>,
}

impl IncidentFilter {
    /// Creates a filter over `range` allowing the given activities.
    #[must_use]
    pub fn new<I, S>(range: DateRange, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            range,
            activities: activities.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `incident` satisfies both predicates.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        self.range.contains(incident.date) && self.activities.contains(&incident.primary_activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_is_derived_from_date() {
        let incident = Incident::new(
            date(2021, 2, 6),
            "Skiing",
            "UT",
            "Millcreek Canyon",
            Coordinates::new(40.69, -111.7),
            4,
        );
        assert_eq!(incident.month, 2);
    }

    #[test]
    fn unknown_requires_both_components_zero() {
        assert!(Coordinates::UNKNOWN.is_unknown());
        assert!(!Coordinates::new(0.0, -105.0).is_unknown());
        assert!(!Coordinates::new(39.0, 0.0).is_unknown());
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::new(date(2020, 1, 1), date(2020, 1, 31));
        assert!(range.contains(date(2020, 1, 1)));
        assert!(range.contains(date(2020, 1, 31)));
        assert!(!range.contains(date(2019, 12, 31)));
        assert!(!range.contains(date(2020, 2, 1)));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = DateRange::new(date(2020, 2, 1), date(2020, 1, 1));
        assert!(range.is_empty());
        assert!(!range.contains(date(2020, 1, 15)));
    }

    #[test]
    fn filter_requires_both_predicates() {
        let incident = Incident::new(
            date(2020, 1, 5),
            "Skiing",
            "CO",
            "Berthoud Pass",
            Coordinates::UNKNOWN,
            1,
        );
        let range = DateRange::new(date(2020, 1, 1), date(2020, 1, 31));

        assert!(IncidentFilter::new(range, ["Skiing"]).matches(&incident));
        assert!(!IncidentFilter::new(range, ["Hiking"]).matches(&incident));
        assert!(!IncidentFilter::new(range, Vec::<String>::new()).matches(&incident));

        let later = DateRange::new(date(2020, 2, 1), date(2020, 2, 28));
        assert!(!IncidentFilter::new(later, ["Skiing"]).matches(&incident));
    }
}
