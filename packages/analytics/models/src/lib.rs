#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate and forecast row types.
//!
//! These are the outputs of the aggregation and forecast builders and the
//! building blocks of the dashboard chart payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Total fatalities on a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatalityPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Sum of `Killed` over every incident on `date`.
    pub killed: u64,
}

/// Number of incidents in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Last day of the month this bucket covers.
    pub date: NaiveDate,
    /// Incidents that occurred in the month.
    pub avalanche_count: u64,
}

/// Number of incidents that occurred in a given month of the year,
/// regardless of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHistogramBucket {
    /// Month number (1-12).
    pub month: u8,
    /// Incidents in that month.
    pub count: u64,
}

/// One row of the combined actual + forecast sequence.
///
/// Historical rows carry only `avalanche_count`; forecast rows carry only
/// `forecast` and its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRow {
    /// Month-end date of the row.
    pub date: NaiveDate,
    /// Observed incident count (historical rows only).
    pub avalanche_count: Option<u64>,
    /// Point forecast (forecast rows only).
    pub forecast: Option<f64>,
    /// Lower confidence bound (forecast rows only).
    pub lower_bound: Option<f64>,
    /// Upper confidence bound (forecast rows only).
    pub upper_bound: Option<f64>,
}

impl ForecastRow {
    /// A row carrying an observed monthly count.
    #[must_use]
    pub const fn historical(count: MonthlyCount) -> Self {
        Self {
            date: count.date,
            avalanche_count: Some(count.avalanche_count),
            forecast: None,
            lower_bound: None,
            upper_bound: None,
        }
    }

    /// A row carrying a point forecast and its confidence interval.
    #[must_use]
    pub const fn predicted(date: NaiveDate, forecast: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            avalanche_count: None,
            forecast: Some(forecast),
            lower_bound: Some(lower),
            upper_bound: Some(upper),
        }
    }

    /// Returns `true` for rows produced by the model rather than observed.
    #[must_use]
    pub const fn is_forecast(&self) -> bool {
        self.forecast.is_some()
    }
}
