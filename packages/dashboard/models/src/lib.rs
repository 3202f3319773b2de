#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]
#![warn(missing_docs)]

//! Chart payload and filter state types for the avalanche dashboard.
//!
//! Each chart is a plain data payload (points plus title and map settings)
//! that a front end can draw without further computation. All types
//! serialize to camelCase JSON.

use avy_dashboard_analytics_models::{FatalityPoint, ForecastRow, MonthHistogramBucket};
use avy_dashboard_incident_models::{Coordinates, IncidentFilter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Map center used by both map charts (north-central Colorado).
pub const MAP_CENTER: Coordinates = Coordinates::new(39.76, -105.02);

/// Initial map zoom level.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Heatmap kernel radius in pixels.
pub const HEATMAP_RADIUS: u32 = 10;

/// `strftime` format of the dates shown when hovering a map point.
pub const MAP_DATE_FORMAT: &str = "%a, %d %b %Y";

/// Title of the scatter map.
pub const MAP_TITLE: &str = "Accident Map";
/// Title of the fatality heatmap.
pub const HEATMAP_TITLE: &str = "Accident Heatmap";
/// Title of the month-of-year histogram.
pub const HISTOGRAM_TITLE: &str = "Monthly Accident Histogram";
/// Title of the fatalities time series.
pub const TIME_SERIES_TITLE: &str = "Avalanche Fatalities Over Time";
/// Title of the actual vs forecast chart.
pub const FORECAST_TITLE: &str = "Actual vs Forecasted Avalanche Counts";

/// The two filter controls plus the map zoom to keep across redraws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Date range and activity selection.
    pub filter: IncidentFilter,
    /// Zoom of the previous map, reapplied on redraw.
    pub zoom: f64,
}

impl FilterState {
    /// A state with the default zoom.
    #[must_use]
    pub const fn new(filter: IncidentFilter) -> Self {
        Self {
            filter,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// Replaces the zoom. Non-finite values fall back to the default.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = if zoom.is_finite() { zoom } else { DEFAULT_ZOOM };
        self
    }
}

/// Options and initial values of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardControls {
    /// Distinct activities in order of first appearance. All are selected
    /// initially.
    pub activities: Vec<String>,
    /// Earliest incident date; `None` for an empty dataset.
    pub min_date: Option<NaiveDate>,
    /// Latest incident date; `None` for an empty dataset.
    pub max_date: Option<NaiveDate>,
}

/// A single scatter-map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Marker latitude.
    pub latitude: f64,
    /// Marker longitude.
    pub longitude: f64,
    /// Hover text: the incident location.
    pub location: String,
    /// Hover text: the date formatted with [`MAP_DATE_FORMAT`].
    pub date: String,
}

/// Scatter map of the filtered incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapChart {
    /// Chart title, [`MAP_TITLE`].
    pub title: String,
    /// Initial map center.
    pub center: Coordinates,
    /// Zoom carried over from the previous map.
    pub zoom: f64,
    /// One marker per filtered incident with coordinates.
    pub points: Vec<MapPoint>,
}

/// A heatmap sample weighted by fatalities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPoint {
    /// Sample latitude.
    pub latitude: f64,
    /// Sample longitude.
    pub longitude: f64,
    /// `Killed` of the incident.
    pub weight: u32,
}

/// Fatality density map of the filtered incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapChart {
    /// Chart title, [`HEATMAP_TITLE`].
    pub title: String,
    /// Initial map center.
    pub center: Coordinates,
    /// Zoom carried over from the previous map.
    pub zoom: f64,
    /// Kernel radius in pixels.
    pub radius: u32,
    /// One sample per filtered incident with coordinates.
    pub points: Vec<HeatmapPoint>,
}

/// Incidents per month of the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramChart {
    /// Chart title, [`HISTOGRAM_TITLE`].
    pub title: String,
    /// Label of the month axis.
    pub x_axis_title: String,
    /// Always twelve buckets, January first.
    pub buckets: Vec<MonthHistogramBucket>,
}

/// Fatalities per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesChart {
    /// Chart title, [`TIME_SERIES_TITLE`].
    pub title: String,
    /// Sorted by date ascending.
    pub points: Vec<FatalityPoint>,
}

/// Monthly counts of the full dataset followed by the forecast months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastChart {
    /// Chart title, [`FORECAST_TITLE`].
    pub title: String,
    /// Confidence level of the bounds.
    pub confidence: f64,
    /// Actual months first, then the forecast months.
    pub rows: Vec<ForecastRow>,
}

/// The four filter-driven charts of the data analysis view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    /// Incidents matching the filter.
    pub incident_count: usize,
    /// Scatter map.
    pub map: MapChart,
    /// Fatality heatmap.
    pub heatmap: HeatmapChart,
    /// Month-of-year histogram.
    pub histogram: HistogramChart,
    /// Fatalities over time.
    pub time_series: TimeSeriesChart,
}
