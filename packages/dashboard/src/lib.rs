#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]
#![warn(missing_docs)]

//! The avalanche dashboard.
//!
//! [`Dashboard::load`] is the one-time initialization step: fetch the
//! workbook, repair unknown coordinates, freeze the collection into a
//! [`Dataset`] and fit the forecast. After that the dashboard is read-only
//! and [`Dashboard::render`] is a pure function of the filter state, so a
//! single instance can be shared between server workers behind an `Arc`.

pub mod charts;

use std::sync::Arc;

use avy_dashboard_analytics::Dataset;
use avy_dashboard_analytics::aggregate::monthly_counts;
use avy_dashboard_forecast::{ForecastConfig, ForecastError, build_forecast};
use avy_dashboard_geography::{RepairStats, repair_coordinates};
use avy_dashboard_geography_models::CentroidTable;
use avy_dashboard_incident_models::{DateRange, Incident, IncidentFilter};
use avy_dashboard_models::{DashboardCharts, DashboardControls, FilterState, ForecastChart};
use avy_dashboard_source::progress::ProgressCallback;
use avy_dashboard_source::source_def::SourceDefinition;
use avy_dashboard_source::{DataLocation, SourceError, load_incidents};
use chrono::NaiveDate;

/// Errors that prevent the dashboard from starting.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The incident data could not be loaded.
    #[error("Failed to load incident data: {0}")]
    Source(#[from] SourceError),
}

/// Loaded, repaired incident data and the precomputed forecast.
#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    repair: RepairStats,
    forecast: Result<ForecastChart, ForecastError>,
}

impl Dashboard {
    /// Loads the incidents from `location` and initializes the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Source`] if the workbook cannot be fetched
    /// or decoded. A forecast failure is not an error here; it is reported
    /// by [`Self::forecast_chart`].
    pub async fn load(
        source: &SourceDefinition,
        location: &DataLocation,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, DashboardError> {
        let incidents = load_incidents(source, location, progress).await?;
        Ok(Self::from_incidents(
            incidents,
            &CentroidTable::us_states(),
            &ForecastConfig::default(),
        ))
    }

    /// Initializes the dashboard from already-loaded incidents.
    #[must_use]
    pub fn from_incidents(
        mut incidents: Vec<Incident>,
        centroids: &CentroidTable,
        config: &ForecastConfig,
    ) -> Self {
        let repair = repair_coordinates(&mut incidents, centroids);
        let dataset = Dataset::new(incidents);

        let forecast = build_forecast(&monthly_counts(dataset.incidents()), config)
            .map(|rows| charts::forecast_chart(rows, config.confidence));
        if let Err(e) = &forecast {
            log::error!("Forecast unavailable: {e}");
        }

        log::info!(
            "Dashboard ready: {} incidents, {} activities",
            dataset.len(),
            dataset.activities().len()
        );

        Self {
            dataset,
            repair,
            forecast,
        }
    }

    /// The repaired incidents every view is computed from.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Outcome of the coordinate repair run during initialization.
    #[must_use]
    pub const fn repair_stats(&self) -> RepairStats {
        self.repair
    }

    /// Activity choices and date bounds of the filter controls.
    #[must_use]
    pub fn controls(&self) -> DashboardControls {
        let range = self.dataset.date_range();
        DashboardControls {
            activities: self
                .dataset
                .activities()
                .into_iter()
                .map(str::to_string)
                .collect(),
            min_date: range.map(|r| r.start),
            max_date: range.map(|r| r.end),
        }
    }

    /// The initial control state: every activity over the full date range.
    ///
    /// For an empty dataset the filter selects nothing.
    #[must_use]
    pub fn initial_state(&self) -> FilterState {
        FilterState::new(self.dataset.select_all().unwrap_or_else(|| {
            IncidentFilter::new(
                DateRange::new(NaiveDate::MIN, NaiveDate::MAX),
                Vec::<String>::new(),
            )
        }))
    }

    /// Builds a filter state from optional control values, taking anything
    /// left unset from [`Self::initial_state`].
    ///
    /// `Some` of an empty activity list selects nothing.
    #[must_use]
    pub fn filter_state(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        activities: Option<Vec<String>>,
        zoom: Option<f64>,
    ) -> FilterState {
        let initial = self.initial_state();
        let range = DateRange::new(
            from.unwrap_or(initial.filter.range.start),
            to.unwrap_or(initial.filter.range.end),
        );
        let filter = match activities {
            Some(activities) => IncidentFilter::new(range, activities),
            None => IncidentFilter {
                range,
                activities: initial.filter.activities,
            },
        };

        let state = FilterState::new(filter);
        match zoom {
            Some(zoom) => state.with_zoom(zoom),
            None => state,
        }
    }

    /// Builds the four filter-driven charts for `state`.
    ///
    /// A filter matching nothing yields empty charts.
    #[must_use]
    pub fn render(&self, state: &FilterState) -> DashboardCharts {
        let subset = self.dataset.filter(&state.filter);

        log::debug!(
            "Rendering {} of {} incidents ({} to {}, {} activities)",
            subset.len(),
            self.dataset.len(),
            state.filter.range.start,
            state.filter.range.end,
            state.filter.activities.len()
        );

        DashboardCharts {
            incident_count: subset.len(),
            map: charts::map_chart(&subset, state.zoom),
            heatmap: charts::heatmap_chart(&subset),
            histogram: charts::histogram_chart(&subset),
            time_series: charts::time_series_chart(&subset),
        }
    }

    /// The predictive modeling chart, or the reason it could not be built.
    ///
    /// # Errors
    ///
    /// Returns the [`ForecastError`] recorded during initialization.
    pub fn forecast_chart(&self) -> Result<&ForecastChart, &ForecastError> {
        self.forecast.as_ref()
    }
}

/// Splits a comma-separated activity list, dropping blank entries.
#[must_use]
pub fn split_activities(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
