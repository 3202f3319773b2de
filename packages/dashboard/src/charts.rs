//! Chart payload builders.
//!
//! Each builder takes the already-filtered incidents, so a redraw filters
//! once and shares the subset between all four charts.

use avy_dashboard_analytics::aggregate::{fatalities_by_date, month_histogram};
use avy_dashboard_analytics_models::ForecastRow;
use avy_dashboard_incident_models::Incident;
use avy_dashboard_models::{
    DEFAULT_ZOOM, FORECAST_TITLE, ForecastChart, HEATMAP_RADIUS, HEATMAP_TITLE, HISTOGRAM_TITLE,
    HeatmapChart, HeatmapPoint, HistogramChart, MAP_CENTER, MAP_DATE_FORMAT, MAP_TITLE, MapChart,
    MapPoint, TIME_SERIES_TITLE, TimeSeriesChart,
};

/// Scatter map centered on [`MAP_CENTER`] at `zoom`.
#[must_use]
pub fn map_chart(incidents: &[&Incident], zoom: f64) -> MapChart {
    MapChart {
        title: MAP_TITLE.to_string(),
        center: MAP_CENTER,
        zoom,
        points: incidents
            .iter()
            .map(|i| MapPoint {
                latitude: i.latitude,
                longitude: i.longitude,
                location: i.location.clone(),
                date: i.date.format(MAP_DATE_FORMAT).to_string(),
            })
            .collect(),
    }
}

/// Fatality-weighted density map.
///
/// The heatmap always opens at [`DEFAULT_ZOOM`]; only the scatter map keeps
/// the user's zoom.
#[must_use]
pub fn heatmap_chart(incidents: &[&Incident]) -> HeatmapChart {
    HeatmapChart {
        title: HEATMAP_TITLE.to_string(),
        center: MAP_CENTER,
        zoom: DEFAULT_ZOOM,
        radius: HEATMAP_RADIUS,
        points: incidents
            .iter()
            .map(|i| HeatmapPoint {
                latitude: i.latitude,
                longitude: i.longitude,
                weight: i.killed,
            })
            .collect(),
    }
}

/// Incident counts per month of the year, January first.
#[must_use]
pub fn histogram_chart(incidents: &[&Incident]) -> HistogramChart {
    HistogramChart {
        title: HISTOGRAM_TITLE.to_string(),
        x_axis_title: "Month".to_string(),
        buckets: month_histogram(incidents.iter().copied()),
    }
}

/// Total fatalities per incident date.
#[must_use]
pub fn time_series_chart(incidents: &[&Incident]) -> TimeSeriesChart {
    TimeSeriesChart {
        title: TIME_SERIES_TITLE.to_string(),
        points: fatalities_by_date(incidents.iter().copied()),
    }
}

/// Wraps the actual and forecast rows with their confidence level.
#[must_use]
pub fn forecast_chart(rows: Vec<ForecastRow>, confidence: f64) -> ForecastChart {
    ForecastChart {
        title: FORECAST_TITLE.to_string(),
        confidence,
        rows,
    }
}
