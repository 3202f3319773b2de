//! HTTP handler functions for the avalanche dashboard API.

use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use avy_dashboard::{Dashboard, split_activities};
use avy_dashboard_models::FilterState;
use avy_dashboard_server_models::{ApiError, ApiHealth, DashboardQueryParams};
use chrono::NaiveDate;

use crate::AppState;

/// Answers query strings that fail to deserialize with the same JSON body
/// as any other rejected filter.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {err}");
    let response = HttpResponse::BadRequest().json(ApiError::new(err.to_string(), "badRequest"));
    InternalError::from_response(err, response).into()
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/controls`
///
/// Returns the activity choices and date bounds of the filter controls.
pub async fn controls(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.controls())
}

/// `GET /api/dashboard`
///
/// Renders the map, heatmap, histogram and time series for the requested
/// filter state.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    match filter_state(&state.dashboard, &params) {
        Ok(filter_state) => HttpResponse::Ok().json(state.dashboard.render(&filter_state)),
        Err(message) => {
            log::debug!("Rejected dashboard query: {message}");
            HttpResponse::BadRequest().json(ApiError::new(message, "badRequest"))
        }
    }
}

/// `GET /api/forecast`
///
/// Returns the predictive modeling chart computed at startup.
pub async fn forecast(state: web::Data<AppState>) -> HttpResponse {
    match state.dashboard.forecast_chart() {
        Ok(chart) => HttpResponse::Ok().json(chart),
        Err(e) => {
            log::error!("Forecast requested but unavailable: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e.to_string(), "forecast"))
        }
    }
}

/// Builds a [`FilterState`] from query parameters, defaulting missing
/// values to the dashboard's initial state.
fn filter_state(dashboard: &Dashboard, params: &DashboardQueryParams) -> Result<FilterState, String> {
    let from = params.from.as_deref().map(parse_date).transpose()?;
    let to = params.to.as_deref().map(parse_date).transpose()?;
    let activities = params.activities.as_deref().map(split_activities);

    Ok(dashboard.filter_state(from, to, activities, params.zoom))
}

/// Parses a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}
