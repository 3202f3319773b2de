#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the avalanche dashboard.
//!
//! The dashboard is loaded once before the server binds; every worker then
//! shares the same read-only [`Dashboard`] and renders chart payloads on
//! request.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use avy_dashboard::{Dashboard, DashboardError};
use avy_dashboard_source::progress::ProgressCallback;
use avy_dashboard_source::source_def::SourceDefinition;
use avy_dashboard_source::{DataLocation, SourceError};

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The source definition could not be resolved.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The dashboard could not be initialized.
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// The HTTP server failed to bind or run.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// The loaded dashboard.
    pub dashboard: Arc<Dashboard>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error))
            .route("/health", web::get().to(handlers::health))
            .route("/controls", web::get().to(handlers::controls))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/forecast", web::get().to(handlers::forecast)),
    );
}

/// Bind address and port from `BIND_ADDR` and `PORT`, defaulting to
/// `127.0.0.1:8080`.
#[must_use]
pub fn bind_config() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (bind_addr, port)
}

/// Loads the dashboard from `location` and serves it.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the data cannot be loaded or the server
/// fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run(
    source: &SourceDefinition,
    location: &DataLocation,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(), ServerError> {
    log::info!("Loading {} from {location}...", source.name);
    let dashboard = Dashboard::load(source, location, progress).await?;
    run_server(Arc::new(dashboard)).await?;
    Ok(())
}

/// Serves an already-initialized dashboard.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(dashboard: Arc<Dashboard>) -> std::io::Result<()> {
    let state = web::Data::new(AppState { dashboard });
    let (bind_addr, port) = bind_config();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use avy_dashboard_forecast::ForecastConfig;
    use avy_dashboard_geography_models::CentroidTable;
    use avy_dashboard_incident_models::{Coordinates, Incident};
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;

    fn incident(y: i32, m: u32, d: u32, activity: &str, killed: u32) -> Incident {
        Incident::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            activity,
            "CO",
            "Jones Pass",
            Coordinates::new(39.77, -105.91),
            killed,
        )
    }

    fn small_dashboard() -> Dashboard {
        Dashboard::from_incidents(
            vec![
                incident(2020, 1, 5, "Skiing", 1),
                incident(2020, 1, 20, "Hiking", 0),
                incident(2020, 2, 3, "Skiing", 2),
            ],
            &CentroidTable::us_states(),
            &ForecastConfig::default(),
        )
    }

    fn seasonal_dashboard() -> Dashboard {
        let mut incidents = Vec::new();
        for year in 2015..2020i32 {
            for month in 1..=12u32 {
                let count = match month {
                    1 | 2 => 4,
                    3 | 12 => 2 + year.unsigned_abs() % 2,
                    _ => 1,
                };
                for day in 1..=count {
                    incidents.push(incident(year, month, day, "Skiing", day % 2));
                }
            }
        }
        Dashboard::from_incidents(
            incidents,
            &CentroidTable::us_states(),
            &ForecastConfig::default(),
        )
    }

    macro_rules! app {
        ($dashboard:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        dashboard: Arc::new($dashboard),
                    }))
                    .configure(configure),
            )
            .await
        };
    }

    macro_rules! get_json {
        ($app:expr, $uri:expr) => {{
            let resp =
                test::call_service(&$app, test::TestRequest::get().uri($uri).to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/health");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn controls_list_activities_and_bounds() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/controls");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activities"], serde_json::json!(["Skiing", "Hiking"]));
        assert_eq!(body["minDate"], "2020-01-05");
        assert_eq!(body["maxDate"], "2020-02-03");
    }

    #[actix_web::test]
    async fn dashboard_defaults_to_everything() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/dashboard");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["incidentCount"], 3);
        assert_eq!(body["map"]["zoom"], 2.0);
        assert_eq!(body["heatmap"]["radius"], 10);
        assert_eq!(body["histogram"]["buckets"].as_array().unwrap().len(), 12);
    }

    #[actix_web::test]
    async fn dashboard_applies_query_filter() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(
            app,
            "/api/dashboard?from=2020-01-01&to=2020-01-31&activities=Skiing&zoom=5"
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["incidentCount"], 1);
        assert_eq!(body["map"]["zoom"], 5.0);
        assert_eq!(body["map"]["points"][0]["date"], "Sun, 05 Jan 2020");
        assert_eq!(
            body["timeSeries"]["points"],
            serde_json::json!([{ "date": "2020-01-05", "killed": 1 }])
        );
    }

    #[actix_web::test]
    async fn empty_activity_list_selects_nothing() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/dashboard?activities=");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["incidentCount"], 0);
        assert!(body["map"]["points"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn inverted_range_is_empty_not_an_error() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/dashboard?from=2020-03-01&to=2020-01-01");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["incidentCount"], 0);
    }

    #[actix_web::test]
    async fn malformed_date_is_a_bad_request() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/dashboard?from=January");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "badRequest");
    }

    #[actix_web::test]
    async fn non_numeric_zoom_is_a_json_bad_request() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/dashboard?zoom=wide");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "badRequest");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn forecast_failure_is_a_server_error() {
        let app = app!(small_dashboard());
        let (status, body) = get_json!(app, "/api/forecast");

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "forecast");
        assert!(body["error"].as_str().unwrap().contains("Insufficient data"));
    }

    #[actix_web::test]
    async fn forecast_returns_history_and_twelve_months() {
        let app = app!(seasonal_dashboard());
        let (status, body) = get_json!(app, "/api/forecast");

        assert_eq!(status, StatusCode::OK);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 60 + 12);
        assert_eq!(rows[60]["date"], "2020-01-31");
        assert!(rows[60]["avalancheCount"].is_null());
        assert!(rows[60]["forecast"].is_number());
        assert_eq!(body["confidence"], 0.95);
    }
}
