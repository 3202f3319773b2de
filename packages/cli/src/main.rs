#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the avalanche incident dashboard.
//!
//! ```text
//! avy_dashboard serve
//! avy_dashboard render [--from 2015-01-01] [--to 2020-12-31] [--activities "Backcountry Tourer,Hybrid Tourer"] [--zoom 4]
//! avy_dashboard forecast
//! avy_dashboard activities
//! ```
//!
//! Every subcommand accepts `--file <path>` to read a local copy of the
//! workbook or `--url <url>` to download it from somewhere other than the
//! source's published location. Running with no subcommand enters
//! interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`avy_dashboard_cli_utils::init_logger`])
//! so that log lines and the download bar never fight for the terminal.

mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use avy_dashboard::Dashboard;
use avy_dashboard_cli_utils::{DownloadBar, MultiProgress};
use avy_dashboard_source::source_def::SourceDefinition;
use avy_dashboard_source::{DataLocation, registry};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "avy_dashboard",
    about = "Explore and forecast US avalanche incidents"
)]
struct Cli {
    /// Source definition to load
    #[arg(long, global = true, default_value = registry::DEFAULT_SOURCE_ID)]
    source: String,

    /// Download the workbook from this URL instead of the source's own
    #[arg(long, global = true, conflicts_with = "file")]
    url: Option<String>,

    /// Read the workbook from a local file
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard API server
    Serve,
    /// Print the chart payloads for a filter state as JSON
    Render {
        /// First day of the date range (YYYY-MM-DD), defaults to the earliest incident
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the date range (YYYY-MM-DD), defaults to the latest incident
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Comma-separated primary activities, defaults to all
        #[arg(long)]
        activities: Option<String>,
        /// Map zoom level
        #[arg(long)]
        zoom: Option<f64>,
    },
    /// Print the 12-month forecast chart as JSON
    Forecast,
    /// List the primary activities and date bounds in the data
    Activities,
}

impl Cli {
    /// Resolves the data location from `--file`, `--url` or the source.
    fn location(&self, source: &SourceDefinition) -> DataLocation {
        if let Some(path) = &self.file {
            DataLocation::File(path.clone())
        } else if let Some(url) = &self.url {
            DataLocation::Url(url.clone())
        } else {
            DataLocation::from_source(source)
        }
    }
}

/// Loads the dashboard behind a download bar.
async fn load_dashboard(
    multi: &MultiProgress,
    source: &SourceDefinition,
    location: &DataLocation,
) -> Result<Dashboard, avy_dashboard::DashboardError> {
    let progress = DownloadBar::start(multi, &format!("Fetching {}", source.name));
    let dashboard = Dashboard::load(source, location, &progress).await?;

    let repair = dashboard.repair_stats();
    log::info!(
        "Loaded {} incidents ({} coordinates repaired, {} unresolved)",
        dashboard.dataset().len(),
        repair.repaired,
        repair.unresolved
    );

    Ok(dashboard)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Serves a loaded dashboard on actix-web's own runtime.
async fn serve(dashboard: Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = Arc::new(dashboard);
    // actix-web needs its own system; running it on a blocking thread
    // avoids nesting it inside the tokio runtime.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(avy_dashboard_server::run_server(dashboard))
    })
    .await??;
    Ok(())
}

fn print_activities(dashboard: &Dashboard) {
    let controls = dashboard.controls();

    match (controls.min_date, controls.max_date) {
        (Some(min), Some(max)) => println!("Incidents from {min} to {max}"),
        _ => println!("No incidents loaded."),
    }

    for activity in &controls.activities {
        println!("  {activity}");
    }

    println!("\n{} activities", controls.activities.len());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = avy_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        return interactive::run(&multi).await;
    };

    let source = registry::find_source(&cli.source)?;
    let location = cli.location(&source);
    let dashboard = load_dashboard(&multi, &source, &location).await?;

    match command {
        Commands::Serve => serve(dashboard).await?,
        Commands::Render {
            from,
            to,
            activities,
            zoom,
        } => {
            let state = dashboard.filter_state(
                *from,
                *to,
                activities.as_deref().map(avy_dashboard::split_activities),
                *zoom,
            );
            print_json(&dashboard.render(&state))?;
        }
        Commands::Forecast => {
            let chart = dashboard.forecast_chart().map_err(ToString::to_string)?;
            print_json(chart)?;
        }
        Commands::Activities => print_activities(&dashboard),
    }

    Ok(())
}
