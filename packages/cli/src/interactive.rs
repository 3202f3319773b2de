//! Interactive mode: pick a tool, then answer its prompts.

use avy_dashboard::Dashboard;
use avy_dashboard_cli_utils::{DownloadBar, MultiProgress, prompt_location};
use avy_dashboard_source::registry;
use chrono::NaiveDate;
use dialoguer::{Input, MultiSelect, Select};

/// Top-level tool selection.
enum Tool {
    Serve,
    Render,
    Forecast,
    Activities,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Render, Self::Forecast, Self::Activities];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Render => "Render charts for a filter",
            Self::Forecast => "Show 12-month forecast",
            Self::Activities => "List activities",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails, the data cannot be loaded or the
/// selected tool fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Avalanche Incident Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Serve => serve(multi).await?,
        Tool::Render => render(&load(multi).await?)?,
        Tool::Forecast => {
            let dashboard = load(multi).await?;
            let chart = dashboard.forecast_chart().map_err(ToString::to_string)?;
            super::print_json(chart)?;
        }
        Tool::Activities => super::print_activities(&load(multi).await?),
    }

    Ok(())
}

async fn serve(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let progress = DownloadBar::start(multi, "Fetching incident data");
    // The server uses actix-web's runtime, so it runs on a blocking task
    // to avoid nesting runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(avy_dashboard_server::interactive::run(&progress))
    })
    .await??;
    Ok(())
}

async fn load(multi: &MultiProgress) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let source = registry::default_source()?;
    let location = prompt_location(&source)?;
    Ok(super::load_dashboard(multi, &source, &location).await?)
}

fn render(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let controls = dashboard.controls();

    let from = prompt_date("From (YYYY-MM-DD)", controls.min_date)?;
    let to = prompt_date("To (YYYY-MM-DD)", controls.max_date)?;

    let defaults = vec![true; controls.activities.len()];
    let selected = MultiSelect::new()
        .with_prompt("Primary activities (space to toggle)")
        .items(&controls.activities)
        .defaults(&defaults)
        .interact()?;
    let activities = selected
        .into_iter()
        .map(|i| controls.activities[i].clone())
        .collect();

    let zoom: f64 = Input::new()
        .with_prompt("Map zoom")
        .default(avy_dashboard_models::DEFAULT_ZOOM)
        .interact_text()?;

    let state = dashboard.filter_state(from, to, Some(activities), Some(zoom));
    super::print_json(&dashboard.render(&state))?;

    Ok(())
}

/// Prompts for a date, returning `None` when left blank.
fn prompt_date(
    prompt: &str,
    default: Option<NaiveDate>,
) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let text = input.interact_text()?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(NaiveDate::parse_from_str(text, "%Y-%m-%d")?))
}
