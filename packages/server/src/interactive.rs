//! Interactive mode for the server.
//!
//! Prompts for the bind address, port and data location before loading the
//! dashboard and starting the server.

use std::path::PathBuf;
use std::sync::Arc;

use avy_dashboard_source::DataLocation;
use avy_dashboard_source::progress::ProgressCallback;
use avy_dashboard_source::registry;
use dialoguer::{Confirm, Input};

use crate::ServerError;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Sets `BIND_ADDR` and `PORT` from the answers and delegates to
/// [`super::run`]. An empty data location means the source's published
/// URL; anything else is treated as a local file path.
///
/// # Errors
///
/// Returns [`ServerError`] if the data cannot be loaded or the server fails
/// to start.
#[allow(clippy::future_not_send)]
pub async fn run(progress: &Arc<dyn ProgressCallback>) -> Result<(), ServerError> {
    println!("Avalanche Dashboard Server");
    println!();

    let source = registry::default_source()?;

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let file: String = Input::new()
        .with_prompt("Local .xlsx file (leave empty to download)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    let location = if file.trim().is_empty() {
        DataLocation::from_source(&source)
    } else {
        DataLocation::File(PathBuf::from(file.trim()))
    };

    // SAFETY: single-threaded at this point; the variables are read once
    // when the server binds.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
    }

    if !Confirm::new()
        .with_prompt(format!(
            "Load {location} and serve on {bind_addr}:{port_str}?"
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run(&source, &location, progress).await
}
