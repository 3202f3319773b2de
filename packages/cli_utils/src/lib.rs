#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the avalanche dashboard.
//!
//! [`init_logger`] must run before any bar is created: it routes `log`
//! output through `indicatif-log-bridge` so log lines never tear the
//! [`DownloadBar`]. [`prompt_location`] is the interactive choice between
//! downloading the workbook and reading a local copy.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use avy_dashboard_source::DataLocation;
use avy_dashboard_source::progress::ProgressCallback;
use avy_dashboard_source::source_def::SourceDefinition;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg} {bytes}";
const BAR_TEMPLATE: &str =
    "  {msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} {binary_bytes_per_sec} [{eta}]";

/// Byte-counting download indicator backed by `indicatif`.
///
/// Starts as a spinner showing the bytes received so far and becomes a
/// full bar with throughput and ETA once the server reports a content
/// length.
pub struct DownloadBar {
    bar: ProgressBar,
    sized: ProgressStyle,
}

impl DownloadBar {
    /// Adds a download bar to `multi`.
    #[must_use]
    pub fn start(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        Arc::new(Self::new(multi, message))
    }

    fn new(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        let sized = ProgressStyle::with_template(BAR_TEMPLATE)
            .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("=> "));

        Self { bar, sized }
    }
}

impl ProgressCallback for DownloadBar {
    /// Switches to the sized bar. Also called when a download restarts, so
    /// bytes from an abandoned attempt are discarded.
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.sized.clone());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Installs `pretty_env_logger` (configured from `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] every bar must be added to. A logger that
/// is already installed is left in place.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let max_level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }

    multi
}

/// Asks whether to download the workbook or read a local copy.
///
/// # Errors
///
/// Returns [`dialoguer::Error`] if the terminal cannot be read.
pub fn prompt_location(source: &SourceDefinition) -> Result<DataLocation, dialoguer::Error> {
    let choice = Select::new()
        .with_prompt("Incident data")
        .items(&[
            format!("Download from {}", source.url),
            "Read a local .xlsx file".to_string(),
        ])
        .default(0)
        .interact()?;

    if choice == 0 {
        return Ok(DataLocation::from_source(source));
    }

    let path: String = Input::new()
        .with_prompt("Path to workbook")
        .interact_text()?;

    Ok(DataLocation::File(PathBuf::from(path.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden_bar() -> DownloadBar {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        DownloadBar::new(&multi, "Fetching")
    }

    #[test]
    fn set_total_sizes_the_bar() {
        let bar = hidden_bar();
        assert_eq!(bar.bar.length(), None);

        bar.set_total(1_024);
        bar.inc(256);

        assert_eq!(bar.bar.length(), Some(1_024));
        assert_eq!(bar.bar.position(), 256);
    }

    #[test]
    fn restarted_download_discards_earlier_bytes() {
        let bar = hidden_bar();
        bar.set_total(100);
        bar.inc(80);

        bar.set_total(100);
        bar.inc(30);

        assert_eq!(bar.bar.position(), 30);
        assert_eq!(bar.bar.length(), Some(100));
    }
}
