#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone avalanche dashboard API server.
//!
//! Reads the workbook from `AVY_DATA_FILE` when set, otherwise downloads
//! it from the default source.

use std::path::PathBuf;

use avy_dashboard_server::ServerError;
use avy_dashboard_source::progress::null_progress;
use avy_dashboard_source::{DataLocation, registry};

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let source = registry::default_source()?;
    let location = std::env::var("AVY_DATA_FILE")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map_or_else(
            || DataLocation::from_source(&source),
            |path| DataLocation::File(PathBuf::from(path)),
        );

    avy_dashboard_server::run(&source, &location, &null_progress()).await
}
