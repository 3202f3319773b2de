#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Avalanche incident data loader.
//!
//! Downloads the incident workbook described by a [`SourceDefinition`] (or
//! reads a local copy) and decodes it into [`Incident`] records. Coordinates
//! are returned as found; filling in unknown locations is the job of the
//! geography crate.

pub mod progress;
pub mod registry;
pub mod retry;
pub mod source_def;
pub mod xlsx;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use avy_dashboard_incident_models::Incident;

use crate::progress::ProgressCallback;
use crate::source_def::SourceDefinition;

/// Errors that can occur while loading incident data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// I/O error reading a local workbook.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be decoded.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// The workbook has no worksheets.
    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    /// A mapped column header is absent from the worksheet.
    #[error("Missing column '{column}' in worksheet header")]
    MissingColumn {
        /// Configured header name.
        column: String,
    },

    /// A source definition could not be parsed.
    #[error("Invalid source definition: {0}")]
    Toml(#[from] toml::de::Error),

    /// No source definition has the requested id.
    #[error("Unknown source '{id}'")]
    UnknownSource {
        /// Requested id.
        id: String,
    },
}

/// Where to read the workbook from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// Download over HTTP.
    Url(String),
    /// Read a local `.xlsx` file.
    File(PathBuf),
}

impl DataLocation {
    /// The source's published download URL.
    #[must_use]
    pub fn from_source(source: &SourceDefinition) -> Self {
        Self::Url(source.url.clone())
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads the raw workbook bytes from `location`.
///
/// # Errors
///
/// Returns [`SourceError`] if the download fails after the source's retry
/// budget, or the local file cannot be read.
pub async fn fetch_workbook(
    source: &SourceDefinition,
    location: &DataLocation,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<u8>, SourceError> {
    match location {
        DataLocation::Url(url) => {
            log::info!("[{}] Downloading {url}", source.id);
            progress.set_message(format!("Downloading {}", source.name));

            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(source.timeout_secs))
                .build()?;
            let bytes = retry::download_bytes(|| client.get(url), source.max_retries, progress).await?;

            progress.finish(format!("[{}] downloaded {} bytes", source.id, bytes.len()));
            Ok(bytes)
        }
        DataLocation::File(path) => {
            log::info!("[{}] Reading {}", source.id, path.display());
            let bytes = tokio::fs::read(path).await?;
            progress.finish_and_clear();
            Ok(bytes)
        }
    }
}

/// Fetches and decodes the incident workbook.
///
/// # Errors
///
/// Returns [`SourceError`] if the workbook cannot be fetched or decoded.
pub async fn load_incidents(
    source: &SourceDefinition,
    location: &DataLocation,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<Incident>, SourceError> {
    let bytes = fetch_workbook(source, location, progress).await?;
    let parsed = xlsx::parse_workbook(bytes, source)?;

    if parsed.skipped > 0 {
        log::warn!(
            "[{}] Skipped {} rows without a readable date",
            source.id,
            parsed.skipped
        );
    }

    Ok(parsed.incidents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_defaults_to_source_url() {
        let source = registry::default_source().unwrap();
        assert_eq!(
            DataLocation::from_source(&source),
            DataLocation::Url(source.url.clone())
        );
        assert_eq!(
            DataLocation::from_source(&source).to_string(),
            source.url
        );
    }

    #[tokio::test]
    async fn missing_local_file_is_an_io_error() {
        let source = registry::default_source().unwrap();
        let location = DataLocation::File(PathBuf::from("/nonexistent/avalanche/incidents.xlsx"));

        let err = load_incidents(&source, &location, &progress::null_progress())
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Io(_)));
    }

    /// Serves every connection with a fixed HTTP response and returns a
    /// workbook URL on that server.
    async fn serve_response(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{addr}/Accidents.xlsx")
    }

    fn source_without_retries() -> SourceDefinition {
        let mut source = registry::default_source().unwrap();
        source.max_retries = 0;
        source.timeout_secs = 5;
        source
    }

    #[tokio::test]
    async fn not_found_is_a_status_error() {
        let url = serve_response(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let err = fetch_workbook(
            &source_without_retries(),
            &DataLocation::Url(url.clone()),
            &progress::null_progress(),
        )
        .await
        .unwrap_err();

        assert!(
            matches!(&err, SourceError::Status { status: 404, url: failed } if *failed == url),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn server_error_is_fatal_once_retries_run_out() {
        let url = serve_response(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let err = load_incidents(
            &source_without_retries(),
            &DataLocation::Url(url),
            &progress::null_progress(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 503, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn successful_download_returns_the_body() {
        let url = serve_response(
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello",
        )
        .await;

        let bytes = fetch_workbook(
            &source_without_retries(),
            &DataLocation::Url(url),
            &progress::null_progress(),
        )
        .await
        .unwrap();

        assert_eq!(bytes, b"hello");
    }
}
