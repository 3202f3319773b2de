#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the avalanche dashboard server.
//!
//! Chart payloads are served as-is from the dashboard models; this crate
//! only holds the envelope types specific to HTTP.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Failure category, e.g. `"forecast"` or `"badRequest"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>, kind: &str) -> Self {
        Self {
            error: error.into(),
            kind: Some(kind.to_string()),
        }
    }
}

/// Query parameters for the dashboard endpoint.
///
/// Dates are `YYYY-MM-DD`. `activities` is comma separated; omitting it
/// selects every activity while an empty value selects none.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// First date of the range. Defaults to the earliest incident.
    pub from: Option<String>,
    /// Last date of the range. Defaults to the latest incident.
    pub to: Option<String>,
    /// Comma-separated activities.
    pub activities: Option<String>,
    /// Map zoom to keep.
    pub zoom: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_is_omitted_when_absent() {
        let body = ApiError {
            error: "boom".to_string(),
            kind: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"boom"}"#
        );

        let body = ApiError::new("no fit", "forecast");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"no fit","kind":"forecast"}"#
        );
    }
}
