#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Monthly incident count forecasting.
//!
//! [`build_forecast`] fits an ARIMA model to the monthly incident counts of
//! the full dataset and appends a forecast with confidence bounds for the
//! months that follow, producing the combined actual + forecast sequence
//! shown on the predictive modeling chart.

pub mod arima;

use avy_dashboard_analytics::aggregate::next_month_end;
use avy_dashboard_analytics_models::{ForecastRow, MonthlyCount};
use thiserror::Error;

use crate::arima::{Arima, ArimaOrder};

/// Errors that can occur while fitting or running the forecast model.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The model order is not supported.
    #[error("Unsupported model order {order}: moving-average terms are not implemented")]
    UnsupportedOrder {
        /// The rejected order.
        order: ArimaOrder,
    },

    /// The series is too short for the requested order.
    #[error("Insufficient data: {required} monthly observations required, got {actual}")]
    InsufficientData {
        /// Minimum number of observations for the order.
        required: usize,
        /// Number of observations provided.
        actual: usize,
    },

    /// The series contains NaN or infinity.
    #[error("Non-finite value at observation {index}")]
    NonFinite {
        /// Position of the first offending value.
        index: usize,
    },

    /// The lagged values are collinear, so the coefficients are not
    /// identifiable.
    #[error("Model fit failed: lagged values are collinear")]
    Singular,

    /// The confidence level is not strictly between 0 and 1.
    #[error("Invalid confidence level {confidence}: expected a value in (0, 1)")]
    InvalidConfidence {
        /// The rejected level.
        confidence: f64,
    },

    /// A forecast date fell outside the supported calendar range.
    #[error("Forecast date overflow after {last}")]
    DateOverflow {
        /// The last date that could be produced.
        last: chrono::NaiveDate,
    },
}

/// Parameters of the forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Model order.
    pub order: ArimaOrder,
    /// Number of months to forecast.
    pub horizon: usize,
    /// Confidence level of the bounds.
    pub confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::new(5, 1, 0),
            horizon: 12,
            confidence: 0.95,
        }
    }
}

/// Fits the configured model to `monthly` and returns the historical rows
/// followed by `config.horizon` forecast rows, ordered by date.
///
/// Forecast rows are dated at the month-ends of the months immediately
/// following the last historical month.
///
/// # Errors
///
/// Returns [`ForecastError`] if the model cannot be fitted to the series
/// (too few months, non-finite values, collinear lags) or the
/// configuration is invalid.
pub fn build_forecast(
    monthly: &[MonthlyCount],
    config: &ForecastConfig,
) -> Result<Vec<ForecastRow>, ForecastError> {
    #[allow(clippy::cast_precision_loss)]
    let series: Vec<f64> = monthly.iter().map(|m| m.avalanche_count as f64).collect();

    let model = Arima::fit(&series, config.order)?;
    let forecast = model.forecast(config.horizon, config.confidence)?;

    log::info!(
        "Fitted {} on {} months (sigma2 = {:.3}), forecasting {} months",
        config.order,
        monthly.len(),
        model.sigma2(),
        config.horizon
    );

    let Some(last) = monthly.last() else {
        return Err(ForecastError::InsufficientData {
            required: config.order.min_observations(),
            actual: 0,
        });
    };

    let mut rows: Vec<ForecastRow> = monthly.iter().copied().map(ForecastRow::historical).collect();
    rows.reserve(config.horizon);

    let mut date = last.date;
    for step in 0..config.horizon {
        date = next_month_end(date).ok_or(ForecastError::DateOverflow { last: date })?;
        rows.push(ForecastRow::predicted(
            date,
            forecast.mean[step],
            forecast.lower[step],
            forecast.upper[step],
        ));
    }

    Ok(rows)
}
