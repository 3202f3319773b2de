//! ARIMA(p, d, 0) estimation and forecasting.
//!
//! The series is differenced `d` times and an AR(p) model without intercept
//! is fitted to the differenced values by conditional least squares. Point
//! forecasts are produced by running the integrated AR polynomial
//! `phi(B) * (1 - B)^d` forward on the original levels; forecast standard
//! errors come from the psi weights of that same polynomial.

use crate::ForecastError;

/// Relative pivot size below which the normal equations are treated as
/// singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// The `(p, d, q)` order of an ARIMA model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive lags.
    pub p: usize,
    /// Differencing steps.
    pub d: usize,
    /// Moving-average terms. Only `0` is supported.
    pub q: usize,
}

impl ArimaOrder {
    /// Creates an order triple.
    #[must_use]
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Fewest observations [`Arima::fit`] accepts for this order: `d` values
    /// lost to differencing, `p` lost to lagging, and at least `p + 1`
    /// regression rows left over.
    #[must_use]
    pub const fn min_observations(&self) -> usize {
        self.d + 2 * self.p + 1
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// A fitted ARIMA(p, d, 0) model.
#[derive(Debug, Clone, PartialEq)]
pub struct Arima {
    order: ArimaOrder,
    ar_coeffs: Vec<f64>,
    sigma2: f64,
    history: Vec<f64>,
}

/// Point forecasts with standard errors and confidence bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Point forecast per step.
    pub mean: Vec<f64>,
    /// Forecast standard error per step.
    pub std_errors: Vec<f64>,
    /// Lower confidence bound per step.
    pub lower: Vec<f64>,
    /// Upper confidence bound per step.
    pub upper: Vec<f64>,
    /// Confidence level of the bounds (e.g. `0.95`).
    pub confidence: f64,
}

impl Arima {
    /// Fits the model to `data`.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::UnsupportedOrder`] if `order.q` is non-zero.
    /// * [`ForecastError::InsufficientData`] if `data` is shorter than
    ///   [`ArimaOrder::min_observations`].
    /// * [`ForecastError::NonFinite`] if `data` contains NaN or infinity.
    /// * [`ForecastError::Singular`] if the lagged values are collinear
    ///   (e.g. a constant or perfectly linear series).
    pub fn fit(data: &[f64], order: ArimaOrder) -> Result<Self, ForecastError> {
        if order.q != 0 {
            return Err(ForecastError::UnsupportedOrder { order });
        }

        let required = order.min_observations();
        if data.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: data.len(),
            });
        }

        if let Some(index) = data.iter().position(|x| !x.is_finite()) {
            return Err(ForecastError::NonFinite { index });
        }

        let differenced = difference(data, order.d);
        let p = order.p;
        let rows = differenced.len() - p;

        let ar_coeffs = if p == 0 {
            Vec::new()
        } else {
            let mut xtx = vec![vec![0.0; p]; p];
            let mut xty = vec![0.0; p];
            for t in p..differenced.len() {
                for i in 0..p {
                    let xi = differenced[t - i - 1];
                    xty[i] += xi * differenced[t];
                    for j in 0..p {
                        xtx[i][j] += xi * differenced[t - j - 1];
                    }
                }
            }
            solve(xtx, xty).ok_or(ForecastError::Singular)?
        };

        let rss: f64 = (p..differenced.len())
            .map(|t| {
                let predicted: f64 = ar_coeffs
                    .iter()
                    .enumerate()
                    .map(|(i, phi)| phi * differenced[t - i - 1])
                    .sum();
                (differenced[t] - predicted).powi(2)
            })
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let sigma2 = rss / rows as f64;

        log::debug!("{order} coefficients: {ar_coeffs:?}, sigma2 = {sigma2:.4}");

        Ok(Self {
            order,
            ar_coeffs,
            sigma2,
            history: data.to_vec(),
        })
    }

    /// The order the model was fitted with.
    #[must_use]
    pub const fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Estimated AR coefficients `phi_1..phi_p`.
    #[must_use]
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Estimated innovation variance.
    #[must_use]
    pub const fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Forecasts `steps` values past the end of the fitted series.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidConfidence`] unless
    /// `0 < confidence < 1`.
    pub fn forecast(&self, steps: usize, confidence: f64) -> Result<Forecast, ForecastError> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ForecastError::InvalidConfidence { confidence });
        }

        let coeffs = self.integrated_coefficients();

        let mut levels = self.history.clone();
        let mut mean = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next: f64 = coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c * levels[levels.len() - i - 1])
                .sum();
            levels.push(next);
            mean.push(next);
        }

        let psi = psi_weights(&coeffs, steps);
        let mut cumulative = 0.0;
        let std_errors: Vec<f64> = psi
            .iter()
            .map(|w| {
                cumulative += w * w;
                (self.sigma2 * cumulative).sqrt()
            })
            .collect();

        let z = normal_quantile(0.5 + confidence / 2.0);
        let lower = mean
            .iter()
            .zip(&std_errors)
            .map(|(m, se)| z.mul_add(-se, *m))
            .collect();
        let upper = mean
            .iter()
            .zip(&std_errors)
            .map(|(m, se)| z.mul_add(*se, *m))
            .collect();

        Ok(Forecast {
            mean,
            std_errors,
            lower,
            upper,
            confidence,
        })
    }

    /// Coefficients `c_1..c_{p+d}` of the level recursion
    /// `y_t = sum(c_i * y_{t-i}) + e_t`, i.e. the expansion of
    /// `phi(B) * (1 - B)^d`.
    fn integrated_coefficients(&self) -> Vec<f64> {
        // Polynomial in B with poly[0] = 1 and poly[i] = -phi_i.
        let mut poly: Vec<f64> = std::iter::once(1.0)
            .chain(self.ar_coeffs.iter().map(|phi| -phi))
            .collect();

        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, a) in poly.iter().enumerate() {
                next[i] += a;
                next[i + 1] -= a;
            }
            poly = next;
        }

        poly.iter().skip(1).map(|a| -a).collect()
    }
}

/// Applies `order` rounds of first differencing.
fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// First `count` psi weights of the MA(infinity) form of the recursion with
/// coefficients `coeffs`.
fn psi_weights(coeffs: &[f64], count: usize) -> Vec<f64> {
    let mut psi: Vec<f64> = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let value = coeffs
            .iter()
            .take(j)
            .enumerate()
            .map(|(i, c)| c * psi[j - i - 1])
            .sum();
        psi.push(value);
    }
    psi
}

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` if `a` is singular to working precision.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let scale = a
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= SINGULAR_TOLERANCE * scale {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                let delta = factor * a[col][k];
                a[row][k] -= delta;
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Inverse of the standard normal CDF (Acklam's rational approximation,
/// relative error below 1.2e-9).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    let tail = |q: f64| {
        let num = C[0]
            .mul_add(q, C[1])
            .mul_add(q, C[2])
            .mul_add(q, C[3])
            .mul_add(q, C[4])
            .mul_add(q, C[5]);
        let den = D[0]
            .mul_add(q, D[1])
            .mul_add(q, D[2])
            .mul_add(q, D[3])
            .mul_add(q, 1.0);
        num / den
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        let num = A[0]
            .mul_add(r, A[1])
            .mul_add(r, A[2])
            .mul_add(r, A[3])
            .mul_add(r, A[4])
            .mul_add(r, A[5])
            * q;
        let den = B[0]
            .mul_add(r, B[1])
            .mul_add(r, B[2])
            .mul_add(r, B[3])
            .mul_add(r, B[4])
            .mul_add(r, 1.0);
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic uniform noise in `[-0.5, 0.5)`.
    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                #[allow(clippy::cast_precision_loss)]
                let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
                unit - 0.5
            })
            .collect()
    }

    fn seasonal_counts(len: usize) -> Vec<f64> {
        noise(len, 7)
            .into_iter()
            .enumerate()
            .map(|(t, e)| {
                #[allow(clippy::cast_precision_loss)]
                let phase = t as f64 * std::f64::consts::PI / 6.0;
                (4.0f64.mul_add(phase.cos(), 6.0) + 2.0 * e).max(0.0).round()
            })
            .collect()
    }

    #[test]
    fn recovers_ar1_coefficient() {
        let e = noise(2000, 42);
        let mut series = vec![0.0];
        for t in 1..e.len() {
            series.push(0.6f64.mul_add(series[t - 1], e[t]));
        }

        let model = Arima::fit(&series, ArimaOrder::new(1, 0, 0)).unwrap();
        let phi = model.ar_coefficients()[0];
        assert!((phi - 0.6).abs() < 0.1, "phi = {phi}");
    }

    #[test]
    fn random_walk_forecast_is_flat() {
        // With d = 1 and p = 0 the forecast is the last observed value.
        let series: Vec<f64> = noise(50, 3)
            .iter()
            .scan(0.0, |acc, e| {
                *acc += e;
                Some(*acc)
            })
            .collect();
        let last = *series.last().unwrap();

        let model = Arima::fit(&series, ArimaOrder::new(0, 1, 0)).unwrap();
        let forecast = model.forecast(4, 0.95).unwrap();

        for value in &forecast.mean {
            assert!((value - last).abs() < 1e-12);
        }
        // Random-walk error variance grows linearly with the horizon.
        let ratio = forecast.std_errors[3] / forecast.std_errors[0];
        assert!((ratio - 2.0).abs() < 1e-9, "ratio = {ratio}");
    }

    #[test]
    fn forecast_bounds_bracket_mean_and_widen() {
        let series = seasonal_counts(120);
        let model = Arima::fit(&series, ArimaOrder::new(5, 1, 0)).unwrap();
        let forecast = model.forecast(12, 0.95).unwrap();

        assert_eq!(forecast.mean.len(), 12);
        assert_eq!(forecast.lower.len(), 12);
        assert_eq!(forecast.upper.len(), 12);
        for step in 0..12 {
            assert!(forecast.lower[step] < forecast.mean[step]);
            assert!(forecast.mean[step] < forecast.upper[step]);
            assert!(forecast.mean[step].is_finite());
        }
        assert!(forecast.std_errors.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn integrated_coefficients_expand_difference() {
        let model = Arima {
            order: ArimaOrder::new(2, 1, 0),
            ar_coeffs: vec![0.5, -0.2],
            sigma2: 1.0,
            history: Vec::new(),
        };
        // (1 - 0.5B + 0.2B^2)(1 - B) = 1 - 1.5B + 0.7B^2 - 0.2B^3
        let coeffs = model.integrated_coefficients();
        let expected = [1.5, -0.7, 0.2];
        for (c, e) in coeffs.iter().zip(expected) {
            assert!((c - e).abs() < 1e-12, "{coeffs:?}");
        }
    }

    #[test]
    fn too_few_observations_is_an_error() {
        let series = seasonal_counts(11);
        let err = Arima::fit(&series, ArimaOrder::new(5, 1, 0)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn moving_average_terms_are_rejected() {
        let series = seasonal_counts(60);
        let err = Arima::fit(&series, ArimaOrder::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, ForecastError::UnsupportedOrder { .. }));
    }

    #[test]
    fn non_finite_input_is_an_error() {
        let mut series = seasonal_counts(60);
        series[17] = f64::NAN;
        let err = Arima::fit(&series, ArimaOrder::new(5, 1, 0)).unwrap_err();
        assert!(matches!(err, ForecastError::NonFinite { index: 17 }));
    }

    #[test]
    fn constant_series_is_singular() {
        let series = vec![3.0; 40];
        let err = Arima::fit(&series, ArimaOrder::new(5, 1, 0)).unwrap_err();
        assert!(matches!(err, ForecastError::Singular));
    }

    #[test]
    fn confidence_must_be_a_probability() {
        let model = Arima::fit(&seasonal_counts(60), ArimaOrder::new(5, 1, 0)).unwrap();
        assert!(model.forecast(3, 1.0).is_err());
        assert!(model.forecast(3, 0.0).is_err());
        assert!(model.forecast(3, f64::NAN).is_err());
    }

    #[test]
    fn normal_quantile_matches_known_values() {
        assert!((normal_quantile(0.975) - 1.959_963_985).abs() < 1e-6);
        assert!((normal_quantile(0.5)).abs() < 1e-12);
        assert!((normal_quantile(0.005) + 2.575_829_304).abs() < 1e-6);
    }

    #[test]
    fn solve_detects_singular_system() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(solve(a, vec![1.0, 2.0]).is_none());

        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve(a, vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }
}
