//! Goodness-of-fit and serial-correlation statistics for shuffle audits.
//!
//! Two independent tests over already-collected data:
//!
//! - [`chi_squared_uniform`] compares observed outcome counts against a
//!   single uniform expected count.
//! - [`autocorrelation_function`] computes the mean-centered, lag-0
//!   normalized sample ACF of a numeric series together with the
//!   large-sample 95% white-noise bound.
//!
//! Every function here is pure and works on plain slices. Interpreting the
//! numbers (pass/fail, warnings) is left to the caller.

use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.96;

/// Centered energy, relative to the raw energy of the series, at or below
/// which the series is treated as constant. Scale-free, so it holds for
/// ranks and for arbitrarily scaled real data alike.
const ZERO_VARIANCE_RATIO: f64 = 1e-12;

/// Largest `len * lags` product the automatic method computes by direct
/// summation before switching to the FFT path.
const DIRECT_WORK_LIMIT: usize = 1 << 24;

/// Result of a chi-squared goodness-of-fit test against a uniform expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredResult {
    /// Summed `(observed - expected)^2 / expected` over every outcome.
    pub statistic: f64,
    /// Expected count used for every outcome.
    pub expected: f64,
    /// Number of outcomes minus one.
    pub degrees_of_freedom: usize,
    /// Upper-tail probability of the statistic. `None` with fewer than two outcomes.
    pub p_value: Option<f64>,
}

/// How the raw autocovariance sums are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcfMethod {
    /// Pick direct summation for small inputs, FFT otherwise.
    #[default]
    Auto,
    /// O(len * lags) direct summation.
    Direct,
    /// O(len log len) zero-padded FFT.
    Fft,
}

impl AcfMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Direct => "direct",
            Self::Fft => "fft",
        }
    }

    /// Resolve `Auto` into a concrete method for a series of `len` values.
    pub fn resolve(self, len: usize, lags: usize) -> Self {
        match self {
            Self::Auto if len.saturating_mul(lags) <= DIRECT_WORK_LIMIT => Self::Direct,
            Self::Auto => Self::Fft,
            other => other,
        }
    }
}

/// Autocorrelation at a single lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelation {
    pub lag: usize,
    pub correlation: f64,
}

/// Normalized autocorrelation function of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcfResult {
    /// Lags `0..=max_lag`, or `0..len` when the series is too short.
    pub lags: Vec<LagCorrelation>,
    /// Number of values in the series.
    pub series_len: usize,
    /// The largest lag the caller asked for.
    pub requested_max_lag: usize,
    /// `1.96 / sqrt(len)`.
    pub confidence_half_width: f64,
    /// Largest |ACF| over lags > 0.
    pub max_abs_correlation: f64,
    /// Lag at which `max_abs_correlation` occurs (0 when there are no lags > 0).
    pub max_abs_lag: usize,
    /// Lags > 0 whose |ACF| exceeds the confidence half-width.
    pub violations: usize,
    /// The series had no variance; lags > 0 are reported as 0.
    pub zero_variance: bool,
    /// Method actually used.
    pub method: AcfMethod,
}

impl AcfResult {
    /// Whether every requested lag could be computed.
    pub fn is_complete(&self) -> bool {
        self.lags.len() == self.requested_max_lag + 1
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. CHI-SQUARED
// ═══════════════════════════════════════════════════════════════════════════════

/// Sum of `(observed - expected)^2 / expected` over all outcomes.
///
/// The caller guarantees `expected > 0`.
pub fn chi_squared_statistic(observed: &[u64], expected: f64) -> f64 {
    observed
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Chi-squared goodness-of-fit of `observed` against one uniform expected count.
///
/// Returns `None` when there are no outcomes or `expected` is not a positive
/// finite number.
pub fn chi_squared_uniform(observed: &[u64], expected: f64) -> Option<ChiSquaredResult> {
    if observed.is_empty() || !expected.is_finite() || expected <= 0.0 {
        return None;
    }
    let statistic = chi_squared_statistic(observed, expected);
    let degrees_of_freedom = observed.len() - 1;
    let p_value = if degrees_of_freedom == 0 {
        None
    } else {
        ChiSquared::new(degrees_of_freedom as f64)
            .ok()
            .map(|dist| dist.sf(statistic))
    };
    Some(ChiSquaredResult {
        statistic,
        expected,
        degrees_of_freedom,
        p_value,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. AUTOCORRELATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Subtract the sample mean from every value.
pub fn mean_center(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    series.iter().map(|x| x - mean).collect()
}

/// Unnormalized autocovariance sums `sum_i x[i] * x[i + k]` for
/// `k in 0..=min(max_lag, len - 1)`, by direct summation.
pub fn raw_autocorrelation_direct(x: &[f64], max_lag: usize) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    let top = max_lag.min(n - 1);
    (0..=top)
        .map(|lag| {
            x[..n - lag]
                .iter()
                .zip(&x[lag..])
                .map(|(a, b)| a * b)
                .sum::<f64>()
        })
        .collect()
}

/// Same sums as [`raw_autocorrelation_direct`], computed through a
/// zero-padded FFT (Wiener-Khinchin). Padding to at least `2 * len - 1`
/// makes the circular correlation equal to the linear one.
pub fn raw_autocorrelation_fft(x: &[f64], max_lag: usize) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    let padded = (2 * n - 1).next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = x
        .iter()
        .map(|&re| Complex { re, im: 0.0 })
        .chain(std::iter::repeat(Complex { re: 0.0, im: 0.0 }))
        .take(padded)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(padded).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex {
            re: c.norm_sqr(),
            im: 0.0,
        };
    }
    planner.plan_fft_inverse(padded).process(&mut buffer);

    let top = max_lag.min(n - 1);
    let scale = padded as f64;
    buffer[..=top].iter().map(|c| c.re / scale).collect()
}

/// Sample autocorrelation function of `series` for lags `0..=max_lag`.
///
/// The series is mean-centered and every autocovariance sum is divided by
/// the lag-0 sum, so ACF(0) = 1. A constant series yields ACF(0) = 1 and 0
/// at every other lag. When `series.len() <= max_lag` only lags
/// `0..len` exist and the result is shorter than requested
/// (see [`AcfResult::is_complete`]).
///
/// Returns `None` for an empty series.
pub fn autocorrelation_function(
    series: &[f64],
    max_lag: usize,
    method: AcfMethod,
) -> Option<AcfResult> {
    let n = series.len();
    if n == 0 {
        return None;
    }
    let x = mean_center(series);
    let method = method.resolve(n, max_lag.min(n - 1) + 1);
    let raw = match method {
        AcfMethod::Fft => raw_autocorrelation_fft(&x, max_lag),
        _ => raw_autocorrelation_direct(&x, max_lag),
    };

    let c0 = raw[0];
    let energy: f64 = series.iter().map(|v| v * v).sum();
    let zero_variance = c0 <= ZERO_VARIANCE_RATIO * energy;
    let confidence_half_width = Z_95 / (n as f64).sqrt();

    let mut lags = Vec::with_capacity(raw.len());
    let mut max_abs_correlation = 0.0f64;
    let mut max_abs_lag = 0;
    let mut violations = 0;
    for (lag, &c) in raw.iter().enumerate() {
        let correlation = if lag == 0 {
            1.0
        } else if zero_variance {
            0.0
        } else {
            c / c0
        };
        if lag > 0 {
            if correlation.abs() > max_abs_correlation {
                max_abs_correlation = correlation.abs();
                max_abs_lag = lag;
            }
            if correlation.abs() > confidence_half_width {
                violations += 1;
            }
        }
        lags.push(LagCorrelation { lag, correlation });
    }

    Some(AcfResult {
        lags,
        series_len: n,
        requested_max_lag: max_lag,
        confidence_half_width,
        max_abs_correlation,
        max_abs_lag,
        violations,
        zero_variance,
        method,
    })
}
