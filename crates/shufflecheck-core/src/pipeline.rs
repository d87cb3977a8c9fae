//! Samples in, diagnostic report out.
//!
//! samples → rank → {frequency table → chi-squared} and
//! {rank sequence → ACF} → report. Pure and deterministic: identical
//! samples and config give identical reports.

use log::{debug, info, warn};
use shufflecheck_stats::{autocorrelation_function, chi_squared_uniform};

use crate::config::{AnalysisConfig, ExpectationMode};
use crate::error::{Error, Result};
use crate::frequency::aggregate;
use crate::rank::RankEncoder;
use crate::report::{DiagnosticReport, MIN_RELIABLE_EXPECTED, Warning, assemble};

/// Run both tests over `samples` and build the report.
///
/// Fails on the first malformed sample and when the expected count per
/// outcome would be zero. Reliability problems become report warnings.
pub fn analyze<S: AsRef<[u32]>>(samples: &[S], config: &AnalysisConfig) -> Result<DiagnosticReport> {
    config.validate()?;
    let encoder = RankEncoder::new(config.symbols.clone());
    let outcomes = encoder.outcome_count();
    let total = samples.len();

    let aggregation = aggregate(&encoder, samples)?;

    let expected = config.expectation.expected(total as u64, outcomes);
    let degenerate = || Error::DegenerateExpectation {
        samples: total,
        outcomes,
    };
    let chi_squared = chi_squared_uniform(aggregation.table.counts(), expected).ok_or_else(degenerate)?;
    debug!(
        "chi-squared {:.4} (expected {expected}, df {})",
        chi_squared.statistic, chi_squared.degrees_of_freedom
    );

    let series: Vec<f64> = aggregation.ranks.iter().map(|&r| r as f64).collect();
    let acf = autocorrelation_function(&series, config.max_lag, config.acf_method)
        .ok_or_else(degenerate)?;
    debug!(
        "acf over {} ranks via {}: {} lags, {} outside ±{:.4}",
        acf.series_len,
        acf.method.as_str(),
        acf.lags.len(),
        acf.violations,
        acf.confidence_half_width
    );

    let warnings = collect_warnings(config, total, outcomes, expected);
    for w in &warnings {
        warn!("{}: {w}", display_label(config));
    }

    let report = assemble(config, &encoder, &aggregation.table, chi_squared, acf, warnings);
    info!(
        "{}: {} samples, chi-squared {:.3}, {} ACF violations",
        display_label(config),
        report.total_samples,
        report.chi_squared_sum,
        report.acf_violations
    );
    Ok(report)
}

fn collect_warnings(config: &AnalysisConfig, total: usize, outcomes: u64, expected: f64) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if total <= config.max_lag {
        warnings.push(Warning::LagExceedsSamples {
            max_lag: config.max_lag,
            samples: total,
        });
    }
    if expected < MIN_RELIABLE_EXPECTED {
        warnings.push(Warning::LowExpectedCount {
            expected,
            minimum: MIN_RELIABLE_EXPECTED,
        });
    }
    let remainder = total as u64 % outcomes;
    if config.expectation == ExpectationMode::Floor && remainder != 0 {
        warnings.push(Warning::InexactExpectation {
            samples: total,
            outcomes,
            remainder,
        });
    }
    warnings
}

fn display_label(config: &AnalysisConfig) -> &str {
    if config.source_label.is_empty() {
        "(unlabeled)"
    } else {
        &config.source_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_for_short_run() {
        let config = AnalysisConfig::default();
        let warnings = collect_warnings(&config, 30, 24, 1.0);
        assert!(warnings.contains(&Warning::LagExceedsSamples {
            max_lag: 50,
            samples: 30
        }));
        assert!(warnings.iter().any(|w| matches!(w, Warning::LowExpectedCount { .. })));
        assert!(warnings.contains(&Warning::InexactExpectation {
            samples: 30,
            outcomes: 24,
            remainder: 6
        }));
    }

    #[test]
    fn test_no_warnings_for_clean_run() {
        let config = AnalysisConfig::default();
        assert!(collect_warnings(&config, 2400, 24, 100.0).is_empty());
    }

    #[test]
    fn test_exact_mode_has_no_remainder_warning() {
        let config = AnalysisConfig {
            expectation: ExpectationMode::Exact,
            ..AnalysisConfig::default()
        };
        let warnings = collect_warnings(&config, 2401, 24, 2401.0 / 24.0);
        assert!(warnings.is_empty());
    }
}
