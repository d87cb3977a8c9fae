//! The diagnostic report handed to presentation.

use std::fmt;

use serde::{Deserialize, Serialize};
use shufflecheck_stats::{AcfMethod, AcfResult, ChiSquaredResult, LagCorrelation};

use crate::config::{AnalysisConfig, ExpectationMode};
use crate::frequency::FrequencyTable;
use crate::rank::RankEncoder;

/// Smallest expected count for which the chi-squared approximation is trusted.
pub const MIN_RELIABLE_EXPECTED: f64 = 5.0;

/// Observed count of one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub rank: u64,
    /// Canonical label, e.g. "3142".
    pub permutation: String,
    pub count: u64,
}

/// Conditions that make a statistic less reliable without invalidating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The series is not longer than the requested max lag; the ACF stops
    /// at lag `samples - 1`.
    LagExceedsSamples { max_lag: usize, samples: usize },
    /// Expected count per outcome is below the usual chi-squared threshold.
    LowExpectedCount { expected: f64, minimum: f64 },
    /// Floor expectation dropped `remainder` samples' worth of expectation.
    InexactExpectation {
        samples: usize,
        outcomes: u64,
        remainder: u64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LagExceedsSamples { max_lag, samples } => write!(
                f,
                "insufficient samples for autocorrelation: max lag {max_lag} needs more than {max_lag} samples, got {samples}"
            ),
            Self::LowExpectedCount { expected, minimum } => write!(
                f,
                "expected count {expected:.3} per outcome is below {minimum}; chi-squared is unreliable"
            ),
            Self::InexactExpectation {
                samples,
                outcomes,
                remainder,
            } => write!(
                f,
                "{samples} samples is not a multiple of {outcomes} outcomes; floor expectation ignores a remainder of {remainder}"
            ),
        }
    }
}

/// Final result of analyzing one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub source_label: String,
    pub symbols: Vec<u32>,
    pub total_samples: usize,
    pub expectation_mode: ExpectationMode,
    /// Expected count per outcome.
    pub expected: f64,
    /// All `N!` outcomes in rank order.
    pub frequencies: Vec<FrequencyEntry>,
    pub chi_squared_sum: f64,
    pub degrees_of_freedom: usize,
    pub chi_squared_p_value: Option<f64>,
    /// Lags `0..=max_lag` (fewer when the series is short).
    pub acf: Vec<LagCorrelation>,
    pub max_lag: usize,
    pub confidence_half_width: f64,
    pub acf_violations: usize,
    pub max_abs_correlation: f64,
    pub max_abs_lag: usize,
    pub acf_method: AcfMethod,
    pub zero_variance: bool,
    pub warnings: Vec<Warning>,
}

impl DiagnosticReport {
    pub fn observed_outcomes(&self) -> usize {
        self.frequencies.iter().filter(|e| e.count > 0).count()
    }

    /// Entries with the smallest and largest counts (first in rank order on ties).
    pub fn extremes(&self) -> Option<(&FrequencyEntry, &FrequencyEntry)> {
        let min = self.frequencies.iter().min_by_key(|e| e.count)?;
        let max = self
            .frequencies
            .iter()
            .rev()
            .max_by_key(|e| e.count)?;
        Some((min, max))
    }
}

/// Package the statistics of one run. No further computation happens here.
pub fn assemble(
    config: &AnalysisConfig,
    encoder: &RankEncoder,
    table: &FrequencyTable,
    chi_squared: ChiSquaredResult,
    acf: AcfResult,
    warnings: Vec<Warning>,
) -> DiagnosticReport {
    let frequencies = encoder
        .labels()
        .into_iter()
        .zip(table.counts())
        .enumerate()
        .map(|(rank, (permutation, &count))| FrequencyEntry {
            rank: rank as u64,
            permutation,
            count,
        })
        .collect();

    DiagnosticReport {
        source_label: config.source_label.clone(),
        symbols: encoder.symbols().as_slice().to_vec(),
        total_samples: table.total() as usize,
        expectation_mode: config.expectation,
        expected: chi_squared.expected,
        frequencies,
        chi_squared_sum: chi_squared.statistic,
        degrees_of_freedom: chi_squared.degrees_of_freedom,
        chi_squared_p_value: chi_squared.p_value,
        acf: acf.lags,
        max_lag: acf.requested_max_lag,
        confidence_half_width: acf.confidence_half_width,
        acf_violations: acf.violations,
        max_abs_correlation: acf.max_abs_correlation,
        max_abs_lag: acf.max_abs_lag,
        acf_method: acf.method,
        zero_variance: acf.zero_variance,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolSet;
    use shufflecheck_stats::{autocorrelation_function, chi_squared_uniform};

    #[test]
    fn test_assemble_preserves_rank_order() {
        let encoder = RankEncoder::new(SymbolSet::range(3).unwrap());
        let mut table = FrequencyTable::new(6);
        for rank in [5, 5, 0, 2] {
            table.record(rank).unwrap();
        }
        let chi = chi_squared_uniform(table.counts(), 1.0).unwrap();
        let acf = autocorrelation_function(&[5.0, 5.0, 0.0, 2.0], 2, AcfMethod::Direct).unwrap();
        let config = AnalysisConfig::default().with_label("test source");
        let report = assemble(&config, &encoder, &table, chi, acf, Vec::new());

        assert_eq!(report.source_label, "test source");
        assert_eq!(report.total_samples, 4);
        assert_eq!(report.symbols, vec![1, 2, 3]);
        let labels: Vec<&str> = report
            .frequencies
            .iter()
            .map(|e| e.permutation.as_str())
            .collect();
        assert_eq!(labels, vec!["123", "132", "213", "231", "312", "321"]);
        let counts: Vec<u64> = report.frequencies.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0, 0, 2]);
        assert_eq!(report.acf.len(), 3);
        assert_eq!(report.max_lag, 2);
        assert_eq!(report.observed_outcomes(), 3);

        let (min, max) = report.extremes().unwrap();
        assert_eq!(min.permutation, "132");
        assert_eq!(max.permutation, "321");
    }

    #[test]
    fn test_warning_json_shape() {
        let w = Warning::LagExceedsSamples {
            max_lag: 50,
            samples: 30,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "lag_exceeds_samples");
        assert_eq!(json["samples"], 30);
        assert!(w.to_string().contains("insufficient samples"));
    }
}
