//! # shufflecheck-core
//!
//! **Is your shuffle actually uniform?**
//!
//! `shufflecheck-core` audits a permutation-generating random source. It
//! drives an interactive subject program through a command script, pulls
//! the emitted permutations out of its transcript, and runs two independent
//! tests on them:
//!
//! - a chi-squared goodness-of-fit test of the `N!` outcome frequencies
//!   against the uniform expectation, and
//! - the autocorrelation function of the permutation ranks in emission
//!   order, with the 95% white-noise bound `1.96 / sqrt(M)`.
//!
//! ## Quick Start
//!
//! ```
//! use shufflecheck_core::{AnalysisConfig, ReferenceShuffle, SymbolSet, analyze, reference};
//!
//! let symbols = SymbolSet::default();
//! let samples = reference::samples(&symbols, 2400, 42, ReferenceShuffle::FisherYates);
//! let report = analyze(&samples, &AnalysisConfig::default().with_label("fisher-yates")).unwrap();
//!
//! assert_eq!(report.frequencies.len(), 24);
//! assert_eq!(report.expected, 100.0);
//! assert_eq!(report.acf[0].correlation, 1.0);
//! ```
//!
//! ## Architecture
//!
//! Subject → Transcript → samples → Rank → {Frequency → chi-squared, ranks → ACF} → Report
//!
//! The statistics live in `shufflecheck-stats`; everything from the rank
//! encoder onward is pure and deterministic. Rendering is left to callers.

pub mod config;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod rank;
pub mod reference;
pub mod report;
pub mod subject;
pub mod symbols;
pub mod transcript;

pub use config::{
    AnalysisConfig, DEFAULT_ITERATIONS, DEFAULT_MAX_LAG, ExpectationMode, HarnessConfig,
    SourceConfig, list_marker, list_setup,
};
pub use error::{Error, Result, SampleDefect};
pub use frequency::{Aggregation, FrequencyTable, aggregate};
pub use pipeline::analyze;
pub use rank::RankEncoder;
pub use reference::ReferenceShuffle;
pub use report::{DiagnosticReport, FrequencyEntry, MIN_RELIABLE_EXPECTED, Warning, assemble};
pub use subject::{Collection, Transcript, collect_samples, run_subject};
pub use symbols::{MAX_SYMBOLS, SymbolSet, factorial};

pub use shufflecheck_stats::{AcfMethod, LagCorrelation};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
