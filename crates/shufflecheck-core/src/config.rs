//! Run configuration.
//!
//! [`AnalysisConfig`] parameterizes the statistics; [`HarnessConfig`]
//! describes how to drive a subject and which random-source settings to
//! compare. Both load from JSON and fill missing fields with defaults that
//! reproduce the classic four-element list-shuffle audit.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shufflecheck_stats::AcfMethod;

use crate::error::{Error, Result};
use crate::symbols::SymbolSet;
use crate::transcript;

/// Default largest ACF lag.
pub const DEFAULT_MAX_LAG: usize = 50;

/// Default number of shuffle commands sent per source.
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Default wall-clock limit for one subject run.
pub const DEFAULT_TIMEOUT_SECS: f64 = 300.0;

/// How the per-outcome expected count is derived from the sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectationMode {
    /// `samples / N!` with integer division. Drops the remainder when the
    /// sample count is not a multiple of `N!`.
    #[default]
    Floor,
    /// `samples / N!` as a real number.
    Exact,
}

impl ExpectationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Exact => "exact",
        }
    }

    pub fn expected(self, samples: u64, outcomes: u64) -> f64 {
        if outcomes == 0 {
            return 0.0;
        }
        match self {
            Self::Floor => (samples / outcomes) as f64,
            Self::Exact => samples as f64 / outcomes as f64,
        }
    }
}

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub symbols: SymbolSet,
    pub max_lag: usize,
    pub expectation: ExpectationMode,
    pub acf_method: AcfMethod,
    /// Opaque description of the source under test, copied into the report.
    pub source_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolSet::default(),
            max_lag: DEFAULT_MAX_LAG,
            expectation: ExpectationMode::default(),
            acf_method: AcfMethod::default(),
            source_label: String::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_lag == 0 {
            return Err(Error::InvalidConfig("max_lag must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }
}

/// One random-source setting of the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub label: String,
    /// Commands sent after the common setup, e.g. to switch generators.
    #[serde(default)]
    pub setup: Vec<String>,
    /// Overrides [`HarnessConfig::iterations`] for this source.
    #[serde(default)]
    pub iterations: Option<usize>,
}

impl SourceConfig {
    pub fn new(label: impl Into<String>, setup: Vec<String>) -> Self {
        Self {
            label: label.into(),
            setup,
            iterations: None,
        }
    }
}

/// How to drive the subject and what to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Commands sent once before sampling (build the list to shuffle).
    pub setup: Vec<String>,
    /// Command that makes the subject emit one permutation.
    pub sample_command: String,
    pub iterations: usize,
    /// Commands sent after sampling.
    pub teardown: Vec<String>,
    /// Output preceding the first sample.
    pub start_marker: String,
    /// Output following the last sample.
    pub end_marker: String,
    pub timeout_secs: f64,
    pub sources: Vec<SourceConfig>,
    pub analysis: AnalysisConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let symbols = SymbolSet::default();
        Self {
            program: "./qtest".to_string(),
            args: vec!["-v".to_string(), "3".to_string()],
            setup: list_setup(&symbols),
            sample_command: "shuffle".to_string(),
            iterations: DEFAULT_ITERATIONS,
            teardown: vec!["free".to_string(), "quit".to_string()],
            start_marker: list_marker(&symbols),
            end_marker: "l = NULL".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sources: vec![
                SourceConfig::new("/dev/urandom", Vec::new()),
                SourceConfig::new("xorshift", vec!["option prng 1".to_string()]),
            ],
            analysis: AnalysisConfig {
                symbols,
                ..AnalysisConfig::default()
            },
        }
    }
}

/// Commands that build the ascending list of `symbols` in the subject.
pub fn list_setup(symbols: &SymbolSet) -> Vec<String> {
    std::iter::once("new".to_string())
        .chain(symbols.as_slice().iter().map(|s| format!("it {s}")))
        .collect()
}

/// What the subject prints once that list is built.
pub fn list_marker(symbols: &SymbolSet) -> String {
    format!("l = [{}]", SymbolSet::display(symbols.as_slice()))
}

impl HarnessConfig {
    /// Switch to a new symbol set, rebuilding the list setup commands and
    /// the start marker to match.
    pub fn set_symbols(&mut self, symbols: SymbolSet) {
        self.setup = list_setup(&symbols);
        self.start_marker = list_marker(&symbols);
        self.analysis.symbols = symbols;
    }

    /// Load a JSON config; absent fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if self.program.trim().is_empty() {
            return Err(Error::InvalidConfig("program must not be empty".into()));
        }
        if self.sources.is_empty() {
            return Err(Error::InvalidConfig("at least one source is required".into()));
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "timeout_secs must be positive, got {}",
                self.timeout_secs
            )));
        }
        let symbols = &self.analysis.symbols;
        if let Some(listed) = transcript::parse_line(&self.start_marker, symbols.len()) {
            if listed != symbols.as_slice() {
                return Err(Error::InvalidConfig(format!(
                    "start marker {:?} does not list the symbols [{}]",
                    self.start_marker,
                    SymbolSet::display(symbols.as_slice())
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn iterations_for(&self, source: &SourceConfig) -> usize {
        source.iterations.unwrap_or(self.iterations)
    }

    /// Full stdin script for one source: setup, source setup, one sample
    /// command per iteration, teardown. Every command ends with a newline.
    pub fn script(&self, source: &SourceConfig) -> String {
        let iterations = self.iterations_for(source);
        let mut script = String::with_capacity((self.sample_command.len() + 1) * iterations + 64);
        for cmd in self.setup.iter().chain(&source.setup) {
            script.push_str(cmd);
            script.push('\n');
        }
        for _ in 0..iterations {
            script.push_str(&self.sample_command);
            script.push('\n');
        }
        for cmd in &self.teardown {
            script.push_str(cmd);
            script.push('\n');
        }
        script
    }

    /// Analysis parameters for one source.
    pub fn analysis_for(&self, source: &SourceConfig) -> AnalysisConfig {
        self.analysis.clone().with_label(source.label.clone())
    }
}
