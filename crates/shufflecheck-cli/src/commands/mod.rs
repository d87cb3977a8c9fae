pub mod analyze;
pub mod chart;
pub mod report;
pub mod run;
pub mod script;
pub mod simulate;

use std::fmt::Display;

use shufflecheck_core::{
    AcfMethod, AnalysisConfig, DiagnosticReport, ExpectationMode, ReferenceShuffle, SymbolSet,
};

/// p-value below which the frequencies are called non-uniform.
const CRITICAL_P: f64 = 0.001;
/// p-value below which the frequencies are suspicious.
const WARNING_P: f64 = 0.01;
/// Nominal false-positive rate of the ACF confidence band.
const BAND_FALSE_RATE: f64 = 0.05;

/// Analysis flags given on the command line. `None` keeps the config value.
pub struct AnalysisOverrides<'a> {
    pub symbols: Option<usize>,
    pub max_lag: Option<usize>,
    pub expectation: Option<&'a str>,
    pub acf_method: Option<&'a str>,
}

impl AnalysisOverrides<'_> {
    pub fn apply(&self, config: &mut AnalysisConfig) -> shufflecheck_core::Result<()> {
        if let Some(n) = self.symbols {
            config.symbols = SymbolSet::range(n)?;
        }
        if let Some(lag) = self.max_lag {
            config.max_lag = lag;
        }
        if let Some(e) = self.expectation {
            config.expectation = parse_expectation(e);
        }
        if let Some(m) = self.acf_method {
            config.acf_method = parse_acf_method(m);
        }
        config.validate()
    }
}

/// Where and how results are shown.
pub struct OutputOptions<'a> {
    pub view: &'a str,
    pub json_path: Option<&'a str>,
    pub report_path: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Summary,
    Detailed,
}

impl View {
    pub fn parse(s: &str) -> Self {
        match s {
            "detailed" => Self::Detailed,
            _ => Self::Summary,
        }
    }
}

/// Set up `env_logger`; `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Print an error and exit non-zero.
pub fn fail(err: impl Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

/// Parse an expectation mode string into the enum.
pub fn parse_expectation(s: &str) -> ExpectationMode {
    match s {
        "floor" => ExpectationMode::Floor,
        "exact" | "real" => ExpectationMode::Exact,
        _ => {
            eprintln!("Unknown expectation mode '{s}', using floor");
            ExpectationMode::Floor
        }
    }
}

/// Parse an ACF method string into the enum.
pub fn parse_acf_method(s: &str) -> AcfMethod {
    match s {
        "auto" => AcfMethod::Auto,
        "direct" => AcfMethod::Direct,
        "fft" => AcfMethod::Fft,
        _ => {
            eprintln!("Unknown ACF method '{s}', using auto");
            AcfMethod::Auto
        }
    }
}

/// Parse a reference shuffle name into the enum.
pub fn parse_shuffle(s: &str) -> ReferenceShuffle {
    match s {
        "fisher-yates" | "fy" => ReferenceShuffle::FisherYates,
        "naive-swap" | "naive" => ReferenceShuffle::NaiveSwap,
        _ => {
            eprintln!("Unknown shuffle '{s}', using fisher-yates");
            ReferenceShuffle::FisherYates
        }
    }
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Good,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

pub struct Interpretation {
    pub status: Status,
    pub findings: Vec<String>,
    pub strengths: Vec<String>,
    pub meaning: &'static str,
}

/// Turn report numbers into a verdict. The statistics themselves never judge.
pub fn interpret(r: &DiagnosticReport) -> Interpretation {
    let mut status = Status::Good;
    let mut findings = Vec::new();
    let mut strengths = Vec::new();

    match r.chi_squared_p_value {
        Some(p) if p < CRITICAL_P => {
            status = status.max(Status::Critical);
            findings.push(format!(
                "outcome frequencies are not uniform (chi2={:.2}, df={}, p={p:.2e})",
                r.chi_squared_sum, r.degrees_of_freedom
            ));
        }
        Some(p) if p < WARNING_P => {
            status = status.max(Status::Warning);
            findings.push(format!(
                "outcome frequencies look skewed (chi2={:.2}, df={}, p={p:.4})",
                r.chi_squared_sum, r.degrees_of_freedom
            ));
        }
        Some(p) => strengths.push(format!(
            "frequencies consistent with uniform (chi2={:.2}, p={p:.4})",
            r.chi_squared_sum
        )),
        None => {}
    }

    let tested_lags = r.acf.len().saturating_sub(1);
    let tolerated = (2.0 * BAND_FALSE_RATE * tested_lags as f64).ceil() as usize + 2;
    if r.zero_variance {
        status = status.max(Status::Critical);
        findings.push("every sample was the same permutation".to_string());
    } else if r.max_abs_correlation > 2.0 * r.confidence_half_width {
        status = status.max(Status::Critical);
        findings.push(format!(
            "strong serial correlation: |r|={:.4} at lag {} (band ±{:.4})",
            r.max_abs_correlation, r.max_abs_lag, r.confidence_half_width
        ));
    } else if r.acf_violations > tolerated {
        status = status.max(Status::Warning);
        findings.push(format!(
            "{}/{} lags outside ±{:.4} (about {:.1} expected by chance)",
            r.acf_violations,
            tested_lags,
            r.confidence_half_width,
            BAND_FALSE_RATE * tested_lags as f64
        ));
    } else if tested_lags > 0 {
        strengths.push(format!(
            "no serial structure: {}/{} lags outside ±{:.4}",
            r.acf_violations, tested_lags, r.confidence_half_width
        ));
    }

    for w in &r.warnings {
        status = status.max(Status::Warning);
        findings.push(w.to_string());
    }

    let meaning = match status {
        Status::Good => "No evidence against a uniform, memoryless shuffle at this sample size.",
        Status::Warning => {
            "Results are borderline or based on too little data; rerun with more samples."
        }
        Status::Critical => "The shuffle is biased or serially dependent; do not rely on it.",
    };

    Interpretation {
        status,
        findings,
        strengths,
        meaning,
    }
}

// ---------------------------------------------------------------------------
// Printing and output files
// ---------------------------------------------------------------------------

pub fn print_report(r: &DiagnosticReport, view: View) {
    let i = interpret(r);
    println!();
    println!("  ┌─ {} ({} samples)", label_or_default(r), r.total_samples);
    println!("  │ Status: {} ({} finding(s))", i.status.as_str(), i.findings.len());
    for finding in &i.findings {
        println!("  │ Finding: {finding}");
    }
    for strength in &i.strengths {
        println!("  │ Strength: {strength}");
    }

    if view == View::Detailed {
        println!(
            "  │ Expectation:      {:.3} per outcome ({}), {}/{} outcomes observed",
            r.expected,
            r.expectation_mode.as_str(),
            r.observed_outcomes(),
            r.frequencies.len()
        );
        if let Some((least, most)) = r.extremes() {
            println!(
                "  │ Extremes:         least {} ({}), most {} ({})",
                least.permutation, least.count, most.permutation, most.count
            );
        }
        println!(
            "  │ Chi-squared:      {:.4}, df={}, p={}",
            r.chi_squared_sum,
            r.degrees_of_freedom,
            r.chi_squared_p_value
                .map(|p| format!("{p:.6}"))
                .unwrap_or_else(|| "n/a".to_string())
        );
        println!(
            "  │ Autocorrelation:  max|r|={:.4} (lag {}), {}/{} violations, ±{:.4} [{}]",
            r.max_abs_correlation,
            r.max_abs_lag,
            r.acf_violations,
            r.acf.len().saturating_sub(1),
            r.confidence_half_width,
            r.acf_method.as_str()
        );
        println!("  │");
        for line in chart::histogram(r, 40).lines() {
            println!("  │ {line}");
        }
        println!("  │");
        for line in chart::stem(r, 20).lines() {
            println!("  │ {line}");
        }
    }

    println!("  │ What this means: {}", i.meaning);
    println!("  └─");
}

/// Write the JSON and Markdown outputs that were asked for.
pub fn write_outputs(reports: &[DiagnosticReport], output: &OutputOptions<'_>) {
    if let Some(path) = output.json_path {
        match serde_json::to_string_pretty(reports) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => println!("\nResults written to {path}"),
                Err(e) => eprintln!("Failed to write {path}: {e}"),
            },
            Err(e) => eprintln!("Failed to serialize results: {e}"),
        }
    }
    if let Some(path) = output.report_path {
        let markdown = report::generate(reports);
        match std::fs::write(path, markdown) {
            Ok(()) => println!("Report saved to {path}"),
            Err(e) => eprintln!("Failed to write report to {path}: {e}"),
        }
    }
}

pub fn label_or_default(r: &DiagnosticReport) -> &str {
    if r.source_label.is_empty() {
        "(unlabeled)"
    } else {
        &r.source_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shufflecheck_core::{analyze, reference};

    #[test]
    fn test_parse_expectation() {
        assert_eq!(parse_expectation("floor"), ExpectationMode::Floor);
        assert_eq!(parse_expectation("exact"), ExpectationMode::Exact);
        assert_eq!(parse_expectation("real"), ExpectationMode::Exact);
        assert_eq!(parse_expectation("bogus"), ExpectationMode::Floor);
    }

    #[test]
    fn test_parse_acf_method() {
        assert_eq!(parse_acf_method("fft"), AcfMethod::Fft);
        assert_eq!(parse_acf_method("direct"), AcfMethod::Direct);
        assert_eq!(parse_acf_method("FFT"), AcfMethod::Auto); // case-sensitive
    }

    #[test]
    fn test_parse_shuffle() {
        assert_eq!(parse_shuffle("naive"), ReferenceShuffle::NaiveSwap);
        assert_eq!(parse_shuffle("fisher-yates"), ReferenceShuffle::FisherYates);
        assert_eq!(parse_shuffle(""), ReferenceShuffle::FisherYates);
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = AnalysisConfig::default();
        let overrides = AnalysisOverrides {
            symbols: Some(3),
            max_lag: Some(10),
            expectation: Some("exact"),
            acf_method: None,
        };
        overrides.apply(&mut config).unwrap();
        assert_eq!(config.symbols.len(), 3);
        assert_eq!(config.max_lag, 10);
        assert_eq!(config.expectation, ExpectationMode::Exact);
        assert_eq!(config.acf_method, AcfMethod::Auto);
    }

    #[test]
    fn test_overrides_reject_bad_values() {
        let mut config = AnalysisConfig::default();
        let zero_lag = AnalysisOverrides {
            symbols: None,
            max_lag: Some(0),
            expectation: None,
            acf_method: None,
        };
        assert!(zero_lag.apply(&mut config).is_err());
        let too_many = AnalysisOverrides {
            symbols: Some(12),
            max_lag: None,
            expectation: None,
            acf_method: None,
        };
        assert!(too_many.apply(&mut config).is_err());
    }

    #[test]
    fn test_constant_source_is_critical() {
        let samples = vec![vec![1, 2, 3, 4]; 100];
        let report = analyze(&samples, &AnalysisConfig::default()).unwrap();
        let i = interpret(&report);
        assert_eq!(i.status, Status::Critical);
        assert!(i.findings.iter().any(|f| f.contains("not uniform")));
        assert!(i.findings.iter().any(|f| f.contains("same permutation")));
    }

    #[test]
    fn test_short_run_is_at_least_warning() {
        let samples = reference::samples(&SymbolSet::default(), 30, 1, ReferenceShuffle::FisherYates);
        let report = analyze(&samples, &AnalysisConfig::default()).unwrap();
        let i = interpret(&report);
        assert!(i.status >= Status::Warning);
        assert!(i.findings.iter().any(|f| f.contains("insufficient samples")));
    }

    #[test]
    fn test_view_parse() {
        assert_eq!(View::parse("detailed"), View::Detailed);
        assert_eq!(View::parse("summary"), View::Summary);
    }
}
