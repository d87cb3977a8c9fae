use std::path::Path;

use shufflecheck_core::{AnalysisConfig, SymbolSet, analyze, list_marker, transcript};

use super::{AnalysisOverrides, OutputOptions, View};

pub struct AnalyzeCommandConfig<'a> {
    pub input: &'a str,
    pub label: Option<&'a str>,
    pub start_marker: Option<&'a str>,
    pub end_marker: &'a str,
    pub analysis: AnalysisOverrides<'a>,
    pub output: OutputOptions<'a>,
}

pub fn run(cfg: AnalyzeCommandConfig<'_>) {
    let text = std::fs::read_to_string(cfg.input)
        .unwrap_or_else(|e| super::fail(format!("cannot read {}: {e}", cfg.input)));

    let mut config = AnalysisConfig::default();
    if let Err(e) = cfg.analysis.apply(&mut config) {
        super::fail(e);
    }
    let label = cfg
        .label
        .map(str::to_string)
        .unwrap_or_else(|| default_label(cfg.input));
    let config = config.with_label(label);

    let samples = load_samples(&text, &config.symbols, cfg.start_marker, cfg.end_marker)
        .unwrap_or_else(|e| super::fail(e));
    println!("Loaded {} samples from {}", samples.len(), cfg.input);

    let report = analyze(&samples, &config).unwrap_or_else(|e| super::fail(e));
    let reports = [report];
    super::print_report(&reports[0], View::parse(cfg.output.view));
    super::write_outputs(&reports, &cfg.output);
}

/// A subject transcript if the start marker appears, else a plain sample list.
fn load_samples(
    text: &str,
    symbols: &SymbolSet,
    start_marker: Option<&str>,
    end_marker: &str,
) -> shufflecheck_core::Result<Vec<Vec<u32>>> {
    let start = start_marker
        .map(str::to_string)
        .unwrap_or_else(|| list_marker(symbols));
    if start_marker.is_some() || text.contains(&start) {
        transcript::extract_samples(text, &start, end_marker, symbols.len())
    } else {
        transcript::parse_sample_file(text)
    }
}

fn default_label(input: &str) -> String {
    Path::new(input)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string())
}
