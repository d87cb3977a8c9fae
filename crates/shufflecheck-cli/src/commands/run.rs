use std::time::Instant;

use shufflecheck_core::{HarnessConfig, SourceConfig, analyze, collect_samples};

use super::{AnalysisOverrides, OutputOptions, View};

pub struct RunCommandConfig<'a> {
    pub config_path: Option<&'a str>,
    pub program: Option<&'a str>,
    pub iterations: Option<usize>,
    pub timeout_sec: Option<f64>,
    pub source_filter: Option<&'a str>,
    pub analysis: AnalysisOverrides<'a>,
    pub output: OutputOptions<'a>,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let config = build_config(&cfg).unwrap_or_else(|e| super::fail(e));
    let sources = select_sources(&config, cfg.source_filter);
    if sources.is_empty() {
        let wanted = cfg.source_filter.unwrap_or_default();
        super::fail(format!("no configured source matches '{wanted}'"));
    }

    println!(
        "Auditing {} with {} source(s), {} symbols...\n",
        config.program,
        sources.len(),
        config.analysis.symbols.len()
    );

    let view = View::parse(cfg.output.view);
    let mut reports = Vec::new();
    for source in &sources {
        print!(
            "  {}: {} shuffles...",
            source.label,
            config.iterations_for(source)
        );
        let t0 = Instant::now();
        let collection = match collect_samples(&config, source) {
            Ok(c) => c,
            Err(e) => {
                println!(" ✗ failed");
                log::error!("{}: {e}", source.label);
                continue;
            }
        };
        match analyze(&collection.samples, &config.analysis_for(source)) {
            Ok(report) => {
                println!(
                    " {} samples [{:.1}s]",
                    report.total_samples,
                    t0.elapsed().as_secs_f64()
                );
                reports.push(report);
            }
            Err(e) => {
                println!(" ✗ failed");
                log::error!("{}: {e}", source.label);
            }
        }
    }

    if reports.is_empty() {
        super::fail("no source produced a report");
    }

    for r in &reports {
        super::print_report(r, view);
    }
    super::report::print_summary_table(&reports);
    super::write_outputs(&reports, &cfg.output);
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(cfg: &RunCommandConfig<'_>) -> shufflecheck_core::Result<HarnessConfig> {
    let mut config = match cfg.config_path {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(program) = cfg.program {
        config.program = program.to_string();
    }
    if let Some(n) = cfg.iterations {
        config.iterations = n;
        for source in &mut config.sources {
            source.iterations = None;
        }
    }
    if let Some(t) = cfg.timeout_sec {
        config.timeout_secs = t;
    }
    cfg.analysis.apply(&mut config.analysis)?;
    if cfg.analysis.symbols.is_some() {
        let symbols = config.analysis.symbols.clone();
        config.set_symbols(symbols);
    }
    config.validate()?;
    Ok(config)
}

fn select_sources(config: &HarnessConfig, filter: Option<&str>) -> Vec<SourceConfig> {
    match filter {
        None => config.sources.clone(),
        Some(list) => {
            let wanted: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            config
                .sources
                .iter()
                .filter(|s| {
                    let label = s.label.to_lowercase();
                    wanted.iter().any(|w| label.contains(w.as_str()))
                })
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg<'a>(symbols: Option<usize>, iterations: Option<usize>) -> RunCommandConfig<'a> {
        RunCommandConfig {
            config_path: None,
            program: Some("./subject"),
            iterations,
            timeout_sec: Some(5.0),
            source_filter: None,
            analysis: AnalysisOverrides {
                symbols,
                max_lag: None,
                expectation: None,
                acf_method: None,
            },
            output: OutputOptions {
                view: "summary",
                json_path: None,
                report_path: None,
            },
        }
    }

    #[test]
    fn test_overrides_reach_harness() {
        let config = build_config(&cfg(None, Some(1000))).unwrap();
        assert_eq!(config.program, "./subject");
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.timeout_secs, 5.0);
        assert_eq!(config.start_marker, "l = [1 2 3 4]");
    }

    #[test]
    fn test_symbol_override_rebuilds_setup() {
        let config = build_config(&cfg(Some(3), None)).unwrap();
        assert_eq!(config.setup, vec!["new", "it 1", "it 2", "it 3"]);
        assert_eq!(config.start_marker, "l = [1 2 3]");
    }

    #[test]
    fn test_select_sources() {
        let config = HarnessConfig::default();
        assert_eq!(select_sources(&config, None).len(), 2);
        let picked = select_sources(&config, Some("XorShift"));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].label, "xorshift");
        assert_eq!(select_sources(&config, Some("urandom, xorshift")).len(), 2);
        assert!(select_sources(&config, Some("mt19937")).is_empty());
    }
}
