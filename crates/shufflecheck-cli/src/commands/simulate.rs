use std::time::Instant;

use shufflecheck_core::{AnalysisConfig, analyze, reference};

use super::{AnalysisOverrides, OutputOptions, View};

pub fn run(
    samples: usize,
    seed: u64,
    shuffle: &str,
    overrides: AnalysisOverrides<'_>,
    output: OutputOptions<'_>,
) {
    let shuffle = super::parse_shuffle(shuffle);
    let mut config = AnalysisConfig::default();
    if let Err(e) = overrides.apply(&mut config) {
        super::fail(e);
    }
    let config = config.with_label(format!("{} (seed {seed})", shuffle.as_str()));

    println!(
        "Simulating {samples} {} shuffles of {} symbols...",
        shuffle.as_str(),
        config.symbols.len()
    );
    let t0 = Instant::now();
    let data = reference::samples(&config.symbols, samples, seed, shuffle);
    let report = analyze(&data, &config).unwrap_or_else(|e| super::fail(e));
    println!("  done [{:.2}s]", t0.elapsed().as_secs_f64());

    let reports = [report];
    super::print_report(&reports[0], View::parse(output.view));
    super::write_outputs(&reports, &output);
}
