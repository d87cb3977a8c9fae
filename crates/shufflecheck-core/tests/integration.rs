//! Integration tests for shufflecheck-core.
//!
//! These tests exercise the full pipeline:
//! samples → rank → frequency table / rank sequence → chi-squared / ACF → report.

use std::collections::HashSet;
use std::io::Write;

use shufflecheck_core::{
    AcfMethod, AnalysisConfig, Error, ExpectationMode, RankEncoder, ReferenceShuffle,
    SampleDefect, SymbolSet, Warning, analyze, factorial, reference, transcript,
};

fn all_permutations(n: usize) -> Vec<Vec<u32>> {
    RankEncoder::new(SymbolSet::range(n).unwrap())
        .enumerate()
        .collect()
}

#[test]
fn rank_encoder_is_a_bijection_for_every_size() {
    for n in 1..=8 {
        let encoder = RankEncoder::new(SymbolSet::range(n).unwrap());
        let ranks: HashSet<u64> = encoder
            .enumerate()
            .map(|p| encoder.rank(&p).unwrap())
            .collect();
        let expected: HashSet<u64> = (0..factorial(n)).collect();
        assert_eq!(ranks, expected, "n={n}");
    }
}

#[test]
fn round_robin_permutations_are_perfectly_uniform() {
    let perms = all_permutations(4);
    let samples: Vec<Vec<u32>> = (0..24).flat_map(|_| perms.iter().cloned()).collect();
    assert_eq!(samples.len(), 576);

    let report = analyze(&samples, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.total_samples, 576);
    assert_eq!(report.expected, 24.0);
    assert_eq!(report.frequencies.len(), 24);
    assert!(report.frequencies.iter().all(|e| e.count == 24));
    assert_eq!(report.chi_squared_sum, 0.0);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.acf.len(), 51);
    assert!((report.acf[0].correlation - 1.0).abs() < 1e-12);
}

#[test]
fn constant_sequence_is_maximally_skewed() {
    let samples = vec![vec![1, 2, 3, 4]; 100];

    let floor = analyze(&samples, &AnalysisConfig::default()).unwrap();
    assert_eq!(floor.frequencies[0].count, 100);
    assert!(floor.frequencies[1..].iter().all(|e| e.count == 0));
    assert_eq!(floor.expected, 4.0);
    // (100-4)^2/4 + 23 * 4
    assert!((floor.chi_squared_sum - (96.0 * 96.0 / 4.0 + 23.0 * 4.0)).abs() < 1e-9);
    assert!(floor.chi_squared_p_value.unwrap() < 1e-10);

    assert!(floor.zero_variance);
    assert_eq!(floor.acf[0].correlation, 1.0);
    assert!(floor.acf[1..].iter().all(|l| l.correlation == 0.0));
    assert_eq!(floor.acf_violations, 0);

    let exact = analyze(
        &samples,
        &AnalysisConfig {
            expectation: ExpectationMode::Exact,
            ..AnalysisConfig::default()
        },
    )
    .unwrap();
    let e = 100.0 / 24.0;
    assert!((exact.expected - e).abs() < 1e-12);
    let want = (100.0 - e) * (100.0 - e) / e + 23.0 * e;
    assert!((exact.chi_squared_sum - want).abs() < 1e-9);
    assert!(exact.chi_squared_sum < floor.chi_squared_sum);
}

#[test]
fn short_run_reports_insufficient_samples() {
    let samples = reference::samples(&SymbolSet::default(), 30, 3, ReferenceShuffle::FisherYates);
    let report = analyze(&samples, &AnalysisConfig::default()).unwrap();
    assert!(report.warnings.contains(&Warning::LagExceedsSamples {
        max_lag: 50,
        samples: 30
    }));
    assert_eq!(report.acf.len(), 30);
    assert_eq!(report.max_lag, 50);
    // 30 / 24 floors to 1, below the chi-squared threshold.
    assert!(report.warnings.iter().any(|w| matches!(w, Warning::LowExpectedCount { .. })));
}

#[test]
fn malformed_sample_fails_the_run() {
    let mut samples = reference::samples(&SymbolSet::default(), 100, 9, ReferenceShuffle::FisherYates);
    samples[42] = vec![1, 2, 3, 5];
    match analyze(&samples, &AnalysisConfig::default()) {
        Err(Error::MalformedSample { index, defect }) => {
            assert_eq!(index, 42);
            assert_eq!(defect, SampleDefect::UnknownSymbol(5));
        }
        other => panic!("expected malformed sample, got {other:?}"),
    }

    samples[42] = vec![1, 2, 3];
    assert!(matches!(
        analyze(&samples, &AnalysisConfig::default()),
        Err(Error::MalformedSample { index: 42, defect: SampleDefect::WrongLength { .. } })
    ));
}

#[test]
fn zero_expectation_fails_fast() {
    let empty: Vec<Vec<u32>> = Vec::new();
    for expectation in [ExpectationMode::Floor, ExpectationMode::Exact] {
        let config = AnalysisConfig {
            expectation,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            analyze(&empty, &config),
            Err(Error::DegenerateExpectation { samples: 0, outcomes: 24 })
        ));
    }

    // Floor division of 10 samples over 24 outcomes is zero as well.
    let few = reference::samples(&SymbolSet::default(), 10, 1, ReferenceShuffle::FisherYates);
    assert!(matches!(
        analyze(&few, &AnalysisConfig::default()),
        Err(Error::DegenerateExpectation { samples: 10, .. })
    ));
    let exact = AnalysisConfig {
        expectation: ExpectationMode::Exact,
        ..AnalysisConfig::default()
    };
    assert!(analyze(&few, &exact).is_ok());
}

#[test]
fn reruns_are_bit_identical() {
    let samples = reference::samples(&SymbolSet::default(), 5000, 11, ReferenceShuffle::FisherYates);
    let config = AnalysisConfig::default().with_label("rerun");
    let a = analyze(&samples, &config).unwrap();
    let b = analyze(&samples, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn direct_and_fft_reports_agree() {
    let samples = reference::samples(&SymbolSet::default(), 3000, 5, ReferenceShuffle::FisherYates);
    let direct = analyze(
        &samples,
        &AnalysisConfig {
            acf_method: AcfMethod::Direct,
            ..AnalysisConfig::default()
        },
    )
    .unwrap();
    let fft = analyze(
        &samples,
        &AnalysisConfig {
            acf_method: AcfMethod::Fft,
            ..AnalysisConfig::default()
        },
    )
    .unwrap();
    assert_eq!(direct.frequencies, fft.frequencies);
    assert_eq!(direct.chi_squared_sum, fft.chi_squared_sum);
    for (a, b) in direct.acf.iter().zip(&fft.acf) {
        assert!((a.correlation - b.correlation).abs() < 1e-9);
    }
}

#[test]
fn fisher_yates_looks_uniform_and_naive_swap_does_not() {
    let symbols = SymbolSet::default();
    let good = analyze(
        &reference::samples(&symbols, 48_000, 2024, ReferenceShuffle::FisherYates),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert!(good.chi_squared_p_value.unwrap() > 1e-4, "p={:?}", good.chi_squared_p_value);
    assert!(good.acf_violations < 15, "violations={}", good.acf_violations);
    assert!(good.max_abs_correlation < 0.05);

    let bad = analyze(
        &reference::samples(&symbols, 48_000, 2024, ReferenceShuffle::NaiveSwap),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert!(bad.chi_squared_p_value.unwrap() < 1e-10);
    assert!(bad.chi_squared_sum > 10.0 * good.chi_squared_sum);
}

#[test]
fn transcript_file_feeds_the_pipeline() {
    let perms = all_permutations(4);
    let mut text = String::from("cmd> it 4\nl = [1 2 3 4]\n");
    for _ in 0..10 {
        for p in &perms {
            text.push_str("cmd> shuffle\n");
            text.push_str(&format!("l = [{}]\n", SymbolSet::display(p)));
        }
    }
    text.push_str("cmd> free\nl = NULL\ncmd> quit\n");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    let read_back = std::fs::read_to_string(file.path()).unwrap();

    let samples = transcript::extract_samples(&read_back, "l = [1 2 3 4]", "l = NULL", 4).unwrap();
    assert_eq!(samples.len(), 240);
    let report = analyze(&samples, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.chi_squared_sum, 0.0);
    assert!(report.frequencies.iter().all(|e| e.count == 10));
}

#[test]
fn lost_or_duplicated_element_in_transcript_fails_the_run() {
    let mut text = String::from("l = [1 2 3 4]\n");
    for _ in 0..100 {
        text.push_str("cmd> shuffle\nl = [2 1 4 3]\n");
    }
    let tail_short = format!("{text}cmd> shuffle\nl = [2 1 4]\nl = NULL\n");
    let samples = transcript::extract_samples(&tail_short, "l = [1 2 3 4]", "l = NULL", 4).unwrap();
    assert_eq!(samples.len(), 101);
    assert!(matches!(
        analyze(&samples, &AnalysisConfig::default()),
        Err(Error::MalformedSample {
            index: 100,
            defect: SampleDefect::WrongLength { expected: 4, got: 3 }
        })
    ));

    let tail_long = format!("{text}cmd> shuffle\nl = [2 1 4 3 3]\nl = NULL\n");
    let samples = transcript::extract_samples(&tail_long, "l = [1 2 3 4]", "l = NULL", 4).unwrap();
    assert!(matches!(
        analyze(&samples, &AnalysisConfig::default()),
        Err(Error::MalformedSample {
            index: 100,
            defect: SampleDefect::WrongLength { expected: 4, got: 5 }
        })
    ));
}

#[test]
fn report_serializes_to_json() {
    let samples = reference::samples(&SymbolSet::default(), 2400, 8, ReferenceShuffle::FisherYates);
    let report = analyze(&samples, &AnalysisConfig::default().with_label("/dev/urandom")).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["source_label"], "/dev/urandom");
    assert_eq!(json["expectation_mode"], "floor");
    assert_eq!(json["frequencies"].as_array().unwrap().len(), 24);
    assert_eq!(json["frequencies"][0]["permutation"], "1234");
    assert_eq!(json["acf"][0]["lag"], 0);
    let back: shufflecheck_core::DiagnosticReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.frequencies, report.frequencies);
    assert_eq!(back.warnings, report.warnings);
}
