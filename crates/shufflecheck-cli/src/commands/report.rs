use shufflecheck_core::DiagnosticReport;

use super::{Status, interpret, label_or_default};

/// Print the per-source verdict table, worst first.
pub fn print_summary_table(reports: &[DiagnosticReport]) {
    println!("\n{}", "=".repeat(72));
    println!(
        "{:<22} {:>8} {:>10} {:>10} {:>8} {:>9}",
        "Source", "Samples", "Chi2", "p-value", "ACF out", "Verdict"
    );
    println!("{}", "-".repeat(72));

    let mut rows: Vec<(&DiagnosticReport, Status)> =
        reports.iter().map(|r| (r, interpret(r).status)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    for (r, status) in rows {
        println!(
            "  {:<20} {:>8} {:>10.2} {:>10} {:>4}/{:<3} {:>9}",
            label_or_default(r),
            r.total_samples,
            r.chi_squared_sum,
            format_p(r.chi_squared_p_value),
            r.acf_violations,
            r.acf.len().saturating_sub(1),
            status.as_str()
        );
    }
}

/// Markdown report covering every analyzed source.
pub fn generate(reports: &[DiagnosticReport]) -> String {
    let mut md = String::new();
    md.push_str("# shufflecheck: Shuffle Uniformity Report\n\n");
    md.push_str(&format!("Generated: {}\n\n", timestamp_now()));

    for r in reports {
        let verdict = interpret(r);
        md.push_str(&format!("## {}\n\n", label_or_default(r)));
        md.push_str(&format!(
            "- Verdict: **{}**\n- Samples: {}\n- Symbols: {}\n- Expected per outcome: {:.3} ({})\n\n",
            verdict.status.as_str(),
            r.total_samples,
            shufflecheck_core::SymbolSet::display(r.symbols.as_slice()),
            r.expected,
            r.expectation_mode.as_str()
        ));

        if !verdict.findings.is_empty() {
            md.push_str("### Findings\n\n");
            for f in &verdict.findings {
                md.push_str(&format!("- {f}\n"));
            }
            md.push('\n');
        }

        md.push_str("### Chi-squared\n\n");
        md.push_str(&format!(
            "- Statistic: {:.4}\n- Degrees of freedom: {}\n- p-value: {}\n\n",
            r.chi_squared_sum,
            r.degrees_of_freedom,
            format_p(r.chi_squared_p_value)
        ));
        if let Some((least, most)) = r.extremes() {
            md.push_str(&format!(
                "Least frequent: `{}` ({}). Most frequent: `{}` ({}).\n\n",
                least.permutation, least.count, most.permutation, most.count
            ));
        }

        md.push_str("| Rank | Permutation | Count | Deviation |\n");
        md.push_str("|------|-------------|-------|-----------|\n");
        for e in &r.frequencies {
            md.push_str(&format!(
                "| {} | {} | {} | {:+.1} |\n",
                e.rank,
                e.permutation,
                e.count,
                e.count as f64 - r.expected
            ));
        }
        md.push('\n');

        md.push_str("### Autocorrelation\n\n");
        md.push_str(&format!(
            "- Lags: 0..{} (requested {})\n- 95% band: ±{:.5}\n- Violations: {}\n- Max |r|: {:.5} at lag {}\n- Method: {}\n\n",
            r.acf.len().saturating_sub(1),
            r.max_lag,
            r.confidence_half_width,
            r.acf_violations,
            r.max_abs_correlation,
            r.max_abs_lag,
            r.acf_method.as_str()
        ));
        md.push_str("```\n");
        md.push_str(&super::chart::stem(r, 30));
        md.push_str("```\n\n---\n\n");
    }

    md
}

fn format_p(p: Option<f64>) -> String {
    p.map(|p| format!("{p:.6}")).unwrap_or_else(|| "n/a".to_string())
}

fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shufflecheck_core::{AnalysisConfig, ReferenceShuffle, SymbolSet, analyze, reference};

    #[test]
    fn test_generate_has_section_per_source() {
        let samples = reference::samples(&SymbolSet::default(), 2400, 3, ReferenceShuffle::FisherYates);
        let a = analyze(&samples, &AnalysisConfig::default().with_label("alpha")).unwrap();
        let b = analyze(&samples, &AnalysisConfig::default().with_label("beta")).unwrap();
        let md = generate(&[a, b]);
        assert!(md.starts_with("# shufflecheck"));
        assert!(md.contains("## alpha"));
        assert!(md.contains("## beta"));
        assert!(md.contains("| 0 | 1234 |"));
        assert_eq!(md.matches("### Autocorrelation").count(), 2);
    }

    #[test]
    fn test_generate_names_extremes() {
        let samples = vec![vec![3, 2, 1], vec![3, 2, 1], vec![1, 2, 3], vec![2, 1, 3], vec![3, 2, 1], vec![1, 2, 3]];
        let config = AnalysisConfig {
            symbols: SymbolSet::range(3).unwrap(),
            max_lag: 2,
            ..AnalysisConfig::default()
        };
        let md = generate(&[analyze(&samples, &config).unwrap()]);
        assert!(md.contains("Least frequent: `132` (0). Most frequent: `321` (3)."));
    }

    #[test]
    fn test_format_p() {
        assert_eq!(format_p(None), "n/a");
        assert_eq!(format_p(Some(0.5)), "0.500000");
    }
}
