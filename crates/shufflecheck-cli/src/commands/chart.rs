//! Plain-text charts: outcome histogram and ACF stem plot.

use shufflecheck_core::DiagnosticReport;

/// Horizontal bar per outcome, with `|` marking the expected count.
pub fn histogram(r: &DiagnosticReport, width: usize) -> String {
    let width = width.max(1);
    let max = r
        .frequencies
        .iter()
        .map(|e| e.count as f64)
        .fold(r.expected, f64::max);
    let scale = |v: f64| {
        if max <= 0.0 {
            0
        } else {
            ((v / max) * width as f64).round() as usize
        }
    };
    let expected_col = scale(r.expected).min(width);
    let label_width = r
        .frequencies
        .iter()
        .map(|e| e.permutation.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("Frequencies (expected {:.1})\n", r.expected);
    for e in &r.frequencies {
        let filled = scale(e.count as f64).min(width);
        let mut bar: Vec<char> = (0..=width)
            .map(|i| if i < filled { '#' } else { ' ' })
            .collect();
        bar[expected_col] = '|';
        let bar: String = bar.into_iter().collect();
        out.push_str(&format!(
            "{:>lw$} {} {}\n",
            e.permutation,
            bar.trim_end(),
            e.count,
            lw = label_width
        ));
    }
    out
}

/// Vertical stem plot of the ACF. Lags outside the band are marked `*`.
pub fn stem(r: &DiagnosticReport, half_height: usize) -> String {
    let half_height = half_height.max(1);
    let band = r.confidence_half_width;
    let peak = r
        .acf
        .iter()
        .skip(1)
        .map(|l| l.correlation.abs())
        .fold(band * 2.0, f64::max);
    let row_of = |v: f64| -> i64 { ((v / peak) * half_height as f64).round() as i64 };
    let band_row = row_of(band);

    let mut out = format!("ACF lags 1..{} (band ±{band:.4}, scale ±{peak:.4})\n", r.acf.len().saturating_sub(1));
    let h = half_height as i64;
    for row in (-h..=h).rev() {
        let mut line = String::with_capacity(r.acf.len() + 2);
        line.push(if row == 0 {
            '0'
        } else if row.abs() == band_row {
            '-'
        } else {
            ' '
        });
        for lag in r.acf.iter().skip(1) {
            let v = row_of(lag.correlation.clamp(-peak, peak));
            let filled = (row > 0 && v >= row) || (row < 0 && v <= row);
            let outside = lag.correlation.abs() > band;
            line.push(match (filled, outside, row) {
                (true, true, _) => '*',
                (true, false, _) => '|',
                (false, _, 0) => '-',
                _ => ' ',
            });
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
