//! Pulling permutation samples out of text.
//!
//! Two inputs are understood:
//!
//! - a raw subject transcript, where samples are the lists printed between
//!   a start marker and an end marker (`l = [3 1 4 2]`), mixed with prompts
//!   and other chatter that is skipped;
//! - a plain sample file with one whitespace-separated permutation per line,
//!   blank lines and `#` comments allowed.

use crate::error::{Error, Result};

/// The text strictly between the first `start` marker and the first `end`
/// marker after it.
pub fn region<'a>(transcript: &'a str, start: &str, end: &str) -> Result<&'a str> {
    let start_at = transcript.find(start).ok_or_else(|| Error::MarkerNotFound {
        marker: start.to_string(),
    })? + start.len();
    let rest = &transcript[start_at..];
    let end_at = rest.find(end).ok_or_else(|| Error::MarkerNotFound {
        marker: end.to_string(),
    })?;
    Ok(&rest[..end_at])
}

/// The sample printed on one line, if the line holds one.
///
/// A bracketed list of symbols is a sample whatever its length, so
/// `cmd> l = [3 1 4 2]` yields `[3, 1, 4, 2]` and `l = [2 1 4]` yields a
/// short sample that the rank encoder later rejects. A bare line counts only
/// when it holds exactly `width` symbols.
pub fn parse_line(line: &str, width: usize) -> Option<Vec<u32>> {
    let (body, bracketed) = match (line.rfind('['), line.rfind(']')) {
        (Some(open), Some(close)) if open < close => (&line[open + 1..close], true),
        _ => (line, false),
    };
    let symbols: Vec<u32> = body
        .split_whitespace()
        .map(|tok| tok.parse().ok())
        .collect::<Option<_>>()?;
    (bracketed || symbols.len() == width).then_some(symbols)
}

/// Every sample printed between the markers, in output order.
pub fn extract_samples(transcript: &str, start: &str, end: &str, width: usize) -> Result<Vec<Vec<u32>>> {
    let body = region(transcript, start, end)?;
    Ok(body.lines().filter_map(|line| parse_line(line, width)).collect())
}

/// Parse a sample file. Unlike transcripts, every non-comment line must be
/// a list of symbols; its length is checked later by the rank encoder.
pub fn parse_sample_file(text: &str) -> Result<Vec<Vec<u32>>> {
    let mut samples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<u32>().map_err(|_| Error::InvalidToken {
                    line: i + 1,
                    token: tok.to_string(),
                })
            })
            .collect::<Result<Vec<u32>>>()?;
        samples.push(sample);
    }
    Ok(samples)
}
