//! Random line sampling.
//!
//! Sampling works on physical lines of the file. Line 0 is the header and is
//! never drawn; it is always kept so the sampled text still parses as a table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Lines chosen from a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSample {
    /// Physical line count of the file, header included.
    pub total_lines: usize,
    /// Sorted, distinct line numbers in `1..total_lines`.
    pub lines: Vec<usize>,
}

/// Number of data lines to draw: `floor((total_lines - 1) * fraction)`.
pub fn lines_to_sample(total_lines: usize, fraction: f64) -> usize {
    let data_lines = total_lines.saturating_sub(1);
    (data_lines as f64 * fraction).floor() as usize
}

/// Choose line numbers to keep. The RNG is seeded fresh on every call so the
/// same seed over the same line count always yields the same lines.
pub fn choose_lines(total_lines: usize, fraction: f64, seed: i64) -> LineSample {
    let data_lines = total_lines.saturating_sub(1);
    let amount = lines_to_sample(total_lines, fraction).min(data_lines);

    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut lines: Vec<usize> = rand::seq::index::sample(&mut rng, data_lines, amount)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    lines.sort_unstable();

    LineSample { total_lines, lines }
}

/// Split `content` into lines on `\n`, `\r\n` or a bare `\r`, the same
/// terminators the CSV reader accepts. A trailing terminator does not start
/// an extra empty line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &rest[..end];
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Keep the header line plus the sampled lines of `content`.
pub fn filter_lines(content: &str, sample: &LineSample) -> String {
    let mut wanted = sample.lines.iter().copied().peekable();
    let mut out = String::new();

    for (i, line) in split_lines(content).enumerate() {
        let keep = if i == 0 {
            true
        } else if wanted.peek() == Some(&i) {
            wanted.next();
            true
        } else {
            false
        };
        if keep {
            out.push_str(line);
            out.push('\n');
        }
        if i > 0 && wanted.peek().is_none() {
            break;
        }
    }
    out
}

/// Read `path` and return the header plus a seeded random sample of its lines.
pub fn read_sampled(path: &Path, fraction: f64, seed: i64) -> Result<(String, LineSample)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);

    let total_lines = split_lines(&content).count();
    let sample = choose_lines(total_lines, fraction, seed);

    Ok((filter_lines(&content, &sample), sample))
}
