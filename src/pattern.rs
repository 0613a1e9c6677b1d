//! Identifier pattern matching.
//!
//! The default pattern is one uppercase ASCII letter followed by six ASCII
//! digits, the shape of a hospital number.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Default identifier pattern source.
pub const DEFAULT_PATTERN: &str = r"^[A-Z]\d{6}$";

/// Static regex for the default identifier pattern. Compiled once at first use.
static DEFAULT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&anchor(DEFAULT_PATTERN)).expect("Invalid identifier regex pattern")
});

/// A compiled, fully anchored identifier pattern.
#[derive(Debug, Clone)]
pub struct IdPattern {
    re: Regex,
}

impl IdPattern {
    /// Compile a user supplied pattern. The pattern is wrapped in anchors so a
    /// value must match in its entirety, and `\d` only accepts ASCII digits.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern == DEFAULT_PATTERN {
            return Ok(Self::default());
        }
        let anchored = anchor(pattern);
        let re = Regex::new(&anchored)
            .with_context(|| format!("Invalid identifier pattern '{pattern}'"))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.re.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }
}

impl Default for IdPattern {
    fn default() -> Self {
        Self {
            re: DEFAULT_ID_RE.clone(),
        }
    }
}

fn anchor(pattern: &str) -> String {
    format!("^(?:{})$", ascii_digits(pattern))
}

/// Rewrite `\d` and `\D` as ASCII classes. The regex crate's `\d` is Unicode
/// aware and would accept digits such as `٣`.
fn ascii_digits(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut class_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('d') if class_depth > 0 => out.push_str("0-9"),
                Some('d') => out.push_str("[0-9]"),
                Some('D') if class_depth == 0 => out.push_str("[^0-9]"),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '[' => {
                class_depth += 1;
                out.push(c);
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
