//! Screening configuration.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::pattern::{IdPattern, DEFAULT_PATTERN};

/// How each file's result is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable messages and a preview table.
    #[default]
    Text,
    /// One JSON object per file.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unknown output format '{other}' (expected text or json)"),
        }
    }
}

/// Configuration for a screening run.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Directory containing the exported CSV files
    pub root_path: PathBuf,
    /// Fraction of data rows to sample from each file
    pub sample_size: f64,
    /// Minimum fraction of matching values for a column to count as a match
    pub min_matching_percentage: f64,
    /// Sample rows (true) or read each file in full (false)
    pub sample: bool,
    /// Seed for row sampling
    pub seed: i64,
    /// Identifier pattern source
    pub pattern: String,
    /// Rows shown in the preview table
    pub head_rows: usize,
    /// Wait for Enter between files
    pub pause: bool,
    /// Output format
    pub format: OutputFormat,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            root_path: PathBuf::from("."),
            sample_size: 0.25,
            min_matching_percentage: 0.5,
            sample: true,
            seed: -1,
            pattern: DEFAULT_PATTERN.to_string(),
            head_rows: 5,
            pause: true,
            format: OutputFormat::Text,
        }
    }
}

impl ScreenConfig {
    /// Check the numeric ranges and compile the identifier pattern.
    pub fn validate(&self) -> Result<IdPattern> {
        if self.sample && !(0.0..=1.0).contains(&self.sample_size) {
            bail!(
                "Sample size must be between 0 and 1, got {}",
                self.sample_size
            );
        }
        if !(0.0..=1.0).contains(&self.min_matching_percentage) {
            bail!(
                "Minimum matching percentage must be between 0 and 1, got {}",
                self.min_matching_percentage
            );
        }
        if !self.root_path.is_dir() {
            bail!("Directory not found: {}", self.root_path.display());
        }
        IdPattern::new(&self.pattern)
    }
}
