use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tablescreen::{
    screen_exported_tables, NoPause, OutputFormat, Reviewer, ScreenConfig, StdinReviewer,
    DEFAULT_PATTERN,
};

/// Screen exported CSV tables for a column of hospital-number style identifiers.
#[derive(Debug, Parser)]
#[command(name = "tablescreen")]
#[command(version)]
struct Command {
    /// Directory containing the exported *.csv files
    root_path: PathBuf,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Fraction of data rows to sample from each file
    #[arg(short, long, default_value = "0.25")]
    sample_size: f64,
    /// Minimum fraction of matching values for a column to count as a match
    #[arg(short, long, default_value = "0.5")]
    min_matching_percentage: f64,
    /// Read every row instead of sampling
    #[arg(long)]
    full: bool,
    /// Seed for row sampling
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    seed: i64,
    /// Identifier pattern (anchored at both ends)
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pattern: String,
    /// Rows shown in each preview
    #[arg(long, default_value = "5")]
    head_rows: usize,
    /// Do not wait for Enter between files
    #[arg(long)]
    no_pause: bool,
    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

impl From<Command> for ScreenConfig {
    fn from(opts: Command) -> Self {
        ScreenConfig {
            root_path: opts.root_path,
            sample_size: opts.sample_size,
            min_matching_percentage: opts.min_matching_percentage,
            sample: !opts.full,
            seed: opts.seed,
            pattern: opts.pattern,
            head_rows: opts.head_rows,
            // JSON goes to pipes, there is nobody to press Enter.
            pause: !opts.no_pause && opts.format == OutputFormat::Text,
            format: opts.format,
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tablescreen={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let opts = Command::parse();
    init_logging(opts.verbose);

    let config = ScreenConfig::from(opts);
    tracing::debug!("{:?}", config);

    let mut reviewer: Box<dyn Reviewer> = if config.pause {
        Box::new(StdinReviewer::new())
    } else {
        Box::new(NoPause)
    };
    let mut stdout = io::stdout().lock();
    screen_exported_tables(&config, &mut stdout, reviewer.as_mut())?;
    Ok(())
}
