//! tablescreen library - screening of exported CSV tables for identifier columns.
//!
//! A screening run walks the `*.csv` files of a directory, optionally samples
//! a seeded random subset of each file's rows, and reports the first column
//! whose values mostly match an identifier pattern (by default one uppercase
//! letter followed by six digits).
//!
//! # Modules
//!
//! - [`config`] - Run configuration and validation
//! - [`discover`] - CSV file discovery
//! - [`sample`] - Seeded random line sampling
//! - [`table`] - CSV loading into in-memory tables
//! - [`pattern`] - Identifier pattern
//! - [`scan`] - Per-column match statistics
//! - [`report`] - Text and JSON rendering
//! - [`review`] - Pausing between files
//! - [`screen`] - The screening loop
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use tablescreen::{screen_exported_tables, NoPause, ScreenConfig};
//!
//! let config = ScreenConfig {
//!     root_path: PathBuf::from("./exports"),
//!     seed: 42,
//!     ..ScreenConfig::default()
//! };
//! let summary = screen_exported_tables(&config, &mut std::io::stdout(), &mut NoPause)
//!     .expect("screening failed");
//! println!("{} files matched", summary.matched().count());
//! ```

pub mod config;
pub mod discover;
pub mod pattern;
pub mod report;
pub mod review;
pub mod sample;
pub mod scan;
pub mod screen;
pub mod table;

// Re-export for convenience
pub use config::{OutputFormat, ScreenConfig};
pub use pattern::{IdPattern, DEFAULT_PATTERN};
pub use report::FileReport;
pub use review::{NoPause, Reviewer, StdinReviewer};
pub use scan::{scan_table, ColumnStats, ScanOutcome};
pub use screen::{screen_exported_tables, screen_file, ScreenSummary};
pub use table::Table;
