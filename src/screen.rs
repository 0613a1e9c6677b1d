//! The screening loop: discover, load, scan, display, pause.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crate::config::ScreenConfig;
use crate::discover::find_csv_files;
use crate::pattern::IdPattern;
use crate::report::{write_report, FileReport};
use crate::review::Reviewer;
use crate::sample::read_sampled;
use crate::scan::scan_table;
use crate::table::Table;

/// Everything a screening run looked at.
#[derive(Debug, Default)]
pub struct ScreenSummary {
    pub root_path: PathBuf,
    pub files: Vec<FileReport>,
}

impl ScreenSummary {
    /// Files with a qualifying column.
    pub fn matched(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.matched.is_some())
    }

    /// Files that could not be read.
    pub fn skipped(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_skipped())
    }
}

/// Load a file either in full or as a seeded sample of its rows. When
/// sampling, also returns the number of data rows in the whole file.
fn load_table(path: &Path, config: &ScreenConfig) -> Result<(Table, Option<usize>)> {
    if !config.sample {
        return Ok((Table::read_csv(path)?, None));
    }

    let (content, sample) = read_sampled(path, config.sample_size, config.seed)?;
    let total_rows = sample.total_lines.saturating_sub(1);
    tracing::debug!(
        "Sampled {} of {} data lines from {}",
        sample.lines.len(),
        total_rows,
        path.display()
    );
    Ok((Table::from_csv_str(&content)?, Some(total_rows)))
}

/// Screen a single file. Read failures become a skipped report.
pub fn screen_file(path: &Path, config: &ScreenConfig, pattern: &IdPattern) -> FileReport {
    match load_table(path, config) {
        Ok((table, total_rows)) => {
            let outcome = scan_table(&table, pattern, config.min_matching_percentage);
            match &outcome.matched {
                Some(stats) => tracing::info!(
                    "{}: column '{}' matches ({}/{})",
                    path.display(),
                    stats.column,
                    stats.matching_count,
                    stats.total_count
                ),
                None => tracing::info!("{}: no matching column", path.display()),
            }
            FileReport::screened(
                path.to_path_buf(),
                total_rows,
                &table,
                outcome,
                config.head_rows,
            )
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {:#}", path.display(), e);
            FileReport::skipped(path.to_path_buf(), config.sample, format!("{e:#}"))
        }
    }
}

/// Screen every `*.csv` file under `config.root_path`.
///
/// Each readable file is reported to `out` and followed by a call to
/// `reviewer`. Unreadable files are reported and skipped without pausing.
pub fn screen_exported_tables(
    config: &ScreenConfig,
    out: &mut dyn Write,
    reviewer: &mut dyn Reviewer,
) -> Result<ScreenSummary> {
    let pattern = config.validate()?;
    let files = find_csv_files(&config.root_path)?;
    if files.is_empty() {
        tracing::warn!("No csv files found in {}", config.root_path.display());
    }

    let mut summary = ScreenSummary {
        root_path: config.root_path.clone(),
        files: Vec::with_capacity(files.len()),
    };

    for path in files {
        let report = screen_file(&path, config, &pattern);
        write_report(out, &report, config.format)?;
        out.flush()?;

        if !report.is_skipped() && config.pause {
            reviewer.pause(out)?;
        }
        summary.files.push(report);
    }

    tracing::info!(
        "Screened {} files: {} matched, {} skipped",
        summary.files.len(),
        summary.matched().count(),
        summary.skipped().count()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Counts pauses instead of blocking.
    #[derive(Default)]
    struct CountingReviewer {
        pauses: usize,
    }

    impl Reviewer for CountingReviewer {
        fn pause(&mut self, _out: &mut dyn Write) -> Result<()> {
            self.pauses += 1;
            Ok(())
        }
    }

    fn write_ids(dir: &Path, name: &str, rows: usize) {
        let mut content = String::from("name,hosp_no\n");
        for i in 0..rows {
            content.push_str(&format!("p{i},H{i:06}\n"));
        }
        fs::write(dir.join(name), content).unwrap();
    }

    fn full_config(dir: &TempDir) -> ScreenConfig {
        ScreenConfig {
            root_path: dir.path().to_path_buf(),
            sample: false,
            ..ScreenConfig::default()
        }
    }

    #[test]
    fn test_screens_each_file_and_pauses() {
        let dir = TempDir::new().unwrap();
        write_ids(dir.path(), "a.csv", 10);
        fs::write(dir.path().join("b.csv"), "x,y\n1,2\n").unwrap();

        let mut out = Vec::new();
        let mut reviewer = CountingReviewer::default();
        let summary =
            screen_exported_tables(&full_config(&dir), &mut out, &mut reviewer).unwrap();

        assert_eq!(summary.files.len(), 2);
        assert_eq!(reviewer.pauses, 2);
        assert_eq!(summary.matched().count(), 1);
        assert_eq!(
            summary.files[0].matched.as_ref().unwrap().column,
            "hosp_no"
        );

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Column 'hosp_no' in"));
        assert!(text.contains("mostly matches the pattern with 100.00% matches."));
        assert!(text.contains("No column in"));
    }

    #[test]
    fn test_unreadable_file_is_skipped_without_pause() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_bad.csv"), "a,b\n1,2,3\n").unwrap();
        write_ids(dir.path(), "b_good.csv", 4);

        let mut out = Vec::new();
        let mut reviewer = CountingReviewer::default();
        let summary =
            screen_exported_tables(&full_config(&dir), &mut out, &mut reviewer).unwrap();

        assert_eq!(summary.skipped().count(), 1);
        assert_eq!(reviewer.pauses, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Error reading "));
        assert!(text.contains("a_bad.csv"));
    }

    #[test]
    fn test_sampled_error_message_mentions_sampling() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.csv"), "").unwrap();

        let config = ScreenConfig {
            root_path: dir.path().to_path_buf(),
            ..ScreenConfig::default()
        };
        let mut out = Vec::new();
        let summary = screen_exported_tables(&config, &mut out, &mut CountingReviewer::default())
            .unwrap();

        assert!(summary.files[0].is_skipped());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Error reading sampled rows from "));
    }

    #[test]
    fn test_sampling_reads_a_fraction_reproducibly() {
        let dir = TempDir::new().unwrap();
        write_ids(dir.path(), "ids.csv", 400);
        let config = ScreenConfig {
            root_path: dir.path().to_path_buf(),
            seed: 11,
            pause: false,
            ..ScreenConfig::default()
        };

        let first = screen_file(&dir.path().join("ids.csv"), &config, &IdPattern::default());
        let second = screen_file(&dir.path().join("ids.csv"), &config, &IdPattern::default());

        assert_eq!(first.rows_read, Some(100));
        assert_eq!(first.total_rows, Some(400));
        assert_eq!(first.head, second.head);
        assert!(first.sampled);
    }

    #[test]
    fn test_sampling_cr_terminated_file() {
        let dir = TempDir::new().unwrap();
        let mut content = String::from("id\r");
        for i in 0..100 {
            content.push_str(&format!("A{i:06}\r"));
        }
        fs::write(dir.path().join("mac.csv"), content).unwrap();
        let config = ScreenConfig {
            root_path: dir.path().to_path_buf(),
            ..ScreenConfig::default()
        };

        let report = screen_file(&dir.path().join("mac.csv"), &config, &IdPattern::default());
        assert_eq!(report.total_rows, Some(100));
        assert_eq!(report.rows_read, Some(25));
        assert_eq!(report.matched.unwrap().column, "id");
    }

    #[test]
    fn test_full_read_has_no_total_rows() {
        let dir = TempDir::new().unwrap();
        write_ids(dir.path(), "ids.csv", 8);
        let report = screen_file(
            &dir.path().join("ids.csv"),
            &full_config(&dir),
            &IdPattern::default(),
        );
        assert_eq!(report.rows_read, Some(8));
        assert_eq!(report.total_rows, None);
        assert!(!report.sampled);
    }

    #[test]
    fn test_no_pause_config() {
        let dir = TempDir::new().unwrap();
        write_ids(dir.path(), "a.csv", 3);
        let config = ScreenConfig {
            pause: false,
            ..full_config(&dir)
        };
        let mut reviewer = CountingReviewer::default();
        screen_exported_tables(&config, &mut Vec::new(), &mut reviewer).unwrap();
        assert_eq!(reviewer.pauses, 0);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = ScreenConfig {
            sample_size: 2.0,
            ..ScreenConfig {
                root_path: dir.path().to_path_buf(),
                ..ScreenConfig::default()
            }
        };
        let result =
            screen_exported_tables(&config, &mut Vec::new(), &mut CountingReviewer::default());
        assert!(result.is_err());
    }
}
