//! Rendering of per-file screening results.
//!
//! Text output mirrors what an analyst reads while paging through exports:
//! the match verdict, the column list and a short preview of the rows. JSON
//! output writes one object per line for piping into other tools.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::scan::{ColumnStats, ScanOutcome};
use crate::table::Table;

/// Widest a preview column is allowed to grow.
const MAX_COLUMN_WIDTH: usize = 40;

/// Outcome of screening a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Whether rows were sampled rather than read in full.
    pub sampled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_read: Option<usize>,
    /// Data rows in the file, known when rows were sampled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<ColumnStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_stats: Vec<ColumnStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<Vec<String>>,
    /// Set when the file could not be read and was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn screened(
        path: PathBuf,
        total_rows: Option<usize>,
        table: &Table,
        outcome: ScanOutcome,
        head_rows: usize,
    ) -> Self {
        FileReport {
            path,
            sampled: total_rows.is_some(),
            rows_read: Some(table.row_count()),
            total_rows,
            columns: table.columns.clone(),
            matched: outcome.matched,
            column_stats: outcome.columns,
            head: table.head(head_rows).to_vec(),
            error: None,
        }
    }

    pub fn skipped(path: PathBuf, sampled: bool, error: String) -> Self {
        FileReport {
            path,
            sampled,
            rows_read: None,
            total_rows: None,
            columns: Vec::new(),
            matched: None,
            column_stats: Vec::new(),
            head: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.error.is_some()
    }
}

/// The one-line verdict for a screened file.
pub fn verdict_line(report: &FileReport) -> String {
    let path = report.path.display();
    match &report.matched {
        Some(stats) => format!(
            "Column '{}' in {} mostly matches the pattern with {:.2}% matches.",
            stats.column,
            path,
            stats.matching_percentage * 100.0
        ),
        None => format!("No column in {path} mostly matches the pattern."),
    }
}

/// Message written when a file is skipped.
pub fn read_error_line(report: &FileReport) -> String {
    let what = if report.sampled {
        "sampled rows from "
    } else {
        ""
    };
    format!(
        "Error reading {what}{}: {}",
        report.path.display(),
        report.error.as_deref().unwrap_or("unknown error")
    )
}

/// Write a report in the requested format.
pub fn write_report(out: &mut dyn Write, report: &FileReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string(report)?)?;
        }
        OutputFormat::Text => {
            if report.is_skipped() {
                writeln!(out, "{}", read_error_line(report))?;
                return Ok(());
            }
            let path = report.path.display();
            writeln!(out, "{}", verdict_line(report))?;
            writeln!(out, "Columns of {path}:")?;
            writeln!(out, "{}", format_columns(&report.columns))?;
            writeln!(out, "Head of {path}:")?;
            write_table(out, &report.columns, &report.head)?;
        }
    }
    Ok(())
}

fn format_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width && width > 3 {
        let kept: String = value.chars().take(width - 3).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}

/// Render rows as an aligned text table.
pub fn write_table(out: &mut dyn Write, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "(no rows)")?;
        return Ok(());
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, val) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(val.chars().count());
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let width = widths.get(i).copied().unwrap_or(10);
                format!("{:width$}", truncate(v, width))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(out, "{}", render(headers).trim_end())?;
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", sep.join("-+-"))?;
    for row in rows {
        writeln!(out, "{}", render(row).trim_end())?;
    }
    Ok(())
}
