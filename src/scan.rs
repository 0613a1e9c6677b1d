//! Per-column pattern scanning.

use serde::Serialize;

use crate::pattern::IdPattern;
use crate::table::Table;

/// Match statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub matching_count: usize,
    pub total_count: usize,
    pub matching_percentage: f64,
}

/// Result of scanning a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanOutcome {
    /// First column at or above the threshold, if any.
    pub matched: Option<ColumnStats>,
    /// Stats for every column examined, in header order. Scanning stops at
    /// the first match, so later columns are absent.
    pub columns: Vec<ColumnStats>,
}

/// Fraction of `matching` over `total`, zero for an empty column.
pub fn matching_percentage(matching: usize, total: usize) -> f64 {
    if total > 0 {
        matching as f64 / total as f64
    } else {
        0.0
    }
}

/// Compute match statistics for the column at `index`.
pub fn column_stats(table: &Table, index: usize, pattern: &IdPattern) -> ColumnStats {
    let matching_count = table
        .column_values(index)
        .filter(|v| pattern.is_match(v))
        .count();
    let total_count = table.row_count();

    ColumnStats {
        column: table.columns[index].clone(),
        matching_count,
        total_count,
        matching_percentage: matching_percentage(matching_count, total_count),
    }
}

/// Scan columns in order and stop at the first one whose matching percentage
/// is `>= min_matching_percentage`.
pub fn scan_table(table: &Table, pattern: &IdPattern, min_matching_percentage: f64) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for index in 0..table.columns.len() {
        let stats = column_stats(table, index, pattern);
        tracing::debug!(
            "Column '{}': {}/{} values match ({:.2}%)",
            stats.column,
            stats.matching_count,
            stats.total_count,
            stats.matching_percentage * 100.0
        );

        let qualifies = stats.matching_percentage >= min_matching_percentage;
        outcome.columns.push(stats.clone());
        if qualifies {
            outcome.matched = Some(stats);
            break;
        }
    }

    outcome
}
