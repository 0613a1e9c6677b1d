//! In-memory tables loaded from CSV text.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

/// A header row plus string cells. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse CSV text. The first record is the header.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(str::to_string)
            .collect();
        let columns = dedup_column_names(columns);
        if columns.is_empty() {
            bail!("No columns to parse from file");
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to parse CSV row {}", index + 1))?;
            if record.len() > columns.len() {
                bail!(
                    "Expected {} fields in row {}, saw {}",
                    columns.len(),
                    index + 1,
                    record.len()
                );
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    /// Read and parse a whole CSV file.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_csv_str(&String::from_utf8_lossy(&bytes))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ... so every column
/// can be named unambiguously. Suffixes skip names already taken by another
/// header.
pub fn dedup_column_names(columns: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(columns.len());

    for name in columns {
        let unique = if taken.contains(&name) {
            let suffix = next_suffix.entry(name.clone()).or_insert(1);
            let mut candidate = format!("{name}.{suffix}");
            while taken.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{name}.{suffix}");
            }
            *suffix += 1;
            candidate
        } else {
            name
        };
        taken.insert(unique.clone());
        out.push(unique);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let table = Table::from_csv_str("id,name\nA123456,Alice\nB654321,Bob\n").unwrap();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec!["B654321", "Bob"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_csv_str("a,b,c\n1\n1,2,3\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_long_rows_are_errors() {
        let err = Table::from_csv_str("a,b\n1,2,3\n").unwrap_err();
        assert!(err.to_string().contains("Expected 2 fields"));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(Table::from_csv_str("").is_err());
    }

    #[test]
    fn test_header_only() {
        let table = Table::from_csv_str("a,b\n").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row_count(), 0);
        assert!(table.head(5).is_empty());
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let table = Table::from_csv_str("a,b,a,a\n1,2,A123456,4\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b", "a.1", "a.2"]);
        assert_eq!(table.rows[0][2], "A123456");
    }

    #[test]
    fn test_dedup_avoids_existing_names() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            dedup_column_names(names(&["a", "a.1", "a"])),
            names(&["a", "a.1", "a.2"])
        );
        assert_eq!(
            dedup_column_names(names(&["a", "a", "a.1"])),
            names(&["a", "a.1", "a.1.1"])
        );
        assert_eq!(dedup_column_names(names(&["x", "y"])), names(&["x", "y"]));
    }

    #[test]
    fn test_quoted_fields() {
        let table = Table::from_csv_str("id,note\nA123456,\"hello, world\"\n").unwrap();
        assert_eq!(table.rows[0][1], "hello, world");
    }

    #[test]
    fn test_head_and_column_values() {
        let table = Table::from_csv_str("x\n1\n2\n3\n").unwrap();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
        let values: Vec<&str> = table.column_values(0).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
    }
}
