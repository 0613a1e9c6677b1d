use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// List the `*.csv` files directly inside `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension() == Some(OsStr::new("csv")) && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    tracing::debug!("Found {} csv files in {}", files.len(), dir.display());
    Ok(files)
}
