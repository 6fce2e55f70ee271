//! CSV writing operations.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use polars::{io::SerWriter, prelude::CsvWriter};
use tempfile::NamedTempFile;

use crate::table::FeatureTable;

/// Write a feature table to `path`, id column first.
///
/// The file is written next to its target and renamed into place, so a failed run
/// never leaves a truncated table behind.
pub fn write_table(table: &FeatureTable, path: &Path) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("[io::csv::write] Failed to create directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("[io::csv::write] Failed to create temp file in {}", dir.display()))?;
    write_table_to(table, &mut tmp)?;
    tmp.flush()?;

    tmp.persist(path)
        .with_context(|| format!("[io::csv::write] Failed to move table into {}", path.display()))?;
    Ok(())
}

/// Write a feature table as CSV text.
pub fn write_table_string(table: &FeatureTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_table_to(table, &mut buffer)?;
    String::from_utf8(buffer).context("[io::csv::write] CSV output is not valid UTF-8")
}

fn write_table_to(table: &FeatureTable, out: &mut impl Write) -> Result<()> {
    let mut df = table.to_dataframe()?;
    CsvWriter::new(out)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write {} table", table.family()))
}
