//! CSV reading operations.

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result, anyhow};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

use crate::classify::Crosswalk;

/// Column holding the raw OSM type in a crosswalk file.
pub const TYPE_COLUMN: &str = "type";
/// Column holding the analysis group in a crosswalk file.
pub const GROUP_COLUMN: &str = "group";

/// Read a crosswalk CSV (`type`, `group`) from `path`.
pub fn read_crosswalk(path: &Path) -> Result<Crosswalk> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open crosswalk file: {}", path.display()))?;
    let df = read_as_strings(bytes)
        .with_context(|| format!("[io::csv::read] Failed to read crosswalk from {:?}", path))?;
    crosswalk_from_frame(&df)
        .with_context(|| format!("[io::csv::read] Invalid crosswalk in {:?}", path))
}

/// Read a crosswalk from CSV text.
pub fn read_crosswalk_string(csv: &str) -> Result<Crosswalk> {
    let df = read_as_strings(csv.as_bytes().to_vec())
        .context("[io::csv::read] Failed to read crosswalk from string")?;
    crosswalk_from_frame(&df)
}

/// Every column is read as a string so that the "0" group survives.
fn read_as_strings(bytes: Vec<u8>) -> Result<DataFrame> {
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?)
}

/// Rows with a missing type or group are skipped; their types resolve to "unclassified".
fn crosswalk_from_frame(df: &DataFrame) -> Result<Crosswalk> {
    let column = |name: &str| {
        df.column(name)
            .map_err(|_| anyhow!("[io::csv::read] Crosswalk is missing the {name:?} column"))
    };
    let types = column(TYPE_COLUMN)?.str()?;
    let groups = column(GROUP_COLUMN)?.str()?;

    let pairs = types.into_iter()
        .zip(groups.into_iter())
        .filter_map(|(raw, group)| Some((raw?, group?)))
        .filter(|(raw, group)| !raw.trim().is_empty() && !group.trim().is_empty());

    Ok(Crosswalk::from_pairs(pairs)?)
}

#[cfg(test)]
mod tests {
    use crate::classify::Group;

    use super::*;

    #[test]
    fn keeps_zero_sentinel_as_other() {
        let crosswalk = read_crosswalk_string("type,group\nbench,0\ncafe,food\nrestaurant,food\n").unwrap();
        assert_eq!(crosswalk.len(), 3);
        assert_eq!(crosswalk.resolve(Some("bench")), Group::other());
        assert_eq!(crosswalk.resolve(Some("cafe")).as_str(), "food");
        assert_eq!(crosswalk.resolve(Some("zoo")), Group::unclassified());
    }

    #[test]
    fn skips_incomplete_rows_and_extra_columns() {
        let crosswalk = read_crosswalk_string("type,group,note\nprimary,primary,main\ntrack,,\n").unwrap();
        assert_eq!(crosswalk.len(), 1);
        assert_eq!(crosswalk.resolve(Some("track")), Group::unclassified());
    }

    #[test]
    fn rejects_missing_columns_and_conflicts() {
        assert!(read_crosswalk_string("fclass,group\nprimary,primary\n").is_err());
        assert!(read_crosswalk_string("type,group\nprimary,major\nprimary,minor\n").is_err());
        assert!(read_crosswalk_string("type,group\nprimary,all\n").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads_type_crosswalk.csv");
        std::fs::write(&path, "type,group\nresidential,local\n").unwrap();
        assert_eq!(read_crosswalk(&path).unwrap().resolve(Some("residential")).as_str(), "local");
    }
}
