#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dated snapshot artifacts.
//!
//! Each pipeline run persists its cleaned region as one `GeoJSON` file
//! named `<prefix>_<YYYYMMDD>.<ext>` in the data directory. The date in
//! the file name is the snapshot's identity: the aggregation step never
//! looks inside a file to decide which day it belongs to.

pub mod fs;
pub mod naming;
pub mod reader;
pub mod writer;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

pub use naming::SnapshotNaming;
pub use reader::{SnapshotFeature, read_snapshot};
pub use writer::write_snapshot;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// I/O error (directory listing, file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON` or holds unsupported geometry.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// Serializing the snapshot failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A snapshot artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name, used for ordering and date parsing.
    pub file_name: String,
    /// Date parsed from the file name, or `None` if it does not follow
    /// the naming scheme.
    pub date: Option<NaiveDate>,
}

/// Lists every file in `dir` carrying the snapshot extension, sorted by
/// file name.
///
/// Files whose name does not yield a date are still listed (with
/// `date: None`) so callers can report them.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the directory cannot be read.
pub fn list_snapshots(
    dir: &Path,
    naming: &SnapshotNaming,
) -> Result<Vec<SnapshotFile>, SnapshotError> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(String::from) else {
            log::debug!("Ignoring non-UTF-8 file name {:?}", entry.file_name());
            continue;
        };

        if !naming.has_extension(&file_name) {
            continue;
        }

        files.push(SnapshotFile {
            path: entry.path(),
            date: naming.parse_date(&file_name),
            file_name,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_snapshots_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let naming = SnapshotNaming::default();
        for name in [
            "deepstatemap_data_20240302.geojson",
            "deepstatemap_data_20240301.geojson",
            "notes.geojson",
            "aggregated_deepstatemap.csv",
        ] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.geojson")).unwrap();

        let files = list_snapshots(dir.path(), &naming).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "deepstatemap_data_20240301.geojson",
                "deepstatemap_data_20240302.geojson",
                "notes.geojson",
            ]
        );
        assert_eq!(files[0].date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(files[2].date, None);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_snapshots(&dir.path().join("absent"), &SnapshotNaming::default());
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }
}
