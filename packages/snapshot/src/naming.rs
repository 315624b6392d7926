//! Snapshot file naming: `<prefix>_<YYYYMMDD>.<ext>`.

use chrono::NaiveDate;
use frontline_models::PipelineConfig;

/// Date layout embedded in snapshot file names.
const DATE_FORMAT: &str = "%Y%m%d";

/// Builds and parses snapshot file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNaming {
    prefix: String,
    extension: String,
}

impl Default for SnapshotNaming {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl SnapshotNaming {
    /// Creates a naming scheme. A leading dot on `extension` is ignored.
    #[must_use]
    pub fn new(prefix: &str, extension: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Extracts the naming scheme from the pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.snapshot_prefix, &config.snapshot_extension)
    }

    /// Returns the file name for the snapshot of `date`.
    #[must_use]
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "{}_{}.{}",
            self.prefix,
            date.format(DATE_FORMAT),
            self.extension
        )
    }

    /// Returns `true` if `file_name` carries the snapshot extension.
    #[must_use]
    pub fn has_extension(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == self.extension)
    }

    /// Parses the date out of a snapshot file name.
    ///
    /// Returns `None` unless the name is exactly the prefix, an
    /// underscore, eight date digits, and the extension.
    #[must_use]
    pub fn parse_date(&self, file_name: &str) -> Option<NaiveDate> {
        let digits = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;

        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        NaiveDate::parse_from_str(digits, DATE_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builds_dated_file_name() {
        let naming = SnapshotNaming::default();
        assert_eq!(
            naming.file_name(date(2024, 1, 5)),
            "deepstatemap_data_20240105.geojson"
        );
    }

    #[test]
    fn parses_own_file_names() {
        let naming = SnapshotNaming::new("snap", ".json");
        let name = naming.file_name(date(2023, 12, 31));
        assert_eq!(name, "snap_20231231.json");
        assert_eq!(naming.parse_date(&name), Some(date(2023, 12, 31)));
    }

    #[test]
    fn rejects_foreign_or_invalid_names() {
        let naming = SnapshotNaming::default();
        assert_eq!(naming.parse_date("deepstatemap_data_2024010.geojson"), None);
        assert_eq!(naming.parse_date("deepstatemap_data_20241301.geojson"), None);
        assert_eq!(naming.parse_date("deepstatemap_data_20240101.json"), None);
        assert_eq!(naming.parse_date("other_20240101.geojson"), None);
        assert_eq!(naming.parse_date("deepstatemap_data_2024-01-01.geojson"), None);
    }

    #[test]
    fn extension_check_ignores_bare_dotfiles() {
        let naming = SnapshotNaming::default();
        assert!(naming.has_extension("anything.geojson"));
        assert!(!naming.has_extension(".geojson"));
        assert!(!naming.has_extension("table.csv"));
    }
}
