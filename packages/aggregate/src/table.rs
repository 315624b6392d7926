//! The aggregated history table, stored as CSV.
//!
//! Columns: `date,centroid_lat,centroid_lon,area,geometry_wkt,name`. Dates
//! are written as `YYYY-MM-DD` so they reload as calendar dates; midnight
//! timestamps left by other writers load as their date. Tables written
//! without the `name` column still load.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use frontline_models::AggregatedRow;
use frontline_snapshot::fs::write_atomically;

use crate::AggregateError;

/// Loads the table, or `None` if it does not exist yet.
///
/// # Errors
///
/// Returns [`AggregateError`] if the file exists but cannot be parsed.
pub fn load_table(path: &Path) -> Result<Option<Vec<AggregatedRow>>, AggregateError> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<AggregatedRow>, _>>()?;

    log::debug!("Loaded {} rows from {}", rows.len(), path.display());

    Ok(Some(rows))
}

/// Returns the distinct dates present in the table.
#[must_use]
pub fn covered_dates(rows: &[AggregatedRow]) -> BTreeSet<NaiveDate> {
    rows.iter().map(|row| row.date).collect()
}

/// Writes the full table, replacing the previous file atomically.
///
/// # Errors
///
/// Returns [`AggregateError`] if serialization or the write fails.
pub fn save_table(path: &Path, rows: &[AggregatedRow]) -> Result<(), AggregateError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AggregateError::Io(e.into_error()))?;

    write_atomically(path, &bytes)?;

    Ok(())
}
