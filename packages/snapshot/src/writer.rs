//! Serializes a cleaned region as a dated `GeoJSON` snapshot.
//!
//! The artifact is a `FeatureCollection` with a single feature whose
//! geometry is the whole region: a `Polygon` when the region has one part,
//! a `MultiPolygon` otherwise. An empty region is written as an empty
//! `MultiPolygon`, which readers treat as a valid "no coverage" snapshot.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::{SnapshotError, SnapshotNaming, fs};

/// Named CRS for WGS84 longitude/latitude.
const CRS84: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// Writes the snapshot for `date` into `dir`, replacing any snapshot
/// already written for that day.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the directory cannot be created or the
/// file cannot be written.
pub fn write_snapshot(
    dir: &Path,
    naming: &SnapshotNaming,
    date: NaiveDate,
    region: &MultiPolygon<f64>,
) -> Result<PathBuf, SnapshotError> {
    fs::ensure_dir(dir)?;

    let path = dir.join(naming.file_name(date));
    let collection = to_feature_collection(region);
    let body = serde_json::to_vec(&collection)?;

    fs::write_atomically(&path, &body)?;

    log::info!(
        "Wrote snapshot {} ({} part(s), {} bytes)",
        path.display(),
        region.0.len(),
        body.len()
    );

    Ok(path)
}

/// Builds the single-feature collection for a region.
#[must_use]
pub fn to_feature_collection(region: &MultiPolygon<f64>) -> FeatureCollection {
    let value = match region.0.as_slice() {
        [polygon] => Value::from(polygon),
        _ => Value::from(region),
    };

    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    };

    let mut crs = JsonObject::new();
    crs.insert(
        "crs".to_string(),
        serde_json::json!({"type": "name", "properties": {"name": CRS84}}),
    );

    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: Some(crs),
    }
}
