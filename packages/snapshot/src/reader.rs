//! Reads snapshot artifacts back into typed geometry.

use std::path::Path;

use frontline_geometry::FeatureGeometry;
use geojson::GeoJson;

use crate::SnapshotError;

/// One geometry row of a snapshot artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFeature {
    /// The feature's `name` property, if it has one.
    pub name: Option<String>,
    /// Two-dimensional geometry.
    pub geometry: FeatureGeometry,
}

/// Reads every non-null geometry from a snapshot file.
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the file cannot be read or is not valid
/// `GeoJSON`.
pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotFeature>, SnapshotError> {
    let body = std::fs::read_to_string(path)?;
    let geojson: GeoJson = body.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![geojson::Feature::from(geometry)],
    };

    let mut rows = Vec::with_capacity(features.len());

    for feature in features {
        let name = feature
            .property("name")
            .and_then(serde_json::Value::as_str)
            .map(String::from);

        let Some(geometry) = feature.geometry else {
            log::debug!("Skipping feature without geometry in {}", path.display());
            continue;
        };

        let geometry: geo::Geometry<f64> = geometry.try_into()?;

        rows.push(SnapshotFeature {
            name,
            geometry: FeatureGeometry::from(geometry),
        });
    }

    Ok(rows)
}
