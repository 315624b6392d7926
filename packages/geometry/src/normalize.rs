//! Normalizes raw upstream features into [`Feature`] values.
//!
//! Upstream labels are composite identifiers such as
//! `"Occupied///Окупована///Occupied"`; the region label is the segment at
//! index 1. Geometries arrive as `GeoJSON` objects that may carry a third
//! ordinate, which is discarded during conversion so every later stage
//! works on plain `x`/`y` coordinates.

use frontline_models::RawFeature;
use thiserror::Error;

use crate::{Feature, FeatureGeometry, GeometryError};

/// Separator between the segments of a composite upstream label.
pub const LABEL_DELIMITER: &str = "///";

/// Index of the segment holding the region label.
const LABEL_SEGMENT: usize = 1;

/// A composite label with fewer than two `///`-separated segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed label {label:?}: expected at least two '///'-separated segments, found {segments}")]
pub struct MalformedLabelError {
    /// The offending raw label.
    pub label: String,
    /// Number of segments the label actually has.
    pub segments: usize,
}

/// Extracts the region label from a composite upstream label.
///
/// # Errors
///
/// Returns [`MalformedLabelError`] if the label has no segment at index 1.
pub fn extract_label(raw: &str) -> Result<String, MalformedLabelError> {
    raw.split(LABEL_DELIMITER)
        .nth(LABEL_SEGMENT)
        .map(|segment| segment.trim().to_string())
        .ok_or_else(|| MalformedLabelError {
            label: raw.to_string(),
            segments: raw.split(LABEL_DELIMITER).count(),
        })
}

/// Parses a raw `GeoJSON` geometry object into a 2D geometry.
///
/// `geo` coordinates only have `x` and `y`, so any `z`/`m` ordinates in
/// the input positions are dropped here.
///
/// # Errors
///
/// Returns [`GeometryError`] if the value is not a valid `GeoJSON`
/// geometry.
pub fn parse_geometry(value: &serde_json::Value) -> Result<FeatureGeometry, GeometryError> {
    let geometry: geojson::Geometry = serde_json::from_value(value.clone())?;
    let geometry: geo::Geometry<f64> = geometry.try_into()?;
    Ok(FeatureGeometry::from(geometry))
}

/// Normalizes a single raw feature.
///
/// # Errors
///
/// Returns [`GeometryError`] if the label is malformed or the geometry
/// cannot be parsed.
pub fn normalize_feature(raw: &RawFeature) -> Result<Feature, GeometryError> {
    let name = extract_label(&raw.name)?;
    let geometry = parse_geometry(&raw.geometry)?;
    Ok(Feature { name, geometry })
}

/// Normalizes every raw feature of one payload.
///
/// # Errors
///
/// Returns the first [`GeometryError`] encountered. A single malformed
/// record aborts the whole run.
pub fn normalize_features(raw: &[RawFeature]) -> Result<Vec<Feature>, GeometryError> {
    let features = raw
        .iter()
        .map(normalize_feature)
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Normalized {} features", features.len());

    Ok(features)
}
