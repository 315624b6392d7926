#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry stages of the snapshot pipeline.
//!
//! Raw upstream features are normalized into two-dimensional [`Feature`]
//! values ([`normalize`]), the eligible polygons are unioned into one
//! region ([`merge`]), and the union's hairline slivers are erased with a
//! grow-then-shrink buffer ([`deartifact`]).

pub mod deartifact;
pub mod merge;
pub mod normalize;

use geo::{Geometry, MultiPolygon, Polygon};
use thiserror::Error;

pub use normalize::MalformedLabelError;

/// Errors that can occur while normalizing or cleaning geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The composite feature label did not have the expected shape.
    #[error(transparent)]
    MalformedLabel(#[from] MalformedLabelError),

    /// The raw geometry object is not valid `GeoJSON`.
    #[error("Invalid GeoJSON geometry: {0}")]
    Json(#[from] serde_json::Error),

    /// The `GeoJSON` geometry could not be converted to a `geo` geometry.
    #[error("GeoJSON conversion error: {0}")]
    Geojson(#[from] geojson::Error),

    /// A processing option is out of range.
    #[error("Invalid option: {message}")]
    InvalidOption {
        /// Description of what went wrong.
        message: String,
    },
}

/// The geometry kinds the pipeline distinguishes.
///
/// Only polygons and multipolygons carry territory; every other kind is
/// kept as [`FeatureGeometry::Other`] so each consumer has to decide
/// explicitly what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// A single polygon.
    Polygon(Polygon<f64>),
    /// A multi-part polygon.
    MultiPolygon(MultiPolygon<f64>),
    /// Points, lines, collections, etc.
    Other(Geometry<f64>),
}

impl FeatureGeometry {
    /// Short kind name for log messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Other(_) => "Other",
        }
    }

    /// Decomposes into constituent polygons.
    ///
    /// A multipolygon yields each of its parts; non-areal geometry yields
    /// nothing.
    #[must_use]
    pub fn into_polygons(self) -> Vec<Polygon<f64>> {
        match self {
            Self::Polygon(polygon) => vec![polygon],
            Self::MultiPolygon(multi) => multi.0,
            Self::Other(_) => Vec::new(),
        }
    }
}

impl From<Geometry<f64>> for FeatureGeometry {
    fn from(geometry: Geometry<f64>) -> Self {
        match geometry {
            Geometry::Polygon(polygon) => Self::Polygon(polygon),
            Geometry::MultiPolygon(multi) => Self::MultiPolygon(multi),
            other => Self::Other(other),
        }
    }
}

/// A normalized feature: a cleaned region label and a 2D geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Human-readable region label (e.g. `"Occupied"`).
    pub name: String,
    /// Two-dimensional geometry.
    pub geometry: FeatureGeometry,
}
