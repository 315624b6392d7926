//! Selects the eligible polygons and unions them into one region.
//!
//! Only features whose geometry is a single [`Polygon`] and whose label is
//! in the configured category set take part. Multipolygons are excluded
//! even when they carry a matching label.

use std::collections::BTreeSet;

use geo::{MultiPolygon, Polygon, unary_union};

use crate::{Feature, FeatureGeometry};

/// Returns the polygons eligible for the merge, in input order.
#[must_use]
pub fn select_polygons<'a>(
    features: &'a [Feature],
    categories: &[String],
) -> Vec<&'a Polygon<f64>> {
    let wanted: BTreeSet<&str> = categories.iter().map(String::as_str).collect();

    features
        .iter()
        .filter_map(|feature| match &feature.geometry {
            FeatureGeometry::Polygon(polygon) if wanted.contains(feature.name.as_str()) => {
                Some(polygon)
            }
            FeatureGeometry::Polygon(_)
            | FeatureGeometry::MultiPolygon(_)
            | FeatureGeometry::Other(_) => None,
        })
        .collect()
}

/// Unions every eligible polygon into a single region.
///
/// The result has one part when the inputs form a connected area, several
/// parts otherwise, and none when nothing matched.
#[must_use]
pub fn merge_polygons(features: &[Feature], categories: &[String]) -> MultiPolygon<f64> {
    let selected = select_polygons(features, categories);

    log::info!(
        "Selected {} of {} features for the merge",
        selected.len(),
        features.len()
    );

    if selected.is_empty() {
        log::warn!("No polygons matched categories {categories:?}; merged region is empty");
        return MultiPolygon::new(Vec::new());
    }

    let merged = unary_union(selected);
    log::debug!("Union produced {} part(s)", merged.0.len());

    merged
}

#[cfg(test)]
mod tests {
    use geo::{Area, polygon};

    use super::*;

    fn categories() -> Vec<String> {
        frontline_models::DEFAULT_CATEGORIES
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn square(x: f64, y: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
            (x: x, y: y),
        ]
    }

    fn feature(name: &str, geometry: FeatureGeometry) -> Feature {
        Feature {
            name: name.to_string(),
            geometry,
        }
    }

    #[test]
    fn selects_only_matching_strict_polygons() {
        let features = vec![
            feature("CADR and CALR", FeatureGeometry::Polygon(square(0.0, 0.0))),
            feature("Occupied", FeatureGeometry::Polygon(square(10.0, 0.0))),
            feature("Other", FeatureGeometry::Polygon(square(20.0, 0.0))),
            feature(
                "Occupied",
                FeatureGeometry::MultiPolygon(MultiPolygon::new(vec![square(30.0, 0.0)])),
            ),
        ];

        let selected = select_polygons(&features, &categories());
        assert_eq!(selected, vec![&square(0.0, 0.0), &square(10.0, 0.0)]);

        let merged = merge_polygons(&features, &categories());
        assert_eq!(merged.0.len(), 2);
        assert!((merged.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn union_of_overlapping_polygons_is_one_part() {
        let features = vec![
            feature("Occupied", FeatureGeometry::Polygon(square(0.0, 0.0))),
            feature("Occupied Crimea", FeatureGeometry::Polygon(square(0.5, 0.0))),
        ];

        let merged = merge_polygons(&features, &categories());
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn union_is_order_independent() {
        let a = feature("Occupied", FeatureGeometry::Polygon(square(0.0, 0.0)));
        let b = feature("Occupied", FeatureGeometry::Polygon(square(0.5, 0.5)));

        let forward = merge_polygons(&[a.clone(), b.clone()], &categories());
        let backward = merge_polygons(&[b, a], &categories());
        assert!((forward.unsigned_area() - backward.unsigned_area()).abs() < 1e-9);
    }

    #[test]
    fn no_match_yields_empty_region() {
        let features = vec![feature("Liberated", FeatureGeometry::Polygon(square(0.0, 0.0)))];
        assert!(merge_polygons(&features, &categories()).0.is_empty());
    }

    #[test]
    fn honours_custom_category_set() {
        let features = vec![
            feature("Liberated", FeatureGeometry::Polygon(square(0.0, 0.0))),
            feature("Occupied", FeatureGeometry::Polygon(square(5.0, 0.0))),
        ];
        let selected = select_polygons(&features, &["Liberated".to_string()]);
        assert_eq!(selected, vec![&square(0.0, 0.0)]);
    }
}
