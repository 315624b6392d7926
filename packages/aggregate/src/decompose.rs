//! Decomposes snapshot geometry into per-polygon table rows.

use chrono::NaiveDate;
use frontline_geometry::FeatureGeometry;
use frontline_models::AggregatedRow;
use frontline_snapshot::SnapshotFeature;
use geo::{Area, Centroid, Polygon};
use wkt::ToWkt;

/// Builds the row for one polygon.
///
/// Returns `None` for a polygon without a centroid (an empty ring).
#[must_use]
pub fn polygon_row(
    date: NaiveDate,
    polygon: &Polygon<f64>,
    name: Option<&str>,
) -> Option<AggregatedRow> {
    let centroid = polygon.centroid()?;

    Some(AggregatedRow {
        date,
        centroid_lat: centroid.y(),
        centroid_lon: centroid.x(),
        area: polygon.unsigned_area(),
        geometry_wkt: spaced_wkt(polygon),
        name: name.map(String::from),
    })
}

/// Well-known text with a space after the tag and after each comma,
/// e.g. `POLYGON ((0 0, 1 0, 1 1, 0 0))`, matching the layout of tables
/// started by earlier tooling.
fn spaced_wkt(polygon: &Polygon<f64>) -> String {
    let compact = polygon.wkt_string();

    match compact.strip_prefix("POLYGON(") {
        Some(rings) => format!("POLYGON ({})", rings.replace(',', ", ")),
        None => compact,
    }
}

/// Builds every row contributed by one snapshot.
///
/// Polygons contribute one row, multipolygons one row per part, and any
/// other geometry nothing.
#[must_use]
pub fn snapshot_rows(date: NaiveDate, features: Vec<SnapshotFeature>) -> Vec<AggregatedRow> {
    let mut rows = Vec::new();

    for feature in features {
        let polygons = match feature.geometry {
            geometry @ (FeatureGeometry::Polygon(_) | FeatureGeometry::MultiPolygon(_)) => {
                geometry.into_polygons()
            }
            FeatureGeometry::Other(_) => {
                log::debug!("Ignoring non-polygon geometry for {date}");
                continue;
            }
        };

        rows.extend(
            polygons
                .iter()
                .filter_map(|polygon| polygon_row(date, polygon, feature.name.as_deref())),
        );
    }

    rows
}

#[cfg(test)]
mod tests {
    use geo::{Geometry, MultiPolygon, Point, polygon};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn square(x: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: 0.0),
            (x: x + size, y: 0.0),
            (x: x + size, y: size),
            (x: x, y: size),
        ]
    }

    #[test]
    fn computes_centroid_area_and_wkt() {
        let row = polygon_row(date(), &square(2.0, 2.0), Some("Occupied")).unwrap();

        assert!((row.centroid_lon - 3.0).abs() < 1e-12);
        assert!((row.centroid_lat - 1.0).abs() < 1e-12);
        assert!((row.area - 4.0).abs() < 1e-12);
        assert_eq!(
            row.geometry_wkt,
            "POLYGON ((2 0, 4 0, 4 2, 2 2, 2 0))"
        );
        assert_eq!(row.name.as_deref(), Some("Occupied"));
    }

    #[test]
    fn wkt_separates_rings_and_points_with_spaces() {
        let with_hole = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)]],
        );

        assert_eq!(
            spaced_wkt(&with_hole),
            "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))"
        );
    }

    #[test]
    fn multipolygon_contributes_one_row_per_part() {
        let region = MultiPolygon::new(vec![
            square(0.0, 1.0),
            square(10.0, 2.0),
            square(20.0, 3.0),
        ]);
        let rows = snapshot_rows(
            date(),
            vec![SnapshotFeature {
                name: None,
                geometry: FeatureGeometry::MultiPolygon(region),
            }],
        );

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.date == date()));
        let areas: Vec<f64> = rows.iter().map(|row| row.area).collect();
        assert_eq!(areas, vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn ignores_non_polygon_geometry() {
        let rows = snapshot_rows(
            date(),
            vec![
                SnapshotFeature {
                    name: Some("marker".to_string()),
                    geometry: FeatureGeometry::from(Geometry::Point(Point::new(1.0, 1.0))),
                },
                SnapshotFeature {
                    name: None,
                    geometry: FeatureGeometry::Polygon(square(0.0, 1.0)),
                },
            ],
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, None);
    }

    #[test]
    fn empty_multipolygon_contributes_nothing() {
        let rows = snapshot_rows(
            date(),
            vec![SnapshotFeature {
                name: None,
                geometry: FeatureGeometry::MultiPolygon(MultiPolygon::new(Vec::new())),
            }],
        );
        assert!(rows.is_empty());
    }
}
