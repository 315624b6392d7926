//! Removes union artifacts with a grow-then-shrink buffer.
//!
//! Adjacent polygons digitized independently rarely share bit-identical
//! edges, so their union leaves needle slivers and hairline gaps along
//! the seams. Buffering outward by a tiny epsilon and back inward by the
//! same amount closes every gap narrower than `2 * epsilon` while leaving
//! the macroscopic outline unchanged. Mitre joins keep corners sharp, so
//! the round trip does not round off the region's vertices.

use frontline_models::{DEFAULT_EPSILON, PipelineConfig};
use geo::algorithm::buffer::{BufferStyle, LineJoin};
use geo::{Buffer, MultiPolygon};

use crate::GeometryError;

/// Parameters of the buffer round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeartifactOptions {
    epsilon: f64,
    mitre_limit: f64,
}

impl Default for DeartifactOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            mitre_limit: 5.0,
        }
    }
}

impl DeartifactOptions {
    /// Creates validated options.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidOption`] unless both values are
    /// finite and positive.
    pub fn new(epsilon: f64, mitre_limit: f64) -> Result<Self, GeometryError> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(GeometryError::InvalidOption {
                message: format!("epsilon must be a positive finite number, got {epsilon}"),
            });
        }
        if !(mitre_limit.is_finite() && mitre_limit > 0.0) {
            return Err(GeometryError::InvalidOption {
                message: format!("mitre_limit must be a positive finite number, got {mitre_limit}"),
            });
        }
        Ok(Self {
            epsilon,
            mitre_limit,
        })
    }

    /// Builds options from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// See [`DeartifactOptions::new`].
    pub fn from_config(config: &PipelineConfig) -> Result<Self, GeometryError> {
        Self::new(config.epsilon, config.mitre_limit)
    }

    /// Buffer distance.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn style(&self, distance: f64) -> BufferStyle<f64> {
        BufferStyle::new(distance).line_join(LineJoin::Miter(self.mitre_limit))
    }
}

/// Erases sub-epsilon slivers and gaps from a merged region.
///
/// An empty region is returned unchanged.
#[must_use]
pub fn deartifact(region: &MultiPolygon<f64>, options: &DeartifactOptions) -> MultiPolygon<f64> {
    if region.0.is_empty() {
        return MultiPolygon::new(Vec::new());
    }

    let grown = region.buffer_with_style(options.style(options.epsilon));
    let cleaned = grown.buffer_with_style(options.style(-options.epsilon));

    log::debug!(
        "De-artifacting with epsilon {}: {} part(s) -> {} part(s)",
        options.epsilon,
        region.0.len(),
        cleaned.0.len()
    );

    cleaned
}

#[cfg(test)]
mod tests {
    use geo::{Area, BooleanOps, Polygon, polygon};

    use super::*;

    fn rect(x0: f64, x1: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: 0.0),
            (x: x1, y: 0.0),
            (x: x1, y: 1.0),
            (x: x0, y: 1.0),
        ]
    }

    #[test]
    fn abutting_squares_become_one_polygon() {
        let merged = rect(0.0, 1.0).union(&rect(1.0, 2.0));

        let cleaned = deartifact(&merged, &DeartifactOptions::default());

        assert_eq!(cleaned.0.len(), 1);
        assert!((cleaned.unsigned_area() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn closes_hairline_gap() {
        let merged = MultiPolygon::new(vec![rect(0.0, 1.0), rect(1.000_001, 2.0)]);
        assert_eq!(merged.0.len(), 2);

        let cleaned = deartifact(&merged, &DeartifactOptions::default());

        assert_eq!(cleaned.0.len(), 1);
        assert!((cleaned.unsigned_area() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn keeps_wide_gaps_open() {
        let merged = MultiPolygon::new(vec![rect(0.0, 1.0), rect(1.5, 2.5)]);

        let cleaned = deartifact(&merged, &DeartifactOptions::default());

        assert_eq!(cleaned.0.len(), 2);
    }

    #[test]
    fn empty_region_stays_empty() {
        let cleaned = deartifact(&MultiPolygon::new(Vec::new()), &DeartifactOptions::default());
        assert!(cleaned.0.is_empty());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        assert!(DeartifactOptions::new(0.0, 5.0).is_err());
        assert!(DeartifactOptions::new(-1e-6, 5.0).is_err());
        assert!(DeartifactOptions::new(f64::NAN, 5.0).is_err());
        assert!(DeartifactOptions::new(1e-6, 5.0).is_ok());
    }
}
