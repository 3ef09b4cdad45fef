//! Before/after metrics for tuning simplification parameters.
//!
//! These metrics are permanent instrumentation, not debug scaffolding:
//! callers experimenting with tolerances compare summaries across runs
//! to pick a value. The summary is purely observational -- nothing in
//! the simplification path depends on it -- and serializes cleanly for
//! logging or UI display.

use geo::{CoordsIter, Geometry};
use serde::{Deserialize, Serialize};

/// Vertex and component counts for one simplification run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifySummary {
    /// The tolerance the run used.
    pub tolerance: f64,
    /// Linear components (lines and rings) in the original geometry.
    pub components: usize,
    /// Total coordinate count before simplification.
    pub points_before: usize,
    /// Total coordinate count after simplification.
    pub points_after: usize,
    /// Fraction of coordinates removed, in `0.0..=1.0`.
    pub reduction: f64,
}

/// Summarize a simplification run from its input and output shapes.
#[must_use]
pub fn summarize(
    original: &Geometry<f64>,
    simplified: &Geometry<f64>,
    tolerance: f64,
) -> SimplifySummary {
    let points_before = original.coords_count();
    let points_after = simplified.coords_count();
    #[allow(clippy::cast_precision_loss)]
    let reduction = if points_before == 0 {
        0.0
    } else {
        1.0 - points_after as f64 / points_before as f64
    };
    SimplifySummary {
        tolerance,
        components: linear_components(original),
        points_before,
        points_after,
        reduction,
    }
}

/// Count the lines and rings a geometry contains.
fn linear_components(geometry: &Geometry<f64>) -> usize {
    match geometry {
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => 0,
        Geometry::LineString(_) => 1,
        Geometry::MultiLineString(multi) => multi.0.len(),
        Geometry::Polygon(polygon) => 1 + polygon.interiors().len(),
        Geometry::MultiPolygon(polygons) => polygons
            .0
            .iter()
            .map(|polygon| 1 + polygon.interiors().len())
            .sum(),
        Geometry::GeometryCollection(collection) => {
            collection.iter().map(linear_components).sum()
        }
    }
}
