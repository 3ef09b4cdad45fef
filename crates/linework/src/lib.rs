//! linework: topology-aware polyline and polygon generalization
//! (sans-IO).
//!
//! Reduces the vertex count of lines and polygon boundaries while
//! bounding how far the simplified shape may deviate from the
//! original. Three entry points, from cheapest to strongest guarantee:
//!
//! - [`simplify`] -- distance-based (Ramer-Douglas-Peucker) reduction
//!   applied independently per component. Fast; may introduce
//!   self-intersections, which the optional repair step dissolves for
//!   polygonal output.
//! - [`simplify_area`] -- area-based (Visvalingam-Whyatt) reduction,
//!   same per-component independence and repair toggle.
//! - [`simplify_preserving_topology`] -- batch-consistent reduction
//!   that never lets a simplified line cross itself, other simplified
//!   lines, or not-yet-simplified lines of the same input.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! [`geo::Geometry`] values and returns new ones.
//!
//! The point-reduction algorithms are also exposed directly as
//! [`distance::reduce`] and [`area::reduce`] for callers working with
//! raw coordinate sequences.

pub mod area;
pub mod diagnostics;
pub mod distance;
mod driver;
pub mod index;
pub mod tagged;
pub mod topology;
pub mod types;

use geo::Geometry;

pub use diagnostics::{SimplifySummary, summarize};
pub use types::{SimplifyConfig, SimplifyError};

/// Simplify a geometry with the distance-based (Douglas-Peucker)
/// algorithm, repairing polygonal self-intersections.
///
/// Every removed vertex lies within `tolerance` of the simplified
/// line. Components are simplified independently, so separate lines
/// may end up crossing; use [`simplify_preserving_topology`] when that
/// matters. Rings that degenerate below 4 coordinates are dropped from
/// their polygon -- a polygon whose exterior degenerates becomes empty.
///
/// Equivalent to [`simplify_with`] with [`SimplifyConfig::new`].
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if `tolerance` is
/// negative.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, line_string};
///
/// let line = Geometry::LineString(line_string![
///     (x: 0.0, y: 0.0),
///     (x: 1.0, y: 0.0),
///     (x: 2.0, y: 0.0),
/// ]);
/// let simplified = linework::simplify(&line, 1.0)?;
/// assert_eq!(
///     simplified,
///     Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]),
/// );
/// # Ok::<(), linework::SimplifyError>(())
/// ```
pub fn simplify(geometry: &Geometry<f64>, tolerance: f64) -> Result<Geometry<f64>, SimplifyError> {
    driver::simplify_distance(geometry, &SimplifyConfig::new(tolerance))
}

/// [`simplify`] with explicit configuration, including the polygonal
/// repair toggle.
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if the configured
/// tolerance is negative.
pub fn simplify_with(
    geometry: &Geometry<f64>,
    config: &SimplifyConfig,
) -> Result<Geometry<f64>, SimplifyError> {
    driver::simplify_distance(geometry, config)
}

/// Simplify a geometry with the area-based (Visvalingam-Whyatt)
/// algorithm, repairing polygonal self-intersections.
///
/// Vertices are removed smallest-effective-area first until every
/// remaining vertex's triangle area reaches `tolerance * tolerance`.
/// Tends to preserve shape character better than distance-based
/// reduction at equal vertex counts.
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if `tolerance` is
/// negative.
pub fn simplify_area(
    geometry: &Geometry<f64>,
    tolerance: f64,
) -> Result<Geometry<f64>, SimplifyError> {
    driver::simplify_area(geometry, &SimplifyConfig::new(tolerance))
}

/// [`simplify_area`] with explicit configuration, including the
/// polygonal repair toggle.
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if the configured
/// tolerance is negative.
pub fn simplify_area_with(
    geometry: &Geometry<f64>,
    config: &SimplifyConfig,
) -> Result<Geometry<f64>, SimplifyError> {
    driver::simplify_area(geometry, config)
}

/// Simplify a geometry while preserving topology.
///
/// All linear components are simplified as one batch against shared
/// spatial indices: a span is only flattened when the replacement
/// segment stays within `tolerance`, cannot drop its line below the
/// minimum coordinate count (2 for open lines, 4 for rings), and does
/// not properly cross any other component's simplified or still
/// original geometry. The guarantee is relative to this input only --
/// lines simplified in separate calls know nothing about each other.
///
/// Empty input is returned as an empty copy without processing.
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if `tolerance` is
/// negative.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, polygon};
///
/// let square = Geometry::Polygon(polygon![
///     (x: 0.0, y: 0.0),
///     (x: 10.0, y: 0.0),
///     (x: 10.0, y: 10.0),
///     (x: 0.0, y: 10.0),
///     (x: 0.0, y: 0.0),
/// ]);
/// // Even an absurd tolerance cannot collapse the ring below 4
/// // coordinates.
/// let simplified = linework::simplify_preserving_topology(&square, 1e9)?;
/// let Geometry::Polygon(polygon) = simplified else {
///     unreachable!();
/// };
/// assert!(polygon.exterior().0.len() >= 4);
/// # Ok::<(), linework::SimplifyError>(())
/// ```
pub fn simplify_preserving_topology(
    geometry: &Geometry<f64>,
    tolerance: f64,
) -> Result<Geometry<f64>, SimplifyError> {
    driver::simplify_topology(geometry, tolerance)
}
