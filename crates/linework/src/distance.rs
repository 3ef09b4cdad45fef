//! Distance-based point reduction using the Ramer-Douglas-Peucker
//! algorithm.
//!
//! Recursively selects the point with the maximum perpendicular
//! deviation from the chord between a section's endpoints: if even that
//! deviation is within tolerance the whole interior is discarded,
//! otherwise the section is split there and both halves are processed
//! independently.
//!
//! This is the reducer behind [`simplify`](crate::simplify) and the
//! per-section deviation test of the topology-preserving simplifier.

use geo::line_measures::Distance;
use geo::{Coord, Euclidean, Line, Point};

use crate::types::{SimplifyError, check_tolerance};

/// Reduce a coordinate sequence, keeping every point whose removal
/// would move the line by more than `tolerance`.
///
/// The first and last points are always retained. Sequences with fewer
/// than 3 points are returned unchanged. A tolerance of `0.0` removes
/// only exactly-collinear interior points.
///
/// # Errors
///
/// Returns [`SimplifyError::NegativeTolerance`] if `tolerance` is
/// negative.
pub fn reduce(points: &[Coord<f64>], tolerance: f64) -> Result<Vec<Coord<f64>>, SimplifyError> {
    check_tolerance(tolerance)?;
    Ok(reduce_points(points, tolerance))
}

/// Reduction body shared with the geometry drivers, which validate the
/// tolerance once up front.
pub(crate) fn reduce_points(points: &[Coord<f64>], tolerance: f64) -> Vec<Coord<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[points.len() - 1] = true;

    reduce_section(points, 0, points.len() - 1, tolerance, &mut kept);

    points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Recursive step: keep the furthest interior point of `[start, end]`
/// and split there, unless the whole section already fits the
/// tolerance.
fn reduce_section(
    points: &[Coord<f64>],
    start: usize,
    end: usize,
    tolerance: f64,
    kept: &mut [bool],
) {
    if end <= start + 1 {
        return;
    }

    let (furthest, max_distance) = furthest_point(points, start, end);
    if max_distance > tolerance {
        kept[furthest] = true;
        reduce_section(points, start, furthest, tolerance, kept);
        reduce_section(points, furthest, end, tolerance, kept);
    }
}

/// Find the interior point of `[start, end]` furthest from the chord
/// between the section endpoints, and its distance.
///
/// Ties are broken by the first occurrence scanning left to right. The
/// section must contain at least one interior point.
pub(crate) fn furthest_point(points: &[Coord<f64>], start: usize, end: usize) -> (usize, f64) {
    let chord = Line::new(points[start], points[end]);
    let mut max_index = start;
    let mut max_distance = -1.0;

    for k in (start + 1)..end {
        let distance = Euclidean.distance(&Point::from(points[k]), &chord);
        if distance > max_distance {
            max_distance = distance;
            max_index = k;
        }
    }

    (max_index, max_distance)
}
