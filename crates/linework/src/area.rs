//! Area-based point reduction using the Visvalingam-Whyatt algorithm.
//!
//! Each interior vertex carries an "effective area": the area of the
//! triangle it forms with its two current neighbours. The vertex with
//! the smallest effective area is removed and its neighbours' areas are
//! recomputed, until the smallest remaining area reaches the threshold.
//!
//! The threshold is the *square* of the distance tolerance, so the
//! removal criterion mixes an area with a squared length. Downstream
//! callers depend on this numeric scale; keep it.

use geo::Coord;

use crate::types::{SimplifyError, check_tolerance};

/// Null link in the vertex chain.
const NONE: usize = usize::MAX;

/// Reduce a coordinate sequence by repeatedly removing the vertex with
/// the smallest effective triangle area, until every remaining vertex's
/// area is at least `tolerance * tolerance`.
///
/// The first and last points are never removed. A single-point input is
/// returned duplicated so the result is always a valid 2-point line;
/// an empty input stays empty. A tolerance of `0.0` removes nothing.
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
    if points.is_empty() {
        return Vec::new();
    }

    let threshold = tolerance * tolerance;
    let n = points.len();

    // Doubly linked vertex chain as an arena: prev/next are index
    // vectors with a `NONE` sentinel, so unlinking is plain index
    // reassignment and the whole chain drops at once.
    let mut prev: Vec<usize> = (0..n).map(|i| if i == 0 { NONE } else { i - 1 }).collect();
    let mut next: Vec<usize> = (0..n)
        .map(|i| if i == n - 1 { NONE } else { i + 1 })
        .collect();

    // Endpoints get infinite area and are never candidates.
    let mut area = vec![f64::INFINITY; n];
    for i in 1..n.saturating_sub(1) {
        area[i] = triangle_area(points[i - 1], points[i], points[i + 1]);
    }

    // TODO: replace the full rescan with an area-keyed priority
    // structure to make each removal O(log n) instead of O(n).
    loop {
        let mut min_area = f64::INFINITY;
        let mut min_vertex = NONE;
        let mut i = 0;
        while i != NONE {
            if area[i] < min_area {
                min_area = area[i];
                min_vertex = i;
            }
            i = next[i];
        }

        if min_vertex == NONE || min_area >= threshold {
            break;
        }

        let p = prev[min_vertex];
        let nx = next[min_vertex];
        if p != NONE {
            next[p] = nx;
        }
        if nx != NONE {
            prev[nx] = p;
        }

        // Refresh the cached areas of the two surviving neighbours.
        if p != NONE && prev[p] != NONE {
            area[p] = triangle_area(points[prev[p]], points[p], points[next[p]]);
        }
        if nx != NONE && next[nx] != NONE {
            area[nx] = triangle_area(points[prev[nx]], points[nx], points[next[nx]]);
        }
    }

    let mut result = Vec::new();
    let mut i = 0;
    while i != NONE {
        result.push(points[i]);
        i = next[i];
    }

    // A lone survivor is duplicated so a valid 2-point line always
    // comes back.
    if result.len() < 2 {
        if let Some(&only) = result.first() {
            result.push(only);
        }
    }
    result
}

/// Absolute area of the triangle `(a, b, c)`.
fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    ((b.x - a.x).mul_add(c.y - a.y, -((c.x - a.x) * (b.y - a.y))) / 2.0).abs()
}
