//! Geometry-level drivers: walk a geometry tree and simplify every
//! linear component.
//!
//! Three walks share one shape. The distance and area drivers reduce
//! each coordinate sequence independently and police ring validity
//! afterwards (degenerate rings are dropped, polygonal output is
//! optionally repaired). The topology driver instead collects every
//! linear component into one tagged batch, simplifies them against
//! shared spatial indices, and rebuilds the tree from the batch
//! results.

use geo::{
    BooleanOps, Coord, Geometry, GeometryCollection, HasDimensions, LineString, MultiLineString,
    MultiPolygon, Polygon,
};

use crate::tagged::{LineId, MINIMUM_OPEN_SIZE, MINIMUM_RING_SIZE, TaggedLine};
use crate::topology::simplify_lines;
use crate::types::{SimplifyConfig, SimplifyError, check_tolerance};
use crate::{area, distance};

/// Per-sequence point reducer applied by the distance and area walks.
type Reducer<'a> = &'a dyn Fn(&[Coord<f64>]) -> Vec<Coord<f64>>;

/// Distance-based (Douglas-Peucker) driver.
pub(crate) fn simplify_distance(
    geometry: &Geometry<f64>,
    config: &SimplifyConfig,
) -> Result<Geometry<f64>, SimplifyError> {
    check_tolerance(config.tolerance)?;
    let reduce: Reducer<'_> = &|points| distance::reduce_points(points, config.tolerance);
    Ok(transform(geometry, reduce, config.ensure_valid))
}

/// Area-based (Visvalingam-Whyatt) driver.
pub(crate) fn simplify_area(
    geometry: &Geometry<f64>,
    config: &SimplifyConfig,
) -> Result<Geometry<f64>, SimplifyError> {
    check_tolerance(config.tolerance)?;
    let reduce: Reducer<'_> = &|points| area::reduce_points(points, config.tolerance);
    Ok(transform(geometry, reduce, config.ensure_valid))
}

/// Topology-preserving driver.
pub(crate) fn simplify_topology(
    geometry: &Geometry<f64>,
    tolerance: f64,
) -> Result<Geometry<f64>, SimplifyError> {
    check_tolerance(tolerance)?;
    if geometry.is_empty() {
        return Ok(geometry.clone());
    }

    let mut lines = Vec::new();
    collect_lines(geometry, &mut lines);
    simplify_lines(&mut lines, tolerance);

    let mut cursor = 0;
    Ok(rebuild(geometry, &lines, &mut cursor))
}

// ---------------------------------------------------------------------------
// Independent per-component reduction (distance and area drivers)
// ---------------------------------------------------------------------------

fn transform(geometry: &Geometry<f64>, reduce: Reducer<'_>, ensure_valid: bool) -> Geometry<f64> {
    match geometry {
        // Points carry no removable vertices; Line, Rect and Triangle
        // are already minimal.
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => geometry.clone(),

        Geometry::LineString(line) => Geometry::LineString(LineString::new(reduce(&line.0))),

        Geometry::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::new(
            lines
                .0
                .iter()
                .map(|line| LineString::new(reduce(&line.0)))
                .collect(),
        )),

        Geometry::Polygon(polygon) => match transform_polygon(polygon, reduce) {
            Some(simplified) if ensure_valid => repaired_polygon(simplified),
            Some(simplified) => Geometry::Polygon(simplified),
            // The shell degenerated: the whole polygon is gone.
            None => Geometry::Polygon(Polygon::new(LineString::new(Vec::new()), Vec::new())),
        },

        Geometry::MultiPolygon(polygons) => {
            let kept = MultiPolygon::new(
                polygons
                    .0
                    .iter()
                    .filter_map(|polygon| transform_polygon(polygon, reduce))
                    .collect(),
            );
            if ensure_valid && !kept.is_empty() {
                Geometry::MultiPolygon(kept.union(&MultiPolygon::<f64>::new(Vec::new())))
            } else {
                Geometry::MultiPolygon(kept)
            }
        }

        Geometry::GeometryCollection(collection) => {
            Geometry::GeometryCollection(GeometryCollection::from(
                collection
                    .iter()
                    .map(|child| transform(child, reduce, ensure_valid))
                    .collect::<Vec<_>>(),
            ))
        }
    }
}

/// Simplify a polygon's rings. Returns `None` when the exterior shell
/// degenerates; degenerate interior rings are silently dropped.
fn transform_polygon(polygon: &Polygon<f64>, reduce: Reducer<'_>) -> Option<Polygon<f64>> {
    let shell = transform_ring(polygon.exterior(), reduce)?;
    let holes = polygon
        .interiors()
        .iter()
        .filter_map(|ring| transform_ring(ring, reduce))
        .collect();
    Some(Polygon::new(shell, holes))
}

/// Reduce a ring's coordinates. Returns `None` when the result is no
/// longer a valid ring: fewer than 4 coordinates, or not closed.
fn transform_ring(ring: &LineString<f64>, reduce: Reducer<'_>) -> Option<LineString<f64>> {
    let points = reduce(&ring.0);
    let valid = points.len() >= MINIMUM_RING_SIZE && points.first() == points.last();
    valid.then(|| LineString::new(points))
}

/// Repair a simplified polygon whose rings may now self-intersect.
///
/// Union with an empty geometry re-nodes the rings, dissolving any
/// crossings the reduction introduced; the result can be more than
/// one polygon.
fn repaired_polygon(polygon: Polygon<f64>) -> Geometry<f64> {
    if polygon.is_empty() {
        return Geometry::Polygon(polygon);
    }
    let mut repaired = polygon.union(&MultiPolygon::<f64>::new(Vec::new()));
    if repaired.0.len() == 1 {
        match repaired.0.pop() {
            Some(only) => Geometry::Polygon(only),
            None => Geometry::MultiPolygon(repaired),
        }
    } else {
        Geometry::MultiPolygon(repaired)
    }
}

// ---------------------------------------------------------------------------
// Batch collection and rebuild (topology driver)
// ---------------------------------------------------------------------------

/// Collect every linear component as a tagged line, in a fixed
/// traversal order (exterior ring before interiors, children in
/// collection order). [`rebuild`] consumes results in the same order.
fn collect_lines(geometry: &Geometry<f64>, lines: &mut Vec<TaggedLine>) {
    match geometry {
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => {}

        Geometry::LineString(line) => collect_line(line, lines),

        Geometry::MultiLineString(multi) => {
            for line in &multi.0 {
                collect_line(line, lines);
            }
        }

        Geometry::Polygon(polygon) => collect_polygon(polygon, lines),

        Geometry::MultiPolygon(polygons) => {
            for polygon in &polygons.0 {
                collect_polygon(polygon, lines);
            }
        }

        Geometry::GeometryCollection(collection) => {
            for child in collection {
                collect_lines(child, lines);
            }
        }
    }
}

fn collect_polygon(polygon: &Polygon<f64>, lines: &mut Vec<TaggedLine>) {
    collect_line(polygon.exterior(), lines);
    for ring in polygon.interiors() {
        collect_line(ring, lines);
    }
}

fn collect_line(line: &LineString<f64>, lines: &mut Vec<TaggedLine>) {
    let minimum_size = if line.is_closed() {
        MINIMUM_RING_SIZE
    } else {
        MINIMUM_OPEN_SIZE
    };
    lines.push(TaggedLine::new(
        line.0.clone(),
        minimum_size,
        LineId::new(lines.len()),
    ));
}

fn rebuild(geometry: &Geometry<f64>, lines: &[TaggedLine], cursor: &mut usize) -> Geometry<f64> {
    match geometry {
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => geometry.clone(),

        Geometry::LineString(_) => Geometry::LineString(next_line(lines, cursor)),

        Geometry::MultiLineString(multi) => Geometry::MultiLineString(MultiLineString::new(
            multi.0.iter().map(|_| next_line(lines, cursor)).collect(),
        )),

        Geometry::Polygon(polygon) => Geometry::Polygon(rebuild_polygon(polygon, lines, cursor)),

        Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon::new(
            polygons
                .0
                .iter()
                .map(|polygon| rebuild_polygon(polygon, lines, cursor))
                .collect(),
        )),

        Geometry::GeometryCollection(collection) => {
            Geometry::GeometryCollection(GeometryCollection::from(
                collection
                    .iter()
                    .map(|child| rebuild(child, lines, cursor))
                    .collect::<Vec<_>>(),
            ))
        }
    }
}

fn rebuild_polygon(
    polygon: &Polygon<f64>,
    lines: &[TaggedLine],
    cursor: &mut usize,
) -> Polygon<f64> {
    let shell = next_line(lines, cursor);
    let holes = polygon
        .interiors()
        .iter()
        .map(|_| next_line(lines, cursor))
        .collect();
    Polygon::new(shell, holes)
}

/// The next batch line's simplified coordinates, falling back to the
/// original coordinates for degenerate lines the batch skipped.
fn next_line(lines: &[TaggedLine], cursor: &mut usize) -> LineString<f64> {
    let line = &lines[*cursor];
    *cursor += 1;
    let coords = line.result_coordinates();
    if coords.is_empty() {
        LineString::new(line.coordinates().to_vec())
    } else {
        LineString::new(coords)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use geo::{Area, CoordsIter, line_string, polygon};

    use super::*;
    use crate::topology::has_interior_intersection;

    fn square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]
    }

    fn no_repair(tolerance: f64) -> SimplifyConfig {
        SimplifyConfig {
            tolerance,
            ensure_valid: false,
        }
    }

    // --- distance driver ---

    #[test]
    fn polygon_bump_removed() {
        let bumpy: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 0.1, y: 10.1),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 0.0),
        ];
        let result =
            simplify_distance(&Geometry::Polygon(bumpy), &no_repair(1.0)).unwrap();
        let Geometry::Polygon(simplified) = result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert_eq!(simplified.exterior().0.len(), 5);
        assert!(!simplified.exterior().0.contains(&Coord { x: 0.1, y: 10.1 }));
    }

    #[test]
    fn repair_preserves_valid_polygons() {
        let result =
            simplify_distance(&Geometry::Polygon(square()), &SimplifyConfig::new(1.0)).unwrap();
        let Geometry::Polygon(simplified) = result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert!((simplified.unsigned_area() - 100.0).abs() < 1e-9);
        assert_eq!(simplified.exterior().0.len(), 5);
    }

    #[test]
    fn degenerate_hole_is_dropped() {
        let with_hole = Polygon::new(
            square().exterior().clone(),
            vec![line_string![
                (x: 2.0, y: 2.0),
                (x: 3.0, y: 2.0),
                (x: 3.0, y: 3.0),
                (x: 2.0, y: 2.0),
            ]],
        );
        let result =
            simplify_distance(&Geometry::Polygon(with_hole), &no_repair(1.0)).unwrap();
        let Geometry::Polygon(simplified) = result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert!(simplified.interiors().is_empty());
        assert_eq!(simplified.exterior().0.len(), 5);
    }

    #[test]
    fn degenerate_shell_empties_polygon() {
        let tiny: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let result = simplify_distance(&Geometry::Polygon(tiny), &no_repair(1.0)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn degenerate_member_dropped_from_multipolygon() {
        let tiny: Polygon<f64> = polygon![
            (x: 20.0, y: 20.0),
            (x: 21.0, y: 20.0),
            (x: 21.0, y: 21.0),
            (x: 20.0, y: 20.0),
        ];
        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![square(), tiny]));
        let result = simplify_distance(&multi, &no_repair(1.0)).unwrap();
        let Geometry::MultiPolygon(simplified) = result else {
            panic!("expected a multipolygon, got {result:?}");
        };
        assert_eq!(simplified.0.len(), 1);
    }

    #[test]
    fn points_pass_through_untouched() {
        let point = Geometry::Point(geo::Point::new(1.0, 2.0));
        assert_eq!(
            simplify_distance(&point, &no_repair(5.0)).unwrap(),
            point,
        );
    }

    #[test]
    fn collection_recurses() {
        let collection = Geometry::GeometryCollection(GeometryCollection::from(vec![
            Geometry::LineString(line_string![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 2.0, y: 0.0),
            ]),
            Geometry::Point(geo::Point::new(7.0, 7.0)),
        ]));
        let result = simplify_distance(&collection, &no_repair(1.0)).unwrap();
        let Geometry::GeometryCollection(children) = result else {
            panic!("expected a collection, got {result:?}");
        };
        assert_eq!(
            children.0[0],
            Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]),
        );
        assert_eq!(children.0[1], Geometry::Point(geo::Point::new(7.0, 7.0)));
    }

    // --- area driver ---

    #[test]
    fn area_driver_removes_low_area_vertex() {
        let notched: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 5.0, y: 10.1),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let result = simplify_area(&Geometry::Polygon(notched), &no_repair(1.0)).unwrap();
        let Geometry::Polygon(simplified) = result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert_eq!(simplified.exterior().0.len(), 5);
        assert!(!simplified.exterior().0.contains(&Coord { x: 5.0, y: 10.1 }));
    }

    // --- topology driver ---

    #[test]
    fn empty_input_returns_empty_copy() {
        let empty = Geometry::MultiLineString(MultiLineString::new(Vec::new()));
        assert_eq!(simplify_topology(&empty, 1.0).unwrap(), empty);
    }

    #[test]
    fn negative_tolerance_rejected_by_all_drivers() {
        let geometry = Geometry::Polygon(square());
        assert_eq!(
            simplify_distance(&geometry, &no_repair(-1.0)),
            Err(SimplifyError::NegativeTolerance(-1.0)),
        );
        assert_eq!(
            simplify_area(&geometry, &no_repair(-1.0)),
            Err(SimplifyError::NegativeTolerance(-1.0)),
        );
        assert_eq!(
            simplify_topology(&geometry, -1.0),
            Err(SimplifyError::NegativeTolerance(-1.0)),
        );
    }

    #[test]
    fn topology_keeps_ring_size() {
        let result = simplify_topology(&Geometry::Polygon(square()), 100.0).unwrap();
        let Geometry::Polygon(simplified) = result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert!(simplified.exterior().0.len() >= MINIMUM_RING_SIZE);
        assert!(simplified.exterior().is_closed());
    }

    #[test]
    fn distance_driver_may_cross_where_topology_driver_does_not() {
        // The first line's shallow bump flattens to a chord that
        // crosses the second line's retained peak.
        let lines = Geometry::MultiLineString(MultiLineString::new(vec![
            line_string![(x: 0.0, y: 2.0), (x: 5.0, y: 2.5), (x: 10.0, y: 2.0)],
            line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 2.2), (x: 10.0, y: 0.0)],
        ]));

        let crossing_pairs = |geometry: &Geometry<f64>| -> usize {
            let Geometry::MultiLineString(multi) = geometry else {
                panic!("expected a multilinestring, got {geometry:?}");
            };
            let segments: Vec<Vec<_>> = multi
                .0
                .iter()
                .map(|line| line.lines().collect::<Vec<_>>())
                .collect();
            segments[0]
                .iter()
                .filter(|a| {
                    segments[1]
                        .iter()
                        .any(|b| has_interior_intersection(a, b))
                })
                .count()
        };

        let plain = simplify_distance(&lines, &no_repair(1.0)).unwrap();
        assert!(crossing_pairs(&plain) > 0);

        let preserved = simplify_topology(&lines, 1.0).unwrap();
        assert_eq!(crossing_pairs(&preserved), 0);
    }

    #[test]
    fn adjacent_rings_keep_shared_boundary_consistent() {
        // Two rectangles sharing a vertical edge with a small bump at
        // its midpoint. Both rings straighten the shared edge, and the
        // straightened edges coincide.
        let left: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 5.0, y: 0.0),
            (x: 5.1, y: 5.0),
            (x: 5.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let right: Polygon<f64> = polygon![
            (x: 5.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 5.0, y: 10.0),
            (x: 5.1, y: 5.0),
            (x: 5.0, y: 0.0),
        ];
        let pair = Geometry::MultiPolygon(MultiPolygon::new(vec![left, right]));

        let result = simplify_topology(&pair, 1.0).unwrap();
        let Geometry::MultiPolygon(simplified) = result else {
            panic!("expected a multipolygon, got {result:?}");
        };

        let bump = Coord { x: 5.1, y: 5.0 };
        for polygon in &simplified.0 {
            assert_eq!(polygon.exterior().0.len(), 5);
            assert!(!polygon.exterior().0.contains(&bump));
        }

        // No proper crossing between the two simplified boundaries.
        let rings: Vec<Vec<_>> = simplified
            .0
            .iter()
            .map(|polygon| polygon.exterior().lines().collect::<Vec<_>>())
            .collect();
        for a in &rings[0] {
            for b in &rings[1] {
                assert!(!has_interior_intersection(a, b));
            }
        }
    }

    #[test]
    fn topology_driver_counts_match_structure() {
        // One polygon with a hole plus a line: four linear components
        // total, rebuilt in collection order.
        let with_hole = Polygon::new(
            square().exterior().clone(),
            vec![line_string![
                (x: 2.0, y: 2.0),
                (x: 3.0, y: 2.0),
                (x: 3.0, y: 3.0),
                (x: 2.0, y: 3.0),
                (x: 2.0, y: 2.0),
            ]],
        );
        let collection = Geometry::GeometryCollection(GeometryCollection::from(vec![
            Geometry::Polygon(with_hole),
            Geometry::LineString(line_string![
                (x: 20.0, y: 20.0),
                (x: 21.0, y: 20.0),
                (x: 22.0, y: 20.0),
            ]),
        ]));

        let result = simplify_topology(&collection, 0.5).unwrap();
        let Geometry::GeometryCollection(children) = result else {
            panic!("expected a collection, got {result:?}");
        };
        let Geometry::Polygon(polygon) = &children.0[0] else {
            panic!("expected a polygon, got {:?}", children.0[0]);
        };
        assert_eq!(polygon.interiors().len(), 1);
        assert!(polygon.exterior().0.len() >= MINIMUM_RING_SIZE);
        assert!(polygon.interiors()[0].0.len() >= MINIMUM_RING_SIZE);

        let Geometry::LineString(line) = &children.0[1] else {
            panic!("expected a linestring, got {:?}", children.0[1]);
        };
        assert_eq!(line.coords_count(), 2);
    }
}
