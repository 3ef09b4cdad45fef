//! Topology-preserving simplification: the per-line recursive
//! simplifier and the batch orchestrator that keeps spatial checks
//! consistent across lines.
//!
//! A span of a line may only be flattened to a single segment when the
//! flattening (a) stays within the distance tolerance, (b) cannot drop
//! the line below its minimum coordinate count even in the worst case,
//! and (c) does not cross any segment another line has already kept
//! nor any still-original segment of the batch. The last check is what
//! the two shared [`SegmentIndex`]es are for: "output" holds accepted
//! flattenings, "input" holds original geometry and shrinks as spans
//! are collapsed.

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Line};

use crate::distance::furthest_point;
use crate::index::{SegmentIndex, SegmentKey};
use crate::tagged::TaggedLine;

/// Simplify every line of a batch against shared input/output indices.
///
/// All lines' original segments are registered in the input index
/// before any simplification runs, so each line's checks see both
/// earlier lines' finalized output and later lines' untouched
/// originals. Lines are processed strictly in slice order; earlier
/// lines win contested flattenings and therefore simplify more freely.
pub fn simplify_lines(lines: &mut [TaggedLine], tolerance: f64) {
    let mut input_index = SegmentIndex::new();
    for line in lines.iter() {
        for segment in line.segments() {
            input_index.insert_tagged(segment);
        }
    }

    let mut output_index = SegmentIndex::new();
    for line in lines.iter_mut() {
        LineSimplifier::new(&mut input_index, &mut output_index, tolerance).simplify(line);
    }
}

/// Simplifies one tagged line, recursively deciding per span whether
/// flattening it is safe.
struct LineSimplifier<'a> {
    input_index: &'a mut SegmentIndex,
    output_index: &'a mut SegmentIndex,
    tolerance: f64,
}

impl<'a> LineSimplifier<'a> {
    const fn new(
        input_index: &'a mut SegmentIndex,
        output_index: &'a mut SegmentIndex,
        tolerance: f64,
    ) -> Self {
        Self {
            input_index,
            output_index,
            tolerance,
        }
    }

    fn simplify(&mut self, line: &mut TaggedLine) {
        let count = line.coordinates().len();
        if count < 2 {
            return;
        }
        self.simplify_section(line, 0, count - 1, 0);
    }

    fn simplify_section(&mut self, line: &mut TaggedLine, start: usize, end: usize, depth: usize) {
        let depth = depth + 1;

        if start + 1 == end {
            // A single segment is kept verbatim. It was never a
            // flattening candidate, so it stays in the input index and
            // is not added to the output index.
            line.add_to_result(line.segment(start).segment);
            return;
        }

        let mut valid = true;

        // If the result is still below the minimum coordinate count,
        // the worst case is that every remaining span flattens to one
        // segment each: `depth + 1` coordinates. Refuse to flatten
        // while that worst case would undershoot the minimum.
        if line.result_size() < line.minimum_size() && depth + 1 < line.minimum_size() {
            valid = false;
        }

        let (furthest, distance) = furthest_point(line.coordinates(), start, end);
        if distance > self.tolerance {
            valid = false;
        }

        if valid {
            let candidate = Line::new(line.coordinates()[start], line.coordinates()[end]);
            if self.has_bad_intersection(line, start, end, &candidate) {
                valid = false;
            }
        }

        if valid {
            self.flatten(line, start, end);
            return;
        }
        self.simplify_section(line, start, furthest, depth);
        self.simplify_section(line, furthest, end, depth);
    }

    /// Replace the span `[start, end]` with the single segment between
    /// its endpoints, updating both indices and the line's result.
    fn flatten(&mut self, line: &mut TaggedLine, start: usize, end: usize) {
        // The span's originals leave the input index before the
        // replacement is published, so later queries cannot collide
        // with geometry that no longer exists.
        for i in start..end {
            self.input_index.remove_tagged(line.segment(i));
        }
        let new_segment = Line::new(line.coordinates()[start], line.coordinates()[end]);
        self.output_index.insert(new_segment, None);
        line.add_to_result(new_segment);
    }

    fn has_bad_intersection(
        &self,
        line: &TaggedLine,
        start: usize,
        end: usize,
        candidate: &Line<f64>,
    ) -> bool {
        if self.has_bad_output_intersection(candidate) {
            return true;
        }
        self.has_bad_input_intersection(line, start, end, candidate)
    }

    fn has_bad_output_intersection(&self, candidate: &Line<f64>) -> bool {
        self.output_index
            .query(candidate)
            .iter()
            .any(|(segment, _)| has_interior_intersection(segment, candidate))
    }

    fn has_bad_input_intersection(
        &self,
        line: &TaggedLine,
        start: usize,
        end: usize,
        candidate: &Line<f64>,
    ) -> bool {
        self.input_index.query(candidate).iter().any(|(segment, key)| {
            has_interior_intersection(segment, candidate) && !in_section(line, start, end, *key)
        })
    }
}

/// Whether an indexed segment belongs to the span `[start, end)` of
/// `line` currently being collapsed.
///
/// The span's own segments are expected to intersect the candidate --
/// they are the geometry it replaces -- and are exempt from the veto.
/// Membership is a half-open range test on the segment's stored index,
/// gated on line handle equality.
fn in_section(line: &TaggedLine, start: usize, end: usize, key: Option<SegmentKey>) -> bool {
    key.is_some_and(|key| key.line == line.id() && key.index >= start && key.index < end)
}

/// Whether two segments meet at a point that is not an endpoint of one
/// of them.
///
/// A shared endpoint between consecutive segments does not count; one
/// segment's endpoint touching the other's interior does, as does a
/// collinear overlap extending past an endpoint. Coincident segments
/// overlap only at their mutual endpoints and are fine.
pub(crate) fn has_interior_intersection(a: &Line<f64>, b: &Line<f64>) -> bool {
    match line_intersection(*a, *b) {
        None => false,
        Some(LineIntersection::SinglePoint { intersection, .. }) => {
            !is_endpoint(intersection, a) || !is_endpoint(intersection, b)
        }
        Some(LineIntersection::Collinear { intersection }) => {
            [intersection.start, intersection.end]
                .into_iter()
                .any(|point| !is_endpoint(point, a) || !is_endpoint(point, b))
        }
    }
}

fn is_endpoint(point: Coord<f64>, segment: &Line<f64>) -> bool {
    point == segment.start || point == segment.end
}
