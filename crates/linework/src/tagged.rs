//! Provenance-tagged line representation used by topology-preserving
//! simplification.
//!
//! Every line in a batch is wrapped as a [`TaggedLine`]: its original
//! coordinates split into [`TaggedSegment`]s that remember which line
//! they came from and where. The tags let the simplifier tell a
//! genuine crossing with *another* line apart from an expected
//! intersection with the very span it is about to collapse, even when
//! two lines carry coincident geometry.

use geo::{Coord, Line};

/// Minimum coordinate count for a simplified open line.
pub const MINIMUM_OPEN_SIZE: usize = 2;

/// Minimum coordinate count for a simplified closed ring (3 distinct
/// vertices plus the closing point).
pub const MINIMUM_RING_SIZE: usize = 4;

/// Handle identifying one line within a simplification batch.
///
/// Comparison is handle equality, not geometric equality: two lines
/// with identical coordinates are still distinct lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

impl LineId {
    /// Create a handle from a batch-local index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

/// A segment of a [`TaggedLine`], tagged with its provenance.
///
/// Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedSegment {
    /// The segment geometry.
    pub segment: Line<f64>,
    /// Handle of the owning line.
    pub parent: LineId,
    /// Position within the owning line's segment array.
    pub index: usize,
}

/// One line of a simplification batch: the original coordinates, their
/// tagged segments, and the growing list of segments the simplifier
/// has decided to keep.
///
/// The result list always forms a connected chain -- the simplifier
/// only ever appends a segment starting where the previous one ended --
/// so [`result_coordinates`](Self::result_coordinates) is a valid
/// coordinate sequence by construction.
#[derive(Debug, Clone)]
pub struct TaggedLine {
    id: LineId,
    coords: Vec<Coord<f64>>,
    segments: Vec<TaggedSegment>,
    result: Vec<Line<f64>>,
    minimum_size: usize,
}

impl TaggedLine {
    /// Wrap a line's coordinates, deriving one tagged segment per
    /// consecutive coordinate pair.
    ///
    /// `minimum_size` is the smallest coordinate count the simplified
    /// line may have: [`MINIMUM_OPEN_SIZE`] for open lines,
    /// [`MINIMUM_RING_SIZE`] for closed rings. Fixed for the line's
    /// lifetime.
    #[must_use]
    pub fn new(coords: Vec<Coord<f64>>, minimum_size: usize, id: LineId) -> Self {
        let segments = coords
            .windows(2)
            .enumerate()
            .map(|(index, pair)| TaggedSegment {
                segment: Line::new(pair[0], pair[1]),
                parent: id,
                index,
            })
            .collect();
        Self {
            id,
            coords,
            segments,
            result: Vec::new(),
            minimum_size,
        }
    }

    /// The line's batch handle.
    #[must_use]
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// The original (pre-simplification) coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &[Coord<f64>] {
        &self.coords
    }

    /// All tagged segments derived from the original coordinates.
    #[must_use]
    pub fn segments(&self) -> &[TaggedSegment] {
        &self.segments
    }

    /// The tagged segment from coordinate `index` to `index + 1`.
    #[must_use]
    pub fn segment(&self, index: usize) -> &TaggedSegment {
        &self.segments[index]
    }

    /// The smallest coordinate count the simplified line may have.
    #[must_use]
    pub const fn minimum_size(&self) -> usize {
        self.minimum_size
    }

    /// Append a kept segment to the result chain.
    ///
    /// The caller appends segments in line order, each starting at the
    /// previous segment's end point.
    pub fn add_to_result(&mut self, segment: Line<f64>) {
        self.result.push(segment);
    }

    /// Coordinate count of the result so far: `0` while empty,
    /// otherwise one more than the kept segment count.
    #[must_use]
    pub fn result_size(&self) -> usize {
        if self.result.is_empty() {
            0
        } else {
            self.result.len() + 1
        }
    }

    /// The simplified coordinate sequence: each kept segment's start
    /// point plus the last segment's end point.
    #[must_use]
    pub fn result_coordinates(&self) -> Vec<Coord<f64>> {
        let mut coords: Vec<Coord<f64>> =
            self.result.iter().map(|segment| segment.start).collect();
        if let Some(last) = self.result.last() {
            coords.push(last.end);
        }
        coords
    }
}
