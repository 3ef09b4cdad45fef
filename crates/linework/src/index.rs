//! Dynamic segment index backed by an R\*-tree.
//!
//! The topology-preserving simplifier keeps two of these per batch:
//! one over the segments still awaiting simplification and one over
//! the segments already accepted into results. Both are queried and
//! mutated while simplification runs, so the index must support
//! insertion and removal, not just bulk load.

use geo::Line;
use rstar::primitives::GeomWithData;
use rstar::{Envelope, RTree, RTreeObject};

use crate::tagged::{LineId, TaggedSegment};

/// Provenance of an indexed segment: which line it belongs to and
/// where. Output segments carry no key -- they are nobody's original
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentKey {
    /// Handle of the owning line.
    pub line: LineId,
    /// Position within the owning line's segment array.
    pub index: usize,
}

impl From<&TaggedSegment> for SegmentKey {
    fn from(segment: &TaggedSegment) -> Self {
        Self {
            line: segment.parent,
            index: segment.index,
        }
    }
}

/// An R-tree entry: a segment plus its optional provenance key.
type IndexedSegment = GeomWithData<Line<f64>, Option<SegmentKey>>;

/// A mutable collection of segments keyed by bounding envelope.
#[derive(Debug)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl Default for SegmentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a segment with an optional provenance key.
    pub fn insert(&mut self, segment: Line<f64>, key: Option<SegmentKey>) {
        self.tree.insert(GeomWithData::new(segment, key));
    }

    /// Insert a tagged segment, preserving its provenance.
    pub fn insert_tagged(&mut self, segment: &TaggedSegment) {
        self.insert(segment.segment, Some(SegmentKey::from(segment)));
    }

    /// Remove a previously inserted segment. Benign no-op when the
    /// entry is absent.
    pub fn remove(&mut self, segment: Line<f64>, key: Option<SegmentKey>) {
        let _removed = self.tree.remove(&GeomWithData::new(segment, key));
    }

    /// Remove a tagged segment by geometry and provenance.
    pub fn remove_tagged(&mut self, segment: &TaggedSegment) {
        self.remove(segment.segment, Some(SegmentKey::from(segment)));
    }

    /// All stored segments whose bounding envelope intersects the
    /// query segment's bounding envelope.
    ///
    /// The backing tree yields envelope-overlap candidates; each is
    /// re-checked against the query envelope before being returned, so
    /// callers never see an over-reported candidate. The segments
    /// themselves need not intersect -- envelope overlap is the filter,
    /// exact intersection tests are the caller's business.
    #[must_use]
    pub fn query(&self, segment: &Line<f64>) -> Vec<(Line<f64>, Option<SegmentKey>)> {
        let envelope = segment.envelope();
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.geom().envelope().intersects(&envelope))
            .map(|entry| (*entry.geom(), entry.data))
            .collect()
    }

    /// Number of stored segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
