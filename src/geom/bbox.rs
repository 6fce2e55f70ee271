use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a geometry by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of the corresponding geometry in its collection
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding geometry.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }

    /// Envelope of an arbitrary rectangle, for querying.
    #[inline]
    pub(crate) fn envelope_of(rect: &Rect<f64>) -> AABB<[f64; 2]> {
        AABB::from_corners(rect.min().into(), rect.max().into())
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        Self::envelope_of(&self.bbox)
    }
}
