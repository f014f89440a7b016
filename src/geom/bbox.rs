use geo::Rect;
use rstar::{RTreeObject, AABB};

use crate::record::RecordId;

/// A bounding box in an R-tree, associated with a record by id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundingBox {
    id: RecordId,
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(id: RecordId, bbox: Rect<f64>) -> Self {
        Self { id, bbox }
    }

    /// Get the id of the corresponding record.
    #[inline] pub(crate) fn id(&self) -> RecordId { self.id }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
