use geo::{Area, BooleanOps, BoundingRect, Buffer};

use crate::{partition::Partition, record::RecordId};

/// Buffered intersections at or below this area (map units²) are point
/// touches, not shared boundaries.
pub const MIN_SHARED_AREA: f64 = 1e-5;

/// A ranked neighbor of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: RecordId,
    /// Area of the buffered target intersected with the neighbor, a proxy
    /// for shared boundary length.
    pub shared: f64,
}

impl Partition {
    /// Records sharing a boundary with `target`, best-connected first.
    ///
    /// The target is buffered by `tolerance` to bridge floating-point gaps.
    /// Records whose origin sets overlap the target's are never neighbors.
    /// Ties on shared area are broken by ascending id. An unknown or isolated
    /// target yields an empty list.
    pub fn neighbors_of(&self, target: RecordId, tolerance: f64) -> Vec<Neighbor> {
        let Some(record) = self.records.get(&target) else { return Vec::new() };
        let buffered = record.geometry.buffer(tolerance);
        let Some(rect) = buffered.bounding_rect() else { return Vec::new() };

        let mut neighbors = self.index.query(&rect).into_iter()
            .filter(|&id| id != target)
            .filter_map(|id| self.records.get(&id))
            .filter(|other| other.geometry != record.geometry)
            .filter(|other| other.origin_ids.is_disjoint(&record.origin_ids))
            .filter_map(|other| {
                let shared = buffered.intersection(&other.geometry).unsigned_area();
                (shared > MIN_SHARED_AREA).then_some(Neighbor { id: other.id, shared })
            })
            .collect::<Vec<_>>();

        neighbors.sort_by(|a, b| b.shared.total_cmp(&a.shared).then_with(|| a.id.cmp(&b.id)));
        neighbors
    }
}
