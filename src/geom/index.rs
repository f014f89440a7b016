use geo::{BoundingRect, Polygon, Rect};
use rstar::{RTree, AABB};

use crate::{geom::BoundingBox, record::RecordId};

/// R-tree of record bounding boxes.
///
/// Holds ids and rectangles only; geometry is always looked up in the
/// owning partition, so the index can never outlive a mutation.
#[derive(Debug, Clone, Default)]
pub(crate) struct AdjacencyIndex {
    rtree: RTree<BoundingBox>,
}

impl AdjacencyIndex {
    /// Bulk-load an index from `(id, polygon)` pairs.
    pub(crate) fn new<'a>(polygons: impl IntoIterator<Item = (RecordId, &'a Polygon<f64>)>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                polygons.into_iter()
                    .filter_map(|(id, polygon)| polygon.bounding_rect().map(|rect| BoundingBox::new(id, rect)))
                    .collect()
            ),
        }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }

    pub(crate) fn insert(&mut self, id: RecordId, polygon: &Polygon<f64>) {
        if let Some(rect) = polygon.bounding_rect() {
            self.rtree.insert(BoundingBox::new(id, rect));
        }
    }

    /// Remove the entry for `id`, whose geometry at insertion time was `polygon`.
    pub(crate) fn remove(&mut self, id: RecordId, polygon: &Polygon<f64>) -> bool {
        let Some(rect) = polygon.bounding_rect() else { return false };
        self.rtree.remove(&BoundingBox::new(id, rect)).is_some()
    }

    /// Ids whose bounding box intersects `rect`, in ascending order.
    pub(crate) fn query(&self, rect: &Rect<f64>) -> Vec<RecordId> {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut ids = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.id())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        polygon![(x: x, y: y), (x: x + side, y: y), (x: x + side, y: y + side), (x: x, y: y + side)]
    }

    #[test]
    fn query_returns_sorted_overlapping_ids() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        let c = square(5.0, 5.0, 1.0);
        let index = AdjacencyIndex::new([(7, &a), (3, &b), (9, &c)]);
        assert_eq!(index.len(), 3);

        let probe = Rect::new((0.5, 0.5), (1.5, 0.6));
        assert_eq!(index.query(&probe), vec![3, 7]);
    }

    #[test]
    fn remove_then_insert_tracks_new_bounds() {
        let a = square(0.0, 0.0, 1.0);
        let grown = square(0.0, 0.0, 4.0);
        let mut index = AdjacencyIndex::new([(1, &a)]);

        assert!(index.remove(1, &a));
        assert!(!index.remove(1, &a));
        index.insert(1, &grown);

        let probe = Rect::new((3.0, 3.0), (3.5, 3.5));
        assert_eq!(index.query(&probe), vec![1]);
    }
}
