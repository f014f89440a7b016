use geo::{Area, BooleanOps, BoundingRect, Polygon};

use crate::{
    geom::{area_tolerance, merge_geometry, SLIVER_AREA},
    partition::Partition,
    record::RecordId,
};

/// How a merge sets the survivor's road-split flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadFlag {
    /// The survivor takes the absorbed record's flag.
    Propagate,
    /// The survivor keeps its own flag.
    Keep,
}

impl Partition {
    /// Repaired union of records `id` and `neighbor`, or `None` if the pair
    /// cannot be merged. A union that bridged a gap must not cover any other
    /// record.
    pub(crate) fn merge_candidate(&self, id: RecordId, neighbor: RecordId, tolerance: f64) -> Option<Polygon<f64>> {
        let (record, other) = (self.records.get(&id)?, self.records.get(&neighbor)?);
        let geometry = merge_geometry(record, other, tolerance)?;

        let expected = record.area + other.area;
        if geometry.unsigned_area() - expected > area_tolerance(expected) && self.covers_other(&geometry, [id, neighbor]) {
            return None
        }
        Some(geometry)
    }

    fn covers_other(&self, geometry: &Polygon<f64>, pair: [RecordId; 2]) -> bool {
        let Some(rect) = geometry.bounding_rect() else { return false };
        self.index.query(&rect).into_iter()
            .filter(|id| !pair.contains(id))
            .filter_map(|id| self.records.get(&id))
            .any(|other| geometry.intersection(&other.geometry).unsigned_area() > SLIVER_AREA)
    }

    /// Merge `absorbed` into `survivor`, giving the survivor `geometry`.
    /// Origin sets are unioned and statistics combined when both sides carry them.
    /// Returns the id of the eliminated record, or `None` if either id is unknown.
    pub(crate) fn absorb(&mut self, absorbed: RecordId, survivor: RecordId, geometry: Polygon<f64>, flag: RoadFlag) -> Option<RecordId> {
        assert!(absorbed != survivor, "cannot merge record {absorbed} into itself");
        if !self.records.contains_key(&survivor) { return None }
        let source = self.records.remove(&absorbed)?;
        let target = self.records.get_mut(&survivor)?;

        debug_assert!(source.origin_ids.is_disjoint(&target.origin_ids),
            "records {absorbed} and {survivor} share an origin");

        self.index.remove(absorbed, &source.geometry);
        self.index.remove(survivor, &target.geometry);

        let area = geometry.unsigned_area();
        let expected = source.area + target.area;
        if (area - expected).abs() > area_tolerance(expected) {
            self.bridged_area += area - expected;
        }

        target.area = area;
        target.geometry = geometry;
        target.origin_ids = target.origin_ids.union(&source.origin_ids);
        target.stats = match (target.stats, source.stats) {
            (Some(a), Some(b)) => Some(a.combine(&b)),
            _ => None,
        };
        if flag == RoadFlag::Propagate {
            target.is_road_split = source.is_road_split;
        }

        self.index.insert(survivor, &target.geometry);

        Some(absorbed)
    }
}
