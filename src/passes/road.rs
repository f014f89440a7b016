use crate::partition::{Partition, RoadFlag};

use super::{PassKind, PassLimits, PassReport};

impl Partition {
    /// Fold road-split fragments smaller than `area_threshold` back into
    /// their best-connected neighbor.
    ///
    /// No similarity scoring: the first neighbor whose union repairs cleanly
    /// wins. The survivor inherits the fragment's road flag, so chains of
    /// fragments keep collapsing while they stay under the threshold.
    pub fn absorb_road_splits(&mut self, area_threshold: f64, limits: &PassLimits) -> PassReport {
        let tolerance = limits.adjacency_tolerance;
        self.drive(
            PassKind::RoadSplit,
            limits,
            |record| record.is_road_split && record.area < area_threshold,
            |partition, id| partition.absorb_into_best_neighbor(id, tolerance, RoadFlag::Propagate),
        )
    }
}
