use crate::partition::{Partition, RoadFlag};

use super::{PassKind, PassLimits, PassReport};

impl Partition {
    /// Fold every record smaller than `area_threshold` into its
    /// best-connected neighbor, regardless of road-split origin.
    /// The survivor keeps its own road flag.
    pub fn absorb_small_areas(&mut self, area_threshold: f64, limits: &PassLimits) -> PassReport {
        let tolerance = limits.adjacency_tolerance;
        self.drive(
            PassKind::SmallArea,
            limits,
            |record| record.area < area_threshold,
            |partition, id| partition.absorb_into_best_neighbor(id, tolerance, RoadFlag::Keep),
        )
    }
}
