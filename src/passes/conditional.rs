use geo::Polygon;
use tracing::debug;

use crate::{
    error::MergeError,
    geom::compactness,
    metric::distance,
    partition::{Partition, RoadFlag},
    record::RecordId,
};

use super::{PassKind, PassLimits, PassReport, Step};

/// Size tiers and gates of the conditional merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalParams {
    /// Records at or below this area are small and always merge when they can.
    pub medium_threshold: f64,
    /// Records above this area are never merged by the pass.
    pub target_threshold: f64,
    /// Upper bound on the merged area of a medium or large record.
    pub max_area: f64,
    /// A medium or large record merges only if its best distance exceeds this.
    pub similarity_threshold: f64,
    /// Number of ranked neighbors scored per record.
    pub max_neighbors: usize,
}

struct Candidate {
    id: RecordId,
    geometry: Polygon<f64>,
    distance: f64,
}

impl Partition {
    /// Three-tier weighted merge producing the final coarse partition.
    ///
    /// Requires zonal statistics on every record.
    pub fn conditional_merge(&mut self, params: &ConditionalParams, limits: &PassLimits) -> Result<PassReport, MergeError> {
        self.require_statistics()?;

        let tolerance = limits.adjacency_tolerance;
        let target_threshold = params.target_threshold;
        Ok(self.drive(
            PassKind::Conditional,
            limits,
            |record| record.area <= target_threshold,
            |partition, id| partition.conditional_step(id, params, tolerance),
        ))
    }

    fn conditional_step(&mut self, id: RecordId, params: &ConditionalParams, tolerance: f64) -> Step {
        let Some(record) = self.get(id) else { return Step::Declined };
        let Some(stats) = record.stats.as_ref() else { return Step::Declined };
        let small = record.area <= params.medium_threshold;

        let neighbors = self.neighbors_of(id, tolerance);
        if neighbors.is_empty() {
            debug!(id, "isolated, left unmerged");
            return Step::Isolated
        }

        let mut best: Option<Candidate> = None;
        let mut rejected = false;
        for neighbor in neighbors.into_iter().take(params.max_neighbors) {
            let Some(other) = self.get(neighbor.id) else { continue };
            if !small && record.area + other.area > params.max_area { continue }
            let Some(other_stats) = other.stats.as_ref() else { continue };

            let Some(geometry) = self.merge_candidate(id, neighbor.id, tolerance) else {
                rejected = true;
                continue
            };
            let distance = distance(stats, other_stats, compactness(&geometry));
            if best.as_ref().is_none_or(|best| distance < best.distance) {
                best = Some(Candidate { id: neighbor.id, geometry, distance });
            }
        }

        let Some(best) = best else {
            return if rejected { Step::Rejected } else { Step::Declined }
        };
        if !small && !(best.distance > params.similarity_threshold) {
            debug!(id, neighbor = best.id, distance = best.distance, "best candidate within similarity threshold, declined");
            return Step::Declined
        }

        match self.absorb(id, best.id, best.geometry, RoadFlag::Keep) {
            Some(_) => {
                debug!(id, survivor = best.id, distance = best.distance, small, "merged");
                Step::Merged { survivor: best.id }
            }
            None => Step::Rejected,
        }
    }
}
