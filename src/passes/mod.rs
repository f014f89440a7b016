mod conditional;
mod road;
mod small;
mod worklist;

use std::fmt;

use tracing::{debug, info, warn};

use crate::{
    partition::{Partition, RoadFlag},
    record::{PolygonRecord, RecordId},
};

pub use conditional::ConditionalParams;
use worklist::Worklist;

/// Identifies one of the merge passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    RoadSplit,
    SmallArea,
    Conditional,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PassKind::RoadSplit => "road_split",
            PassKind::SmallArea => "small_area",
            PassKind::Conditional => "conditional",
        })
    }
}

/// Settings shared by every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassLimits {
    /// Buffer applied to a record before searching for neighbors.
    pub adjacency_tolerance: f64,
    /// Maximum number of records a pass processes before giving up.
    pub max_iterations: usize,
}

/// Outcome of one pass over a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub pass: PassKind,
    pub initial_records: usize,
    pub final_records: usize,
    /// Records taken off the worklist.
    pub iterations: usize,
    pub merges: usize,
    /// Records with no valid neighbor.
    pub isolated: usize,
    /// Records whose every merge candidate failed geometry repair.
    pub rejected: usize,
    /// Records the merge policy chose not to merge.
    pub declined: usize,
    /// False if the iteration budget ran out with work still queued.
    pub converged: bool,
}

impl PassReport {
    fn new(pass: PassKind, initial_records: usize) -> Self {
        Self {
            pass,
            initial_records,
            final_records: initial_records,
            iterations: 0,
            merges: 0,
            isolated: 0,
            rejected: 0,
            declined: 0,
            converged: true,
        }
    }
}

/// Result of processing one record.
pub(crate) enum Step {
    Merged { survivor: RecordId },
    Isolated,
    Rejected,
    Declined,
}

impl Partition {
    /// Worklist loop shared by all passes. Records satisfying `eligible` are
    /// processed smallest first; the survivor of each merge is re-queued while
    /// it stays eligible.
    pub(crate) fn drive(&mut self,
        pass: PassKind,
        limits: &PassLimits,
        eligible: impl Fn(&PolygonRecord) -> bool,
        mut step: impl FnMut(&mut Partition, RecordId) -> Step,
    ) -> PassReport {
        let mut report = PassReport::new(pass, self.len());

        let mut worklist = Worklist::new();
        for record in self.records().filter(|record| eligible(record)) {
            worklist.push(record.id, record.area);
        }

        loop {
            if report.iterations >= limits.max_iterations {
                report.converged = !worklist.has_live(self);
                break
            }
            let Some(id) = worklist.pop(self) else { break };
            report.iterations += 1;

            match step(self, id) {
                Step::Merged { survivor } => {
                    report.merges += 1;
                    worklist.invalidate(survivor);
                    if let Some(record) = self.get(survivor).filter(|record| eligible(record)) {
                        worklist.push(survivor, record.area);
                    }
                }
                Step::Isolated => report.isolated += 1,
                Step::Rejected => report.rejected += 1,
                Step::Declined => report.declined += 1,
            }
        }

        report.final_records = self.len();
        info!(
            pass = %pass,
            records_in = report.initial_records,
            records_out = report.final_records,
            merges = report.merges,
            isolated = report.isolated,
            rejected = report.rejected,
            declined = report.declined,
            "[{pass}] pass finished after {} iterations", report.iterations
        );
        if !report.converged {
            warn!(pass = %pass, max_iterations = limits.max_iterations, "[{pass}] iteration budget exhausted before the worklist drained");
        }
        report
    }

    /// Merge `id` into the highest-ranked neighbor whose union repairs cleanly.
    pub(crate) fn absorb_into_best_neighbor(&mut self, id: RecordId, tolerance: f64, flag: RoadFlag) -> Step {
        let neighbors = self.neighbors_of(id, tolerance);
        if neighbors.is_empty() {
            debug!(id, "isolated, left unmerged");
            return Step::Isolated
        }

        for neighbor in neighbors {
            let Some(geometry) = self.merge_candidate(id, neighbor.id, tolerance) else {
                debug!(id, neighbor = neighbor.id, "merge geometry rejected");
                continue
            };
            if self.absorb(id, neighbor.id, geometry, flag).is_some() {
                debug!(id, survivor = neighbor.id, "absorbed");
                return Step::Merged { survivor: neighbor.id }
            }
        }

        Step::Rejected
    }
}
