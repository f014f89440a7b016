use tracing::{info, info_span, warn, Span};

use crate::{
    config::EngineConfig,
    error::MergeError,
    partition::{Ledger, Partition},
    passes::PassReport,
    stats::ZonalStatistics,
};

/// Reports of every pass in one engine run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub passes: Vec<PassReport>,
}

impl RunReport {
    /// True if no pass ran out of its iteration budget.
    pub fn converged(&self) -> bool { self.passes.iter().all(|pass| pass.converged) }

    /// Total merges across passes.
    pub fn merges(&self) -> usize { self.passes.iter().map(|pass| pass.merges).sum() }
}

/// Runs the merge passes over a partition.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    span: Span,
}

impl Engine {
    /// Validate `config` and build an engine logging under a `polymerge` span.
    pub fn new(config: EngineConfig) -> Result<Self, MergeError> {
        config.validate()?;
        Ok(Self { config, span: info_span!("polymerge") })
    }

    /// Run passes inside `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline] pub fn config(&self) -> &EngineConfig { &self.config }

    /// Road-split and small-area absorption only. Statistics are dropped,
    /// since they no longer describe the merged records.
    pub fn absorb(&self, partition: &mut Partition) -> Result<RunReport, MergeError> {
        let _guard = self.span.enter();
        let ledger = partition.ledger();
        partition.detach_statistics();

        let mut report = RunReport::default();
        self.absorption_passes(partition, &ledger, &mut report)?;
        self.log_summary(partition, &report);
        Ok(report)
    }

    /// Full pipeline: road-split absorption, small-area absorption, one call
    /// to the statistics collaborator, then the conditional merge.
    pub fn run(&self, partition: &mut Partition, statistics: &mut impl ZonalStatistics) -> Result<RunReport, MergeError> {
        let _guard = self.span.enter();
        let ledger = partition.ledger();
        partition.detach_statistics();

        let mut report = RunReport::default();
        self.absorption_passes(partition, &ledger, &mut report)?;

        info!(records = partition.len(), "[run] attaching zonal statistics");
        let computed = statistics.zonal_statistics(partition)?;
        partition.attach_statistics(computed)?;

        let pass = partition.conditional_merge(&self.config.conditional_params(), &self.config.limits())?;
        partition.check_invariants(&ledger)?;
        report.passes.push(pass);

        self.log_summary(partition, &report);
        Ok(report)
    }

    fn absorption_passes(&self, partition: &mut Partition, ledger: &Ledger, report: &mut RunReport) -> Result<(), MergeError> {
        let limits = self.config.limits();
        let thresholds = &self.config.thresholds;

        report.passes.push(partition.absorb_road_splits(thresholds.road_split_area_threshold, &limits));
        partition.check_invariants(ledger)?;

        report.passes.push(partition.absorb_small_areas(thresholds.small_area_threshold, &limits));
        partition.check_invariants(ledger)?;

        Ok(())
    }

    fn log_summary(&self, partition: &Partition, report: &RunReport) {
        if report.converged() {
            info!(records = partition.len(), merges = report.merges(), "[run] finished");
        } else {
            warn!(records = partition.len(), merges = report.merges(), "[run] finished without converging; returning partial result");
        }
    }
}
