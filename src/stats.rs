use std::ops::{Index, IndexMut};

use ahash::AHashMap;

use crate::{
    error::MergeError,
    partition::Partition,
    record::RecordId,
};

/// Raster bands carried by every record once statistics are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Band1,
    Band2,
    Band3,
    /// Road-width raster.
    Road,
    /// Building-height raster.
    Height,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Band1, Band::Band2, Band::Band3, Band::Road, Band::Height];

    /// Column key used in `<stat>_<band>` attribute names.
    pub fn key(self) -> &'static str {
        match self {
            Band::Band1 => "band1",
            Band::Band2 => "band2",
            Band::Band3 => "band3",
            Band::Road => "road",
            Band::Height => "height",
        }
    }

    #[inline] fn index(self) -> usize { self as usize }
}

/// Aggregate names, in the order used by [`BandStats::values`].
pub const STATISTICS: [&str; 7] = ["count", "majority", "min", "max", "mean", "sum", "std"];

/// Attribute column name for one statistic of one band, e.g. `mean_band1`.
pub fn column_name(stat: &str, band: Band) -> String {
    format!("{stat}_{}", band.key())
}

/// Zonal aggregates of one raster band over one polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandStats {
    pub count: u64,
    pub majority: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    pub std: f64,
}

impl BandStats {
    /// Values in [`STATISTICS`] order.
    pub fn values(&self) -> [f64; 7] {
        [self.count as f64, self.majority, self.min, self.max, self.mean, self.sum, self.std]
    }

    /// Inverse of [`BandStats::values`]. Returns `None` for a negative or
    /// fractional count or any non-finite value.
    pub fn from_values(values: [f64; 7]) -> Option<Self> {
        if values.iter().any(|v| !v.is_finite()) { return None }
        let count = values[0];
        if count < 0.0 || count.fract() != 0.0 { return None }

        Some(Self {
            count: count as u64,
            majority: values[1],
            min: values[2],
            max: values[3],
            mean: values[4],
            sum: values[5],
            std: values[6],
        })
    }

    /// Statistics of the union of the two pixel populations.
    /// Counts and sums add, the mean is count-weighted, and the standard
    /// deviation is pooled. The majority comes from the larger population.
    pub fn combine(&self, other: &Self) -> Self {
        if other.count == 0 { return *self }
        if self.count == 0 { return *other }

        let (na, nb) = (self.count as f64, other.count as f64);
        let n = na + nb;
        let mean = (na * self.mean + nb * other.mean) / n;

        let spread = |s: &Self, k: f64| k * (s.std * s.std + (s.mean - mean).powi(2));
        let variance = (spread(self, na) + spread(other, nb)) / n;

        Self {
            count: self.count + other.count,
            majority: if other.count > self.count { other.majority } else { self.majority },
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            mean,
            sum: self.sum + other.sum,
            std: variance.max(0.0).sqrt(),
        }
    }
}

/// Statistics for every [`Band`] of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordStats {
    bands: [BandStats; 5],
}

impl RecordStats {
    pub fn new(bands: [BandStats; 5]) -> Self {
        Self { bands }
    }

    /// Per-band additive combination.
    pub fn combine(&self, other: &Self) -> Self {
        let mut out = *self;
        for band in Band::ALL {
            out[band] = self[band].combine(&other[band]);
        }
        out
    }

    #[inline] pub fn mean(&self, band: Band) -> f64 { self[band].mean }
}

impl Index<Band> for RecordStats {
    type Output = BandStats;

    fn index(&self, band: Band) -> &BandStats { &self.bands[band.index()] }
}

impl IndexMut<Band> for RecordStats {
    fn index_mut(&mut self, band: Band) -> &mut BandStats { &mut self.bands[band.index()] }
}

/// The zonal-statistics collaborator: computes per-record band aggregates
/// for the current partition.
pub trait ZonalStatistics {
    fn zonal_statistics(&mut self, partition: &Partition) -> Result<AHashMap<RecordId, RecordStats>, MergeError>;
}

/// Statistics captured per original polygon, combined over each record's
/// origin set on request.
#[derive(Debug, Clone, Default)]
pub struct OriginStatistics {
    by_origin: AHashMap<u64, RecordStats>,
}

impl OriginStatistics {
    /// Capture the statistics attached to an unmerged partition.
    /// Every record must carry statistics and exactly one origin id.
    pub fn from_partition(partition: &Partition) -> Result<Self, MergeError> {
        let mut by_origin = AHashMap::with_capacity(partition.len());
        for record in partition.records() {
            let stats = record.stats.ok_or_else(|| MergeError::MissingAttribute {
                id: record.id,
                attribute: column_name("mean", Band::Band1),
            })?;
            let (Some(origin), 1) = (record.origin_ids.min(), record.origin_ids.len()) else {
                return Err(MergeError::Schema(format!(
                    "record {} already aggregates origins {}", record.id, record.origin_ids
                )))
            };
            by_origin.insert(origin, stats);
        }
        Ok(Self { by_origin })
    }

    pub fn insert(&mut self, origin: u64, stats: RecordStats) {
        self.by_origin.insert(origin, stats);
    }
}

impl ZonalStatistics for OriginStatistics {
    fn zonal_statistics(&mut self, partition: &Partition) -> Result<AHashMap<RecordId, RecordStats>, MergeError> {
        let mut out = AHashMap::with_capacity(partition.len());
        for record in partition.records() {
            let mut combined: Option<RecordStats> = None;
            for origin in record.origin_ids.iter() {
                let stats = self.by_origin.get(&origin).ok_or_else(|| MergeError::Schema(
                    format!("no statistics for origin {origin} of record {}", record.id)
                ))?;
                combined = Some(match combined {
                    Some(acc) => acc.combine(stats),
                    None => *stats,
                });
            }
            if let Some(stats) = combined {
                out.insert(record.id, stats);
            }
        }
        Ok(out)
    }
}
