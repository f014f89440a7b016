use ahash::{AHashMap, AHashSet};
use geo::Area;

use crate::{
    error::MergeError,
    geom::AdjacencyIndex,
    record::{OriginIds, PolygonRecord, RecordId},
    stats::{Band, RecordStats, column_name},
};

/// Relative tolerance on the partition-wide area balance.
const TOTAL_AREA_TOLERANCE: f64 = 1e-6;

/// Relative tolerance between a record's cached area and its geometry.
const RECORD_AREA_TOLERANCE: f64 = 1e-9;

/// A planar partition: an arena of records keyed by id, with a spatial index
/// over the same ids.
#[derive(Debug, Clone)]
pub struct Partition {
    pub(super) records: AHashMap<RecordId, PolygonRecord>,
    pub(super) index: AdjacencyIndex,
    /// Net area added by merges that bridged a gap between records.
    pub(super) bridged_area: f64,
}

/// Provenance and area of a partition at one point in time, used to verify
/// that passes neither lose nor duplicate original polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub origins: OriginIds,
    pub total_area: f64,
    pub bridged_area: f64,
}

impl Partition {
    /// Construct a partition from records, recomputing cached areas.
    ///
    /// Fails on duplicate ids, overlapping origin sets, empty origin sets, or
    /// degenerate geometries.
    pub fn new(records: impl IntoIterator<Item = PolygonRecord>) -> Result<Self, MergeError> {
        let mut map = AHashMap::new();
        let mut origins = AHashSet::new();

        for mut record in records {
            if record.origin_ids.is_empty() {
                return Err(MergeError::Schema(format!("record {} has no origin id", record.id)))
            }
            if let Some(origin) = record.origin_ids.iter().find(|&origin| !origins.insert(origin)) {
                return Err(MergeError::Schema(format!("origin id {origin} appears on more than one record")))
            }

            record.area = record.geometry.unsigned_area();
            if !(record.area.is_finite() && record.area > 0.0) {
                return Err(MergeError::Schema(format!("record {} has a degenerate geometry", record.id)))
            }

            let id = record.id;
            if map.insert(id, record).is_some() {
                return Err(MergeError::Schema(format!("duplicate record id {id}")))
            }
        }

        let index = AdjacencyIndex::new(map.iter().map(|(&id, record)| (id, &record.geometry)));
        Ok(Self { records: map, index, bridged_area: 0.0 })
    }

    /// Get the number of records.
    #[inline] pub fn len(&self) -> usize { self.records.len() }

    /// Check if there are no records.
    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn get(&self, id: RecordId) -> Option<&PolygonRecord> { self.records.get(&id) }

    #[inline] pub fn contains(&self, id: RecordId) -> bool { self.records.contains_key(&id) }

    /// All record ids, ascending.
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids = self.records.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    /// All records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &PolygonRecord> {
        let mut records = self.records.values().collect::<Vec<_>>();
        records.sort_unstable_by_key(|record| record.id);
        records.into_iter()
    }

    /// Sum of cached areas, accumulated in id order.
    pub fn total_area(&self) -> f64 {
        self.records().map(|record| record.area).sum()
    }

    /// Net area gap-bridging merges have added since construction.
    #[inline] pub fn bridged_area(&self) -> f64 { self.bridged_area }

    /// Rebuild the spatial index from the current geometries.
    pub fn rebuild_index(&mut self) {
        self.index = AdjacencyIndex::new(self.records.iter().map(|(&id, record)| (id, &record.geometry)));
    }

    /// Snapshot of provenance and total area.
    pub fn ledger(&self) -> Ledger {
        Ledger {
            origins: self.records.values().flat_map(|record| record.origin_ids.iter()).collect(),
            total_area: self.total_area(),
            bridged_area: self.bridged_area,
        }
    }

    /// Verify the partition invariants against an earlier snapshot:
    /// unique ids, disjoint origin sets covering the snapshot's origins,
    /// single hole-free polygons for merged records, cached areas matching
    /// geometry, and total area conserved up to the area added by gap bridges.
    pub fn check_invariants(&self, ledger: &Ledger) -> Result<(), MergeError> {
        let mut count = 0;
        for (&id, record) in &self.records {
            if record.id != id {
                return Err(MergeError::Invariant(format!("record {} stored under id {id}", record.id)))
            }
            if record.origin_ids.is_empty() {
                return Err(MergeError::Invariant(format!("record {id} has no origin id")))
            }
            count += record.origin_ids.len();

            let area = record.geometry.unsigned_area();
            if (area - record.area).abs() > RECORD_AREA_TOLERANCE * area.max(1.0) {
                return Err(MergeError::Invariant(format!(
                    "record {id} caches area {} but its geometry has area {area}", record.area
                )))
            }
            if record.origin_ids.len() > 1 && (!record.geometry.interiors().is_empty() || !(area > 0.0)) {
                return Err(MergeError::Invariant(format!("merged record {id} is not a simple hole-free polygon")))
            }
        }

        let ledger_now = self.ledger();
        if count != ledger_now.origins.len() {
            return Err(MergeError::Invariant("origin ids are shared between records".into()))
        }
        if ledger_now.origins != ledger.origins {
            return Err(MergeError::Invariant(format!(
                "provenance changed: expected {} origins, found {}", ledger.origins.len(), ledger_now.origins.len()
            )))
        }

        let expected = ledger.total_area + (self.bridged_area - ledger.bridged_area);
        let drift = (ledger_now.total_area - expected).abs();
        if drift > TOTAL_AREA_TOLERANCE * expected.max(1.0) {
            return Err(MergeError::Invariant(format!(
                "total area drifted from {expected} to {}", ledger_now.total_area
            )))
        }

        if self.index.len() != self.records.len() {
            return Err(MergeError::Invariant(format!(
                "spatial index holds {} entries for {} records", self.index.len(), self.records.len()
            )))
        }

        Ok(())
    }

    /// Returns true if every record carries zonal statistics.
    pub fn has_statistics(&self) -> bool {
        self.records.values().all(|record| record.stats.is_some())
    }

    /// Fail with a schema error naming the lowest id without statistics.
    pub fn require_statistics(&self) -> Result<(), MergeError> {
        match self.records().find(|record| record.stats.is_none()) {
            Some(record) => Err(MergeError::MissingAttribute {
                id: record.id,
                attribute: column_name("mean", Band::Band1),
            }),
            None => Ok(()),
        }
    }

    /// Attach statistics to every record. Nothing is attached unless every
    /// record has an entry.
    pub fn attach_statistics(&mut self, mut stats: AHashMap<RecordId, RecordStats>) -> Result<(), MergeError> {
        if let Some(id) = self.ids().into_iter().find(|id| !stats.contains_key(id)) {
            return Err(MergeError::MissingAttribute { id, attribute: column_name("mean", Band::Band1) })
        }
        for (id, record) in self.records.iter_mut() {
            record.stats = stats.remove(id);
        }
        Ok(())
    }

    /// Drop statistics from every record.
    pub fn detach_statistics(&mut self) {
        for record in self.records.values_mut() {
            record.stats = None;
        }
    }
}
