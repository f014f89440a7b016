use std::{cmp::Ordering, collections::BinaryHeap};

use ahash::AHashMap;

use crate::{partition::Partition, record::RecordId};

#[derive(Copy, Clone, Eq, PartialEq)]
struct Entry {
    area_bits: u64, // f64::to_bits() is monotone for non-negative values
    id: RecordId,
    v: u32,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the smallest area (then smallest id) pops first.
        other.area_bits.cmp(&self.area_bits)
            .then_with(|| other.id.cmp(&self.id))
            .then_with(|| other.v.cmp(&self.v))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Min-area-first queue of record ids.
///
/// Entries are versioned: invalidating an id makes its queued entry stale,
/// and stale entries or entries for records no longer in the partition are
/// skipped on pop.
#[derive(Default)]
pub(crate) struct Worklist {
    heap: BinaryHeap<Entry>,
    versions: AHashMap<RecordId, u32>,
}

impl Worklist {
    pub(crate) fn new() -> Self { Self::default() }

    /// Queue `id` under its current version.
    pub(crate) fn push(&mut self, id: RecordId, area: f64) {
        let v = *self.versions.entry(id).or_insert(0);
        self.heap.push(Entry { area_bits: area.max(0.0).to_bits(), id, v });
    }

    /// Mark any queued entry for `id` as stale.
    pub(crate) fn invalidate(&mut self, id: RecordId) {
        let v = self.versions.entry(id).or_insert(0);
        *v = v.wrapping_add(1);
    }

    fn is_live(&self, entry: &Entry, partition: &Partition) -> bool {
        self.versions.get(&entry.id) == Some(&entry.v) && partition.contains(entry.id)
    }

    /// Pop the smallest live entry.
    pub(crate) fn pop(&mut self, partition: &Partition) -> Option<RecordId> {
        while let Some(entry) = self.heap.pop() {
            if self.is_live(&entry, partition) {
                // Popped ids are no longer queued.
                self.invalidate(entry.id);
                return Some(entry.id)
            }
        }
        None
    }

    /// Returns true if any live entry remains.
    pub(crate) fn has_live(&self, partition: &Partition) -> bool {
        self.heap.iter().any(|entry| self.is_live(entry, partition))
    }
}
