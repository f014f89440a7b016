use std::fmt;

use geo::{Area, Polygon};
use smallvec::SmallVec;

use crate::stats::RecordStats;

/// Identifies a record within one partition snapshot.
pub type RecordId = u32;

/// Sorted, duplicate-free set of original polygon identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OriginIds(SmallVec<[u64; 4]>);

impl OriginIds {
    /// Set containing a single original identifier.
    pub fn single(id: u64) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        Self(ids)
    }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = u64> + '_ { self.0.iter().copied() }

    #[inline] pub fn as_slice(&self) -> &[u64] { &self.0 }

    /// Smallest identifier in the set.
    #[inline] pub fn min(&self) -> Option<u64> { self.0.first().copied() }

    #[inline] pub fn contains(&self, id: u64) -> bool { self.0.binary_search(&id).is_ok() }

    /// Returns true if the two sets share no identifier.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return false,
            }
        }
        true
    }

    /// Sorted union of the two sets.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = SmallVec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => { out.push(self.0[i]); i += 1 }
                std::cmp::Ordering::Greater => { out.push(other.0[j]); j += 1 }
                std::cmp::Ordering::Equal => { out.push(self.0[i]); i += 1; j += 1 }
            }
        }
        out.extend_from_slice(&self.0[i..]);
        out.extend_from_slice(&other.0[j..]);
        Self(out)
    }

    /// String-encoded list used by the output schema, e.g. `[1, 2, 3]`.
    pub fn to_list_string(&self) -> String {
        self.to_string()
    }
}

impl FromIterator<u64> for OriginIds {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut ids = iter.into_iter().collect::<SmallVec<[u64; 4]>>();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}

impl fmt::Display for OriginIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ", ")? }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}

/// One surviving unit of the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub id: RecordId,
    pub geometry: Polygon<f64>,
    /// Cached `geometry.unsigned_area()`.
    pub area: f64,
    pub origin_ids: OriginIds,
    /// True if this record, or any record it absorbed through the road pass,
    /// was cut out of an original polygon by a road centerline.
    pub is_road_split: bool,
    /// Zonal statistics; required from the conditional pass onward.
    pub stats: Option<RecordStats>,
}

impl PolygonRecord {
    /// Construct a record for an original polygon, computing its area.
    pub fn new(id: RecordId, geometry: Polygon<f64>, origin_id: u64, is_road_split: bool) -> Self {
        Self {
            id,
            area: geometry.unsigned_area(),
            geometry,
            origin_ids: OriginIds::single(origin_id),
            is_road_split,
            stats: None,
        }
    }

    /// Attach zonal statistics.
    pub fn with_stats(mut self, stats: RecordStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_iter_sorts_and_dedups() {
        let ids = [5, 1, 3, 1].into_iter().collect::<OriginIds>();
        assert_eq!(ids.as_slice(), &[1, 3, 5]);
        assert_eq!(ids.min(), Some(1));
    }

    #[test]
    fn union_merges_sorted_sets() {
        let a = [1, 4, 9].into_iter().collect::<OriginIds>();
        let b = [2, 4, 10].into_iter().collect::<OriginIds>();
        assert_eq!(a.union(&b).as_slice(), &[1, 2, 4, 9, 10]);
    }

    #[test]
    fn disjoint_detects_shared_origin() {
        let a = [1, 4, 9].into_iter().collect::<OriginIds>();
        let b = [2, 3, 10].into_iter().collect::<OriginIds>();
        let c = [0, 9].into_iter().collect::<OriginIds>();
        assert!(a.is_disjoint(&b));
        assert!(!a.is_disjoint(&c));
        assert!(OriginIds::default().is_disjoint(&a));
    }

    #[test]
    fn list_string_format() {
        let ids = [3, 1, 2].into_iter().collect::<OriginIds>();
        assert_eq!(ids.to_list_string(), "[1, 2, 3]");
        assert_eq!(OriginIds::single(7).to_list_string(), "[7]");
    }
}
