#![allow(dead_code)]

use geo::{polygon, Polygon};
use polymerge::{Band, BandStats, EngineConfig, PassLimits, Partition, PolygonRecord, RecordStats, Thresholds};

pub const TOLERANCE: f64 = 1e-3;

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
}

pub fn limits() -> PassLimits {
    PassLimits { adjacency_tolerance: TOLERANCE, max_iterations: 10_000 }
}

pub fn record(id: u32, geometry: Polygon<f64>) -> PolygonRecord {
    PolygonRecord::new(id, geometry, id as u64, false)
}

pub fn road_record(id: u32, geometry: Polygon<f64>) -> PolygonRecord {
    PolygonRecord::new(id, geometry, id as u64, true)
}

/// Statistics with the given band means and `count` pixels per band.
pub fn stats(count: u64, band1: f64, band2: f64, band3: f64, height: f64) -> RecordStats {
    let mut stats = RecordStats::default();
    for (band, mean) in [
        (Band::Band1, band1), (Band::Band2, band2), (Band::Band3, band3), (Band::Road, 0.0), (Band::Height, height),
    ] {
        stats[band] = BandStats {
            count,
            majority: mean,
            min: mean,
            max: mean,
            mean,
            sum: mean * count as f64,
            std: 0.0,
        };
    }
    stats
}

/// Five triangles of area 10 tiling the trapezoid (0,0) (15,0) (10,4) (0,4).
pub fn five_triangles() -> Partition {
    let triangles = [
        polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 0.0, y: 4.0)],
        polygon![(x: 5.0, y: 0.0), (x: 5.0, y: 4.0), (x: 0.0, y: 4.0)],
        polygon![(x: 5.0, y: 0.0), (x: 10.0, y: 0.0), (x: 5.0, y: 4.0)],
        polygon![(x: 10.0, y: 0.0), (x: 10.0, y: 4.0), (x: 5.0, y: 4.0)],
        polygon![(x: 10.0, y: 0.0), (x: 15.0, y: 0.0), (x: 10.0, y: 4.0)],
    ];
    Partition::new(triangles.into_iter().enumerate().map(|(i, t)| record(i as u32 + 1, t))).unwrap()
}

/// Geometry and provenance of every record, in id order.
pub fn snapshot(partition: &Partition) -> Vec<(u32, Vec<u64>, bool, String)> {
    partition.records()
        .map(|r| (r.id, r.origin_ids.as_slice().to_vec(), r.is_road_split, format!("{:?}", r.geometry)))
        .collect()
}

pub fn config(thresholds: Thresholds) -> EngineConfig {
    EngineConfig { thresholds, max_iterations: 10_000 }
}

pub fn thresholds() -> Thresholds {
    Thresholds {
        road_split_area_threshold: 0.0,
        small_area_threshold: 0.0,
        medium_area_threshold: 0.0,
        target_area_threshold: 0.0,
        max_merged_area: 0.0,
        similarity_threshold: 0.0,
        max_neighbors_considered: 8,
        adjacency_buffer_tolerance: TOLERANCE,
    }
}
