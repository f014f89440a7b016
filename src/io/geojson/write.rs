//! GeoJSON writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use geo::{LineString, Polygon};
use serde_json::{json, Map, Value};

use crate::{
    partition::Partition,
    record::PolygonRecord,
    stats::{Band, STATISTICS, column_name},
};

/// Write a partition as a GeoJSON FeatureCollection file.
pub fn write_partition(partition: &Partition, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::geojson::write] Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &partition.to_geojson())
        .with_context(|| format!("[io::geojson::write] Failed to write GeoJSON to {}", path.display()))?;
    writer.flush()
        .with_context(|| format!("[io::geojson::write] Failed to flush {}", path.display()))
}

impl Partition {
    /// Export the partition as a GeoJSON FeatureCollection, features in
    /// ascending id order.
    ///
    /// `origin_id` holds the smallest absorbed origin; `origin_ids` holds the
    /// full provenance as a string-encoded list.
    pub fn to_geojson(&self) -> Value {
        let features = self.records().map(record_to_feature).collect::<Vec<_>>();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

fn record_to_feature(record: &PolygonRecord) -> Value {
    let mut properties = Map::new();
    properties.insert("id".into(), json!(record.id));
    properties.insert("is_road_split".into(), json!(record.is_road_split));
    properties.insert("origin_id".into(), json!(record.origin_ids.min()));
    properties.insert("origin_ids".into(), json!(record.origin_ids.to_list_string()));
    properties.insert("area".into(), json!(record.area));

    if let Some(stats) = &record.stats {
        for band in Band::ALL {
            for (stat, value) in STATISTICS.iter().zip(stats[band].values()) {
                let value = if *stat == "count" { json!(stats[band].count) } else { json!(value) };
                properties.insert(column_name(stat, band), value);
            }
        }
    }

    json!({
        "type": "Feature",
        "id": record.id,
        "geometry": polygon_to_geojson(&record.geometry),
        "properties": properties,
    })
}

/// Helper to convert a Polygon to a serde_json::Value representing GeoJSON Geometry.
fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    }

    let mut rings = vec![ring(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring));
    json!({
        "type": "Polygon",
        "coordinates": rings,
    })
}
