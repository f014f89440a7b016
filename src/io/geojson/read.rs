//! GeoJSON reading operations.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, Polygon};
use serde_json::{Map, Value};

use crate::{
    error::MergeError,
    partition::Partition,
    record::{PolygonRecord, RecordId},
    stats::{Band, BandStats, RecordStats, STATISTICS, column_name},
};

/// Read a partition from a GeoJSON FeatureCollection file.
pub fn read_partition(path: &Path) -> Result<Partition> {
    let file = File::open(path)
        .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::geojson::read] Failed to parse GeoJSON from {}", path.display()))?;
    Partition::from_geojson(&value)
}

impl Partition {
    /// Build a partition from a GeoJSON FeatureCollection.
    ///
    /// Each feature needs integer `id` and `origin_id` properties and an
    /// `is_road_split` flag (boolean, or 0/1). Statistics columns
    /// (`<stat>_<band>`) are optional, but a feature carrying any of them must
    /// carry all of them.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let features = value.get("features").and_then(Value::as_array)
            .ok_or_else(|| anyhow!("[io::geojson::read] Expected a FeatureCollection with a `features` array"))?;

        let records = features.iter().enumerate()
            .map(|(i, feature)| parse_feature(feature)
                .with_context(|| format!("[io::geojson::read] Invalid feature at index {i}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Partition::new(records)?)
    }
}

fn parse_feature(feature: &Value) -> Result<PolygonRecord> {
    let properties = feature.get("properties").and_then(Value::as_object)
        .ok_or_else(|| anyhow!("feature has no properties object"))?;

    let id = properties.get("id").and_then(Value::as_u64)
        .ok_or_else(|| anyhow!("missing non-negative integer property `id`"))?;
    let id = RecordId::try_from(id).with_context(|| format!("record id {id} does not fit in 32 bits"))?;

    let origin_id = properties.get("origin_id").and_then(Value::as_u64)
        .ok_or_else(|| MergeError::MissingAttribute { id, attribute: "origin_id".into() })?;

    let is_road_split = match properties.get("is_road_split") {
        Some(Value::Bool(flag)) => *flag,
        Some(value) if value.as_u64() == Some(0) => false,
        Some(value) if value.as_u64() == Some(1) => true,
        _ => return Err(MergeError::MissingAttribute { id, attribute: "is_road_split".into() }.into()),
    };

    let geometry = feature.get("geometry")
        .ok_or_else(|| anyhow!("record {id} has no geometry"))
        .and_then(parse_geometry)
        .with_context(|| format!("record {id} has an unusable geometry"))?;

    let mut record = PolygonRecord::new(id, geometry, origin_id, is_road_split);
    record.stats = parse_stats(id, properties)?;
    Ok(record)
}

/// Parse a `Polygon`, or a `MultiPolygon` with exactly one part.
fn parse_geometry(geometry: &Value) -> Result<Polygon<f64>> {
    let coordinates = geometry.get("coordinates")
        .ok_or_else(|| anyhow!("geometry has no coordinates"))?;

    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => parse_polygon(coordinates),
        Some("MultiPolygon") => {
            let parts = coordinates.as_array().ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?;
            match parts.as_slice() {
                [part] => parse_polygon(part),
                _ => bail!("MultiPolygon with {} parts; expected a single polygon", parts.len()),
            }
        }
        Some(other) => bail!("unsupported geometry type `{other}`"),
        None => bail!("geometry has no type"),
    }
}

fn parse_polygon(rings: &Value) -> Result<Polygon<f64>> {
    let rings = rings.as_array().ok_or_else(|| anyhow!("polygon coordinates must be an array of rings"))?;
    let (exterior, interiors) = rings.split_first().ok_or_else(|| anyhow!("polygon has no exterior ring"))?;
    Ok(Polygon::new(
        parse_ring(exterior)?,
        interiors.iter().map(parse_ring).collect::<Result<Vec<_>>>()?,
    ))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let positions = ring.as_array().ok_or_else(|| anyhow!("ring must be an array of positions"))?;
    let coords = positions.iter()
        .map(|position| {
            let (Some(x), Some(y)) = (position.get(0).and_then(Value::as_f64), position.get(1).and_then(Value::as_f64)) else {
                bail!("position must have numeric x and y")
            };
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;
    if coords.len() < 3 { bail!("ring has only {} positions", coords.len()) }
    Ok(LineString::new(coords))
}

fn parse_stats(id: RecordId, properties: &Map<String, Value>) -> Result<Option<RecordStats>> {
    let present = Band::ALL.iter()
        .any(|&band| STATISTICS.iter().any(|stat| properties.contains_key(&column_name(stat, band))));
    if !present { return Ok(None) }

    let mut stats = RecordStats::default();
    for band in Band::ALL {
        let mut values = [0.0; 7];
        for (slot, stat) in values.iter_mut().zip(STATISTICS) {
            let column = column_name(stat, band);
            *slot = properties.get(&column).and_then(Value::as_f64)
                .ok_or_else(|| MergeError::MissingAttribute { id, attribute: column.clone() })?;
        }
        stats[band] = BandStats::from_values(values)
            .ok_or_else(|| anyhow!("record {id} has invalid `{}` statistics", band.key()))?;
    }
    Ok(Some(stats))
}
