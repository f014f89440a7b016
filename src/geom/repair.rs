use geo::{Area, BooleanOps, Buffer, MultiPolygon, Polygon};

use crate::{geom::perimeter, record::PolygonRecord};

/// Parts and interior rings at or below this area (map units²) are treated
/// as numerical artifacts of the union and discarded.
pub const SLIVER_AREA: f64 = 1e-5;

/// Relative tolerance on area conservation for a single merge.
const AREA_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Largest area change a merge may introduce without being a gap bridge.
pub(crate) fn area_tolerance(expected: f64) -> f64 {
    SLIVER_AREA.max(AREA_RELATIVE_TOLERANCE * expected)
}

/// Normalize the raw result of a union into a single hole-free polygon.
///
/// Parts that do not fuse directly are closed over gaps narrower than
/// `2 * tolerance` (grown by `tolerance`, unioned, shrunk back). Returns
/// `None` when the result still has several non-sliver parts, has an
/// interior ring larger than a sliver, or is empty.
pub fn repair(raw: MultiPolygon<f64>, tolerance: f64) -> Option<Polygon<f64>> {
    normalize(raw, tolerance).map(|(polygon, _)| polygon)
}

/// Like [`repair`], also reporting whether a gap had to be bridged.
fn normalize(raw: MultiPolygon<f64>, tolerance: f64) -> Option<(Polygon<f64>, bool)> {
    let mut parts = without_slivers(raw);
    let (polygon, bridged) = match parts.len() {
        0 => return None,
        1 => (parts.pop()?, false),
        _ => fuse(parts, tolerance)?,
    };

    let (exterior, interiors) = polygon.into_inner();
    if exterior.0.len() < 4 { return None }
    if interiors.into_iter().any(|ring| Polygon::new(ring, vec![]).unsigned_area() > SLIVER_AREA) {
        return None
    }

    let repaired = Polygon::new(exterior, vec![]);
    let area = repaired.unsigned_area();
    (area.is_finite() && area > SLIVER_AREA).then_some((repaired, bridged))
}

fn without_slivers(polygons: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    polygons.0.into_iter()
        .filter(|part| part.unsigned_area() > SLIVER_AREA)
        .collect()
}

/// Fuse several parts into one polygon, bridging narrow gaps if needed.
fn fuse(parts: Vec<Polygon<f64>>, tolerance: f64) -> Option<(Polygon<f64>, bool)> {
    let shells = parts.into_iter()
        .map(|part| Polygon::new(part.into_inner().0, vec![]))
        .collect::<Vec<_>>();

    // Parts meeting only at points stay apart.
    let fused = shells.iter()
        .fold(MultiPolygon::new(vec![]), |acc, shell| acc.union(shell));
    let mut fused = without_slivers(fused);
    if fused.len() == 1 { return Some((fused.pop()?, false)) }
    if !(tolerance > 0.0) { return None }

    let grown = fused.iter()
        .map(|part| part.buffer(tolerance))
        .reduce(|acc, part| acc.union(&part))?;
    let mut closed = without_slivers(grown.buffer(-tolerance));
    if closed.len() != 1 { return None }
    Some((closed.pop()?, true))
}

/// Union the geometries of two records and repair the result.
///
/// The union must conserve `a.area + b.area`, which rejects overlapping
/// inputs and overlay breakdowns. A union that bridged a gap may grow by at
/// most `tolerance` times the combined perimeter of the inputs, and never
/// shrink.
pub fn merge_geometry(a: &PolygonRecord, b: &PolygonRecord, tolerance: f64) -> Option<Polygon<f64>> {
    let (merged, bridged) = normalize(a.geometry.union(&b.geometry), tolerance)?;

    let expected = a.area + b.area;
    let change = merged.unsigned_area() - expected;
    let allowed = area_tolerance(expected);
    let conserved = if bridged {
        change >= -allowed && change <= allowed + tolerance * (perimeter(&a.geometry) + perimeter(&b.geometry))
    } else {
        change.abs() <= allowed
    };
    conserved.then_some(merged)
}
