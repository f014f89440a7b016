use std::f64::consts::PI;

use geo::{Area, Polygon};

/// Length of the exterior ring.
pub fn perimeter(polygon: &Polygon<f64>) -> f64 {
    polygon.exterior().lines()
        .map(|line| line.dx().hypot(line.dy()))
        .sum()
}

/// Miller compactness index `4π·area / perimeter²`.
/// A circle scores 1; elongated shapes approach 0. Degenerate polygons score 0.
pub fn compactness(polygon: &Polygon<f64>) -> f64 {
    let perimeter = perimeter(polygon);
    if !(perimeter > 0.0) || !perimeter.is_finite() { return 0.0 }
    (4.0 * PI * polygon.unsigned_area() / (perimeter * perimeter)).min(1.0)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Coord, LineString};

    use super::*;

    #[test]
    fn unit_square_scores_quarter_pi() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        assert!((perimeter(&square) - 4.0).abs() < 1e-12);
        assert!((compactness(&square) - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn elongated_rectangle_scores_lower() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let strip = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 1.0), (x: 0.0, y: 1.0)];
        assert!(compactness(&strip) < compactness(&square));
        assert!((compactness(&strip) - 4.0 * PI * 4.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn circle_approximation_near_one() {
        let n = 256;
        let ring = (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                Coord { x: t.cos(), y: t.sin() }
            })
            .collect::<Vec<_>>();
        let circle = Polygon::new(LineString::from(ring), vec![]);
        assert!(compactness(&circle) > 0.999);
        assert!(compactness(&circle) <= 1.0);
    }

    #[test]
    fn degenerate_polygon_scores_zero() {
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        assert_eq!(compactness(&empty), 0.0);
    }
}
