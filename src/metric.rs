use crate::stats::{Band, RecordStats};

/// Dissimilarity between two records for the conditional merge, given the
/// compactness of their union. Lower is more similar.
///
/// Bands 2 and 3 are compared as a sum. Height differences count double.
pub fn distance(a: &RecordStats, b: &RecordStats, compactness: f64) -> f64 {
    let d1 = a.mean(Band::Band1) - b.mean(Band::Band1);
    let d23 = (a.mean(Band::Band2) + a.mean(Band::Band3)) - (b.mean(Band::Band2) + b.mean(Band::Band3));
    let dh = a.mean(Band::Height) - b.mean(Band::Height);

    let spectral = (d1 * d1 + d23 * d23 + 2.0 * dh * dh).sqrt();
    (spectral + (1.0 - compactness)) / 2.0
}
