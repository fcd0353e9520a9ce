//! Pixel to feature-vector conversion.

use crate::color::Rgb8;

/// A clustering sample: the raw `(R, G, B)` components as floats.
///
/// Position in the sample slice is the sample's identity and always matches
/// the position of the pixel it came from.
pub type Sample = [f64; 3];

/// Convert pixels to samples, one per pixel, in the same order.
///
/// No scaling or color-space conversion is applied.
pub fn extract_samples(pixels: &[Rgb8]) -> Vec<Sample> {
    pixels
        .iter()
        .map(|p| [f64::from(p.red), f64::from(p.green), f64::from(p.blue)])
        .collect()
}

/// Squared Euclidean distance between two samples.
#[inline]
pub fn distance_squared(a: &Sample, b: &Sample) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
