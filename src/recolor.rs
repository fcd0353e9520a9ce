use crate::color::Rgb8;
use crate::error::QuantizeError;
use crate::mapper::ColorTable;

/// Replace every pixel with the canonical color of its cluster.
///
/// `assignments[i]` is the cluster of `pixels[i]`; the output keeps that
/// order. Only the pixel count is taken from `pixels`, since every output
/// value comes from `table`.
///
/// # Errors
///
/// Returns [`QuantizeError::LengthMismatch`] if `assignments` does not have
/// one entry per pixel, or [`QuantizeError::UnknownCluster`] if an
/// assignment names a cluster the table does not have.
pub fn recolor(
    pixels: &[Rgb8],
    assignments: &[usize],
    table: &ColorTable,
) -> Result<Vec<Rgb8>, QuantizeError> {
    if assignments.len() != pixels.len() {
        return Err(QuantizeError::LengthMismatch {
            expected: pixels.len(),
            actual: assignments.len(),
        });
    }

    assignments
        .iter()
        .map(|&cluster| {
            table
                .rgb(cluster)
                .ok_or(QuantizeError::UnknownCluster(cluster))
        })
        .collect()
}
