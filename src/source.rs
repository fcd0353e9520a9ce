//! Pixel acquisition and write-back.

use image::RgbaImage;
use palette::Srgb;

use crate::color::Rgb8;
use crate::error::QuantizeError;

/// Anything that can hand out its pixels in a stable order and accept a
/// same-length replacement in that order.
pub trait PixelSource {
    fn pixels(&self) -> Vec<Rgb8>;

    /// Overwrite the color data. Channels other than R, G and B are left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::LengthMismatch`] if `colors` does not have
    /// exactly one entry per pixel; nothing is written in that case.
    fn write_back(&mut self, colors: &[Rgb8]) -> Result<(), QuantizeError>;
}

impl PixelSource for Vec<Rgb8> {
    fn pixels(&self) -> Vec<Rgb8> {
        self.clone()
    }

    fn write_back(&mut self, colors: &[Rgb8]) -> Result<(), QuantizeError> {
        check_len(self.len(), colors.len())?;
        self.copy_from_slice(colors);
        Ok(())
    }
}

/// Row-major pixel order; alpha is never touched.
impl PixelSource for RgbaImage {
    fn pixels(&self) -> Vec<Rgb8> {
        self.as_raw()
            .chunks_exact(4)
            .map(|chunk| Srgb::new(chunk[0], chunk[1], chunk[2]))
            .collect()
    }

    fn write_back(&mut self, colors: &[Rgb8]) -> Result<(), QuantizeError> {
        check_len((self.width() * self.height()) as usize, colors.len())?;
        for (pixel, color) in self.pixels_mut().zip(colors) {
            pixel.0[0] = color.red;
            pixel.0[1] = color.green;
            pixel.0[2] = color.blue;
        }
        Ok(())
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), QuantizeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(QuantizeError::LengthMismatch { expected, actual })
    }
}
