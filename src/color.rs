//! Pixel and palette color types.

use palette::Srgb;

use crate::error::QuantizeError;

/// An 8-bit RGB pixel. Every channel is in `0..=255` by construction.
pub type Rgb8 = Srgb<u8>;

/// One of the five fixed output colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalColor {
    White,
    Black,
    Red,
    Green,
    Blue,
}

impl CanonicalColor {
    /// All canonical colors, in the order they are tested by the palette heuristic.
    pub const ALL: [CanonicalColor; 5] = [
        CanonicalColor::White,
        CanonicalColor::Black,
        CanonicalColor::Red,
        CanonicalColor::Green,
        CanonicalColor::Blue,
    ];

    /// The exact RGB value written for this color.
    pub fn rgb(self) -> Rgb8 {
        match self {
            CanonicalColor::White => Srgb::new(255, 255, 255),
            CanonicalColor::Black => Srgb::new(0, 0, 0),
            CanonicalColor::Red => Srgb::new(255, 0, 0),
            CanonicalColor::Green => Srgb::new(0, 255, 0),
            CanonicalColor::Blue => Srgb::new(0, 0, 255),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CanonicalColor::White => "white",
            CanonicalColor::Black => "black",
            CanonicalColor::Red => "red",
            CanonicalColor::Green => "green",
            CanonicalColor::Blue => "blue",
        }
    }

    /// Reverse lookup from an RGB value; `None` unless it is exactly canonical.
    pub fn from_rgb(rgb: Rgb8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.rgb() == rgb)
    }
}

impl std::fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a pixel from wide integer components.
///
/// Out-of-range components are rejected, never clamped.
///
/// # Errors
///
/// Returns [`QuantizeError::ComponentOutOfRange`] naming the first
/// offending channel (checked in R, G, B order).
pub fn rgb8_from_components(r: i32, g: i32, b: i32) -> Result<Rgb8, QuantizeError> {
    let channel = |name: &'static str, value: i32| {
        u8::try_from(value).map_err(|_| QuantizeError::ComponentOutOfRange {
            channel: name,
            value,
        })
    };
    Ok(Srgb::new(channel("red", r)?, channel("green", g)?, channel("blue", b)?))
}
