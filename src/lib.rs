use std::time::Duration;

use image::{ImageFormat, RgbaImage};
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod features;
pub mod kmeans;
pub mod mapper;
pub mod recolor;
pub mod source;

pub use color::{CanonicalColor, Rgb8, rgb8_from_components};
pub use error::QuantizeError;
pub use kmeans::{Clustering, InitPolicy, KMeansConfig, MAX_CLUSTERS, Termination};
pub use mapper::ColorTable;
pub use source::PixelSource;

/// Knobs for a reduction run. The defaults give the canonical five-cluster,
/// 500-iteration behaviour.
#[derive(Clone, Debug)]
pub struct QuantizeConfig {
    /// Number of clusters (`1..=5`).
    pub clusters: usize,
    pub max_iterations: usize,
    pub init: InitPolicy,
    /// Optional wall-clock budget for the clustering loop.
    pub deadline: Option<Duration>,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        let kmeans = KMeansConfig::default();
        Self {
            clusters: kmeans.k,
            max_iterations: kmeans.max_iterations,
            init: kmeans.init,
            deadline: kmeans.deadline,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clusters(mut self, k: usize) -> Self {
        self.clusters = k;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn init(mut self, init: InitPolicy) -> Self {
        self.init = init;
        self
    }

    pub fn deadline(mut self, limit: Duration) -> Self {
        self.deadline = Some(limit);
        self
    }

    fn kmeans(&self) -> KMeansConfig {
        KMeansConfig {
            k: self.clusters,
            max_iterations: self.max_iterations,
            init: self.init,
            deadline: self.deadline,
        }
    }
}

/// Everything produced by one reduction run.
#[derive(Clone, Debug)]
pub struct Reduction {
    /// Recolored pixels, index-aligned with the input.
    pub pixels: Vec<Rgb8>,
    pub table: ColorTable,
    pub clustering: Clustering,
}

/// Reduce `pixels` to the five canonical colors.
///
/// The output has the same length and order as the input, and every entry
/// is exactly one of [`CanonicalColor::ALL`].
///
/// # Errors
///
/// [`QuantizeError::EmptyInput`] for an empty slice, or a configuration
/// error for an out-of-range cluster or iteration count.
pub fn quantize(pixels: &[Rgb8], config: &QuantizeConfig) -> Result<Vec<Rgb8>, QuantizeError> {
    quantize_detailed(pixels, config).map(|reduction| reduction.pixels)
}

/// Like [`quantize`], but also returns the clustering and the color table.
///
/// # Errors
///
/// See [`quantize`].
pub fn quantize_detailed(
    pixels: &[Rgb8],
    config: &QuantizeConfig,
) -> Result<Reduction, QuantizeError> {
    let kmeans_config = config.kmeans();
    kmeans_config.validate()?;
    if pixels.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }

    let samples = features::extract_samples(pixels);
    let clustering = kmeans::cluster(&samples, &kmeans_config)?;
    let table = ColorTable::from_centroids(&clustering.centroids);
    let recolored = recolor::recolor(pixels, &clustering.assignments, &table)?;

    tracing::info!(
        pixels = pixels.len(),
        iterations = clustering.iterations,
        termination = clustering.termination.as_str(),
        "reduced palette"
    );

    Ok(Reduction {
        pixels: recolored,
        table,
        clustering,
    })
}

/// Read the pixels of `source`, reduce them, and write the result back.
///
/// # Errors
///
/// See [`quantize`]. A failed write-back leaves `source` untouched.
pub fn reduce_source<S: PixelSource + ?Sized>(
    source: &mut S,
    config: &QuantizeConfig,
) -> Result<Reduction, QuantizeError> {
    let pixels = source.pixels();
    let reduction = quantize_detailed(&pixels, config)?;
    source.write_back(&reduction.pixels)?;
    Ok(reduction)
}

/// Decode an encoded image, reduce its colors and return it as PNG.
///
/// Alpha is carried through unchanged.
///
/// # Errors
///
/// [`QuantizeError::ImageDecode`] / [`QuantizeError::ImageEncode`] for
/// codec failures, otherwise as [`quantize`].
pub fn reduce_colors_bytes(
    input: &[u8],
    config: &QuantizeConfig,
) -> Result<(Vec<u8>, Reduction), QuantizeError> {
    let img = image::load_from_memory(input).map_err(QuantizeError::ImageDecode)?;
    let mut rgba: RgbaImage = img.to_rgba8();
    tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded image");

    let reduction = reduce_source(&mut rgba, config)?;

    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        rgba.write_to(&mut cursor, ImageFormat::Png)
            .map_err(QuantizeError::ImageEncode)?;
    }

    Ok((buf, reduction))
}

/// Reduce an encoded image to the five canonical colors.
///
/// Returns `{ image, table }`: `image` is a PNG-encoded `Uint8Array` that
/// can be turned into a `Blob`, and `table` lists the canonical color name
/// chosen for each cluster id.
#[wasm_bindgen]
pub fn reduce_colors(input: Vec<u8>, max_iterations: Option<u32>) -> Result<Object, JsValue> {
    let mut config = QuantizeConfig::default();
    if let Some(n) = max_iterations {
        config = config.max_iterations(n as usize);
    }

    let (encoded, reduction) = reduce_colors_bytes(&input, &config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let img_js = Uint8Array::from(encoded.as_slice());
    let table_js = Array::new();
    for color in reduction.table.as_slice() {
        table_js.push(&JsValue::from_str(color.name()));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &img_js)?;
    Reflect::set(&result, &JsValue::from_str("table"), &table_js)?;

    Ok(result)
}
