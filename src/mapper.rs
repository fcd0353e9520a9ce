//! Centroid to canonical-color classification.
//!
//! The rule is a fixed set of thresholds, not a nearest-color search, and
//! its comparison order is significant on tied or near-tied components:
//!
//! 1. every component above 150: white
//! 2. `r < 60`, `g < 50` and `b < 50`: black
//! 3. otherwise by the dominant component, red compared first, then green:
//!    - red dominant: red if `r - g > 20`, else green if `g - b > 20`, else blue
//!    - green dominant: green
//!    - blue dominant: blue

use crate::color::{CanonicalColor, Rgb8};
use crate::features::Sample;

const WHITE_FLOOR: f64 = 150.0;
const BLACK_RED_CEIL: f64 = 60.0;
const BLACK_GREEN_BLUE_CEIL: f64 = 50.0;
const CHANNEL_MARGIN: f64 = 20.0;

/// Classify a single centroid.
pub fn classify(centroid: &Sample) -> CanonicalColor {
    let [r, g, b] = *centroid;

    if r > WHITE_FLOOR && g > WHITE_FLOOR && b > WHITE_FLOOR {
        return CanonicalColor::White;
    }
    if r < BLACK_RED_CEIL && g < BLACK_GREEN_BLUE_CEIL && b < BLACK_GREEN_BLUE_CEIL {
        return CanonicalColor::Black;
    }

    let dominant = r.max(g.max(b));
    if dominant == r {
        if r - g > CHANNEL_MARGIN {
            CanonicalColor::Red
        } else if g - b > CHANNEL_MARGIN {
            CanonicalColor::Green
        } else {
            CanonicalColor::Blue
        }
    } else if dominant == g {
        CanonicalColor::Green
    } else {
        CanonicalColor::Blue
    }
}

/// Canonical color for each cluster id. Built once per run and read-only
/// afterwards; several clusters may share a color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<CanonicalColor>,
}

impl ColorTable {
    /// Classify every centroid, preserving cluster-id order.
    pub fn from_centroids(centroids: &[Sample]) -> Self {
        let colors = centroids
            .iter()
            .enumerate()
            .map(|(cluster, centroid)| {
                let color = classify(centroid);
                tracing::debug!(
                    cluster,
                    r = centroid[0],
                    g = centroid[1],
                    b = centroid[2],
                    %color,
                    "classified centroid"
                );
                color
            })
            .collect();
        Self { colors }
    }

    /// The canonical color of `cluster`, or `None` for an unknown id.
    pub fn get(&self, cluster: usize) -> Option<CanonicalColor> {
        self.colors.get(cluster).copied()
    }

    /// Like [`ColorTable::get`], but returns the RGB value.
    pub fn rgb(&self, cluster: usize) -> Option<Rgb8> {
        self.get(cluster).map(CanonicalColor::rgb)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[CanonicalColor] {
        &self.colors
    }
}
