//! Edge preprocessing: blur, gradients, suppression, hysteresis, ROI.
//!
//! The stage chain mirrors a classical Canny pipeline:
//!
//! - Separable 5-tap binomial blur (optional, on by default).
//! - 3×3 Sobel gradients with magnitude.
//! - Direction-aligned non-maximum suppression.
//! - Double-threshold hysteresis linking into a binary [`EdgeMap`].
//! - Optional polygonal region-of-interest mask.
//!
//! Design goals
//! - Favor clarity and cache-friendly row access over micro-optimizations.
//! - Handle borders by clamping indices (replicate).
//! - Keep the output a plain byte raster the line extractor can scan.

pub mod blur;
pub mod grad;
pub mod nms;
pub mod roi;

pub use blur::{binomial_kernel, gaussian_blur};
pub use grad::{sobel_gradients, Grad};
pub use nms::{hysteresis, run_nms};
pub use roi::mask_outside_polygon;

use crate::image::ImageF32;
use serde::Deserialize;

/// Binary edge raster: `0` background, [`nms::EDGE`] for edge pixels.
#[derive(Clone, Debug, Default)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    /// Zero-initialized (all background) map.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    /// Number of edge pixels set.
    pub fn count_edges(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Preprocessing knobs for the edge stage.
///
/// Thresholds are quoted on the familiar 8-bit gradient scale (the pipeline
/// works on normalized intensities internally).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    /// Binomial blur kernel size in pixels (odd; below 3 disables the blur).
    pub blur_ksize: usize,
    /// Hysteresis low threshold, 8-bit gradient scale.
    pub low_thresh: f32,
    /// Hysteresis high threshold, 8-bit gradient scale.
    pub high_thresh: f32,
    /// Region-of-interest polygon vertices in pixel coordinates.
    /// Empty disables masking.
    pub roi: Vec<[f64; 2]>,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            blur_ksize: 5,
            low_thresh: 130.0,
            high_thresh: 200.0,
            roi: Vec::new(),
        }
    }
}

/// Run the full edge chain on a normalized grayscale buffer.
pub fn detect_edges(gray: &ImageF32, options: &EdgeOptions) -> EdgeMap {
    let blurred;
    let src = if options.blur_ksize >= 3 {
        blurred = gaussian_blur(gray, options.blur_ksize);
        &blurred
    } else {
        gray
    };

    let grad = sobel_gradients(src);
    let low = options.low_thresh / 255.0;
    let high = options.high_thresh / 255.0;
    let thinned = run_nms(&grad, low);
    let mut map = hysteresis(&thinned, low, high);

    if !options.roi.is_empty() {
        mask_outside_polygon(&mut map, &options.roi);
    }

    log::debug!(
        "edges: {} edge pixels on {}x{} (low={} high={})",
        map.count_edges(),
        map.w,
        map.h,
        options.low_thresh,
        options.high_thresh
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_edge_survives_the_full_chain() {
        let mut img = ImageF32::new(24, 24);
        for y in 0..24 {
            for x in 12..24 {
                img.set(x, y, 1.0);
            }
        }

        let map = detect_edges(&img, &EdgeOptions::default());
        let found = (2..22).all(|y| (10..14).any(|x| map.is_edge(x, y)));
        assert!(found, "step edge should produce a vertical edge chain");
    }

    #[test]
    fn flat_image_yields_no_edges() {
        let mut img = ImageF32::new(16, 16);
        img.data.fill(0.7);
        let map = detect_edges(&img, &EdgeOptions::default());
        assert_eq!(map.count_edges(), 0);
    }

    #[test]
    fn roi_confines_edges() {
        let mut img = ImageF32::new(24, 24);
        for y in 0..24 {
            for x in 12..24 {
                img.set(x, y, 1.0);
            }
        }

        let mut options = EdgeOptions::default();
        options.roi = vec![[0.0, 0.0], [24.0, 0.0], [24.0, 10.0], [0.0, 10.0]];
        let map = detect_edges(&img, &options);

        assert!((0..24).all(|x| !map.is_edge(x, 16)));
        assert!(map.count_edges() > 0);
    }
}
