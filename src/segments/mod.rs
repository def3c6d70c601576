//! Hough-transform line-segment extractor.
//!
//! Turns a binary edge map into a ranked list of image-plane segments:
//!
//! - Polar voting: every edge pixel votes for all carrier lines through it,
//!   quantized to `(rho, theta)` accumulator bins (`rho = x cos θ + y sin θ`).
//! - Peak picking: bins above the vote threshold that dominate their 3x3
//!   accumulator neighborhood become line candidates, strongest first.
//! - Segment chaining: each candidate's carrier line is walked across the
//!   image, collecting supporting edge pixels into runs; runs are split
//!   where the gap exceeds `max_line_gap` and kept when they reach
//!   `min_line_length`.
//! - Consumption: pixels claimed by an emitted segment are ignored by later
//!   (weaker) candidates, so near-duplicate accumulator peaks do not emit
//!   near-duplicate segments.
//!
//! Output order follows accumulator peak strength, which downstream
//! selection treats as detection confidence. No deduplication beyond pixel
//! consumption is applied.

mod hough;
mod segment;

pub use hough::HoughOptions;
pub use segment::LineSegment;

use crate::edges::EdgeMap;

/// Extract ranked line segments from a binary edge map.
pub fn extract_segments(map: &EdgeMap, options: &HoughOptions) -> Vec<LineSegment> {
    let segments = hough::HoughExtractor::new(map, *options).extract();
    log::debug!(
        "hough: {} segments from {} edge pixels",
        segments.len(),
        map.count_edges()
    );
    segments
}
