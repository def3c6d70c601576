//! Parameter types configuring the detector stages.
//!
//! This module groups the preprocessing, line-extraction, and side-selection
//! knobs. The back-projection itself takes no configuration: it is purely
//! geometric given the camera pose and a segment.
//!
//! Defaults reproduce the behaviour the pipeline was tuned with on KITTI
//! road frames; for new footage start with the edge thresholds and the
//! Hough vote threshold.

use crate::edges::EdgeOptions;
use crate::segments::HoughOptions;
use serde::Deserialize;

/// Detector-wide parameters controlling the image-to-angles pipeline.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    /// Blur, edge-threshold, and region-of-interest knobs.
    pub edge: EdgeOptions,
    /// Hough segment-extractor knobs.
    pub hough: HoughOptions,
    /// Side-assignment strategy applied to the ranked segment list.
    pub selection: SelectionPolicy,
}

/// Strategy picking one left and one right segment from a ranked list.
///
/// The extractor does not deduplicate near-parallel lines, so the first
/// ranked candidate per side can be a duplicate of the other side's line.
/// `MinSeparation` rejects a candidate whose bottom-row crossing lands
/// within `min_px` of the already-chosen opposite side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First left and first right candidate in ranked order.
    #[default]
    FirstMatch,
    /// First-match with a minimum bottom-row separation between the sides,
    /// in pixels.
    MinSeparation { min_px: f64 },
}
