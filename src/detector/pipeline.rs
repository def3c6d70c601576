//! Lane detector driving the image-to-angles pipeline end-to-end.
//!
//! [`LaneDetector`] exposes a simple API: feed a grayscale image and get
//! per-side lane angles with stage timings. Internally it chains edge
//! preprocessing, Hough segment extraction, side selection, and the
//! back-projection engine.
//!
//! Typical usage:
//! ```no_run
//! use lane_detector::image::io::load_grayscale_image;
//! use lane_detector::{CalibFile, LaneDetector, LaneParams};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let calib = CalibFile::load("um_000000.txt".as_ref())?;
//! let pose = calib.road_pose()?;
//! let detector = LaneDetector::new(LaneParams::default(), &pose)?;
//!
//! let image = load_grayscale_image("um_000000.png".as_ref())?;
//! let result = detector.process(&image.as_view())?;
//! if let Some(left) = &result.left {
//!     println!("left lane angle: {:.4} rad", left.angle_rad);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Instant;

use log::debug;
use thiserror::Error;

use super::backproject::{BackprojectError, Backprojector};
use super::options::LaneParams;
use super::selection::select_sides;
use crate::camera::CameraPose;
use crate::edges::detect_edges;
use crate::image::{ImageF32, ImageU8};
use crate::segments::{extract_segments, LineSegment};
use crate::types::{LaneEstimate, LaneResult, StageTimings};

/// Run-level detector failure. Every failure today originates in the
/// back-projection engine.
#[derive(Debug, Error)]
pub enum LaneError {
    #[error(transparent)]
    Backproject(#[from] BackprojectError),
}

fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Lane detector orchestrating preprocessing, line extraction, side
/// selection, and back-projection.
///
/// The pose and parameters are fixed at construction; `process` never
/// mutates them, so one detector can serve a whole image sequence.
pub struct LaneDetector {
    params: LaneParams,
    backprojector: Backprojector,
}

impl LaneDetector {
    /// Build a detector for one camera. Fails when the pose admits no
    /// ground-plane back-projection.
    pub fn new(params: LaneParams, pose: &CameraPose) -> Result<Self, LaneError> {
        let backprojector = Backprojector::new(pose)?;
        debug!(
            "LaneDetector::new camera height {:.3}",
            backprojector.camera_height()
        );
        Ok(Self {
            params,
            backprojector,
        })
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Camera height above the road recovered from the pose.
    pub fn camera_height(&self) -> f64 {
        self.backprojector.camera_height()
    }

    /// Run the full pipeline on a grayscale image.
    pub fn process(&self, gray: &ImageU8) -> Result<LaneResult, LaneError> {
        let total_start = Instant::now();
        debug!("LaneDetector::process start w={} h={}", gray.w, gray.h);

        let stage_start = Instant::now();
        let normalized = ImageF32::from_u8(gray);
        let edges = detect_edges(&normalized, &self.params.edge);
        let preprocess_ms = ms_since(stage_start);

        let stage_start = Instant::now();
        let segments = extract_segments(&edges, &self.params.hough);
        let extract_ms = ms_since(stage_start);

        let stage_start = Instant::now();
        let (left, right) = self.backproject_sides(&segments, gray.w, gray.h)?;
        let backproject_ms = ms_since(stage_start);

        debug!(
            "LaneDetector::process done segments={} left={} right={}",
            segments.len(),
            left.is_some(),
            right.is_some()
        );
        Ok(LaneResult {
            left,
            right,
            timings: StageTimings {
                preprocess_ms,
                extract_ms,
                backproject_ms,
                total_ms: ms_since(total_start),
            },
        })
    }

    /// Run side selection and back-projection on an externally produced
    /// ranked segment list.
    pub fn process_segments(
        &self,
        segments: &[LineSegment],
        image_width: usize,
        image_height: usize,
    ) -> Result<LaneResult, LaneError> {
        let start = Instant::now();
        let (left, right) = self.backproject_sides(segments, image_width, image_height)?;
        let backproject_ms = ms_since(start);
        Ok(LaneResult {
            left,
            right,
            timings: StageTimings {
                backproject_ms,
                total_ms: backproject_ms,
                ..StageTimings::default()
            },
        })
    }

    fn backproject_sides(
        &self,
        segments: &[LineSegment],
        image_width: usize,
        image_height: usize,
    ) -> Result<(Option<LaneEstimate>, Option<LaneEstimate>), LaneError> {
        let sides = select_sides(segments, image_width, image_height, self.params.selection);
        Ok((
            self.estimate(sides.left)?,
            self.estimate(sides.right)?,
        ))
    }

    fn estimate(
        &self,
        segment: Option<LineSegment>,
    ) -> Result<Option<LaneEstimate>, LaneError> {
        match segment {
            Some(segment) => {
                let angle_rad = self.backprojector.segment_angle(&segment)?;
                Ok(Some(LaneEstimate {
                    segment,
                    angle_rad,
                }))
            }
            None => Ok(None),
        }
    }
}
