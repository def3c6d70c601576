#![doc = include_str!("../README.md")]

// Stable public surface.
pub mod calib;
pub mod camera;
pub mod config;
pub mod detector;
pub mod image;
pub mod types;

// Lower-level stages. Public so the tools and tests can drive them
// directly, but their APIs may still move.
pub mod edges;
pub mod geometry;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{LaneDetector, LaneError, LaneParams};
pub use crate::types::{LaneEstimate, LaneResult, LaneSide};

// Calibration parsing and camera pose handling.
pub use crate::calib::{CalibError, CalibFile};
pub use crate::camera::{CameraError, CameraPose};

// Back-projection engine for callers that bring their own segments.
pub use crate::detector::{BackprojectError, Backprojector, SelectionPolicy};

// Perspective helpers that are generally useful on their own.
pub use crate::geometry::{apply_perspective_transform, apply_perspective_transform_points};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_detector::prelude::*;
/// use nalgebra::{Matrix3, Vector3};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (1242usize, 375usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let pose = CameraPose::new(
///     Matrix3::identity(),
///     Matrix3::identity(),
///     Vector3::new(0.0, -1.65, 0.0),
/// )?;
/// let detector = LaneDetector::new(LaneParams::default(), &pose)?;
///
/// let result = detector.process(&img)?;
/// println!(
///     "left={:?} right={:?} latency_ms={:.3}",
///     result.left.map(|l| l.angle_rad),
///     result.right.map(|l| l.angle_rad),
///     result.timings.total_ms
/// );
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{CalibFile, CameraPose, LaneDetector, LaneParams, LaneResult};
}
