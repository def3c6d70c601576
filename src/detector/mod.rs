//! Lane detector orchestrating the image-to-ground-angle pipeline.
//!
//! Overview
//! - Preprocesses a grayscale frame into a thinned edge map (blur, Sobel,
//!   non-maximum suppression, hysteresis, optional polygon ROI).
//! - Extracts straight line segments from the edge map with a Hough
//!   transform, strongest peaks first.
//! - Classifies each candidate by where its line crosses the bottom image
//!   row and keeps the first candidate per side.
//! - Back-projects the endpoints of the chosen segments through the camera
//!   onto the road plane and reports per-side lane angles in radians.
//!
//! Modules
//! - [`options`] – configuration types used by the detector and CLI.
//! - `pipeline` – the main [`LaneDetector`] implementation.
//! - `selection` – bottom-row side classification and candidate picking.
//! - `backproject` – the pixel-to-ground engine built from a camera pose.
//!
//! Key Ideas
//! - Segments arrive ranked by accumulator strength, so selection walks the
//!   list once and stops as soon as both sides are filled.
//! - A missing side is an ordinary outcome carried as `None`, never an
//!   error; errors are reserved for degenerate camera geometry.
//! - Ground angles live in the bird's-eye frame (x forward, y right) and
//!   do not depend on the camera height, only on the ray directions.

pub mod options;

mod backproject;
mod pipeline;
mod selection;

pub use backproject::{BackprojectError, Backprojector};
pub use options::{LaneParams, SelectionPolicy};
pub use pipeline::{LaneDetector, LaneError};
pub use selection::{classify_side, select_sides, SelectedSides};
