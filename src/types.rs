use serde::Serialize;

use crate::segments::LineSegment;

/// Lane side tag derived from a segment's bottom-row crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LaneSide {
    Left,
    Right,
}

/// Segment chosen for one side, with its recovered ground-frame angle.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LaneEstimate {
    pub segment: LineSegment,
    /// Lane direction in the ground plane, radians.
    pub angle_rad: f64,
}

/// Wall-clock time spent in each stage, milliseconds.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StageTimings {
    pub preprocess_ms: f64,
    pub extract_ms: f64,
    pub backproject_ms: f64,
    pub total_ms: f64,
}

/// Output record of one detector run.
///
/// A missing side means the extractor produced no usable segment for it;
/// that is a reported outcome, not an error.
#[derive(Clone, Debug, Serialize)]
pub struct LaneResult {
    pub left: Option<LaneEstimate>,
    pub right: Option<LaneEstimate>,
    pub timings: StageTimings,
}
