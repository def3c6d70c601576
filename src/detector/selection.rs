//! Left/right assignment of ranked line segments.

use super::options::SelectionPolicy;
use crate::segments::LineSegment;
use crate::types::LaneSide;

/// Column at which `y = slope * x + intercept` crosses the bottom image row.
fn bottom_crossing(slope: f64, intercept: f64, image_height: f64) -> f64 {
    (image_height - intercept) / slope
}

/// Assign a line to the lane side its bottom-row crossing falls on.
///
/// Ties at the midline resolve to `Right`. `slope` must be non-zero; a
/// horizontal line has no bottom-row crossing and the caller rejects it.
pub fn classify_side(
    slope: f64,
    intercept: f64,
    image_height: f64,
    image_width: f64,
) -> LaneSide {
    if bottom_crossing(slope, intercept, image_height) < image_width / 2.0 {
        LaneSide::Left
    } else {
        LaneSide::Right
    }
}

/// One candidate per side picked from the ranked list; either may be absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectedSides {
    pub left: Option<LineSegment>,
    pub right: Option<LineSegment>,
}

/// Scan the ranked list and keep the first usable segment per side.
///
/// Vertical and horizontal carriers are skipped since their bottom-row
/// crossing is undefined. Scanning short-circuits once both sides are
/// filled; a side the list never fills stays `None`.
pub fn select_sides(
    segments: &[LineSegment],
    image_width: usize,
    image_height: usize,
    policy: SelectionPolicy,
) -> SelectedSides {
    let w = image_width as f64;
    let h = image_height as f64;

    let mut left: Option<(LineSegment, f64)> = None;
    let mut right: Option<(LineSegment, f64)> = None;

    for seg in segments {
        if left.is_some() && right.is_some() {
            break;
        }
        let Some((slope, intercept)) = seg.slope_intercept() else {
            continue;
        };
        if slope == 0.0 {
            continue;
        }

        let x_bottom = bottom_crossing(slope, intercept, h);
        let (slot, other) = match classify_side(slope, intercept, h, w) {
            LaneSide::Left => (&mut left, &right),
            LaneSide::Right => (&mut right, &left),
        };
        if slot.is_some() {
            continue;
        }
        if let SelectionPolicy::MinSeparation { min_px } = policy {
            if let Some((_, other_x)) = other {
                if (x_bottom - other_x).abs() < min_px {
                    continue;
                }
            }
        }
        *slot = Some((*seg, x_bottom));
    }

    SelectedSides {
        left: left.map(|(seg, _)| seg),
        right: right.map(|(seg, _)| seg),
    }
}
