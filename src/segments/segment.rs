use serde::{Deserialize, Serialize};

/// Endpoint runs in x below this count as vertical.
const VERTICAL_DX_EPS: f64 = 1e-9;

/// Image-plane line segment with endpoints in pixel coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    /// Number of edge pixels supporting the segment.
    pub votes: u32,
}

impl LineSegment {
    pub fn new(p0: [f64; 2], p1: [f64; 2], votes: u32) -> Self {
        Self { p0, p1, votes }
    }

    /// Euclidean distance between the endpoints.
    pub fn length(&self) -> f64 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Slope and intercept of the carrier line `y = slope * x + intercept`.
    ///
    /// `None` when the endpoints share an x-coordinate, where the slope is
    /// undefined.
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        let dx = self.p1[0] - self.p0[0];
        if dx.abs() < VERTICAL_DX_EPS {
            return None;
        }
        let slope = (self.p1[1] - self.p0[1]) / dx;
        let intercept = self.p0[1] - slope * self.p0[0];
        Some((slope, intercept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_intercept_of_a_diagonal() {
        let seg = LineSegment::new([0.0, 1.0], [2.0, 5.0], 10);
        let (slope, intercept) = seg.slope_intercept().unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn vertical_segment_has_no_slope() {
        let seg = LineSegment::new([3.0, 0.0], [3.0, 7.0], 4);
        assert!(seg.slope_intercept().is_none());
    }

    #[test]
    fn length_is_euclidean() {
        let seg = LineSegment::new([0.0, 0.0], [3.0, 4.0], 1);
        assert!((seg.length() - 5.0).abs() < 1e-12);
    }
}
