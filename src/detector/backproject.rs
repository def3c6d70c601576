//! Inverse perspective mapping of lane segments onto the road plane.
//!
//! Every pixel ray is scale-ambiguous on its own; the camera's height above
//! the road pins the scale by declaring where the ray meets the ground.
//! Per endpoint the engine:
//!
//! - Rotates the homogeneous pixel into the bird's-eye frame (road forward,
//!   road right, road down) and drops back to Cartesian.
//! - Re-augments to 4D and divides the trailing scale by the camera height,
//!   assigning the ground-plane depth to the ray.
//! - Applies the inverse of the 4x4-padded intrinsic matrix and converts to
//!   a Cartesian bird's-eye point.
//!
//! The lane angle is the `atan2` of the displacement between the segment's
//! two ground points with the constant height component dropped.

use nalgebra::{Matrix3, Matrix4, Vector2, Vector3};
use thiserror::Error;

use crate::camera::{pad_intrinsics, CameraPose};
use crate::geometry::{apply_perspective_transform, augment2, augment3, homo_to_cart4};
use crate::segments::LineSegment;

/// Camera heights below this are treated as sitting on the road plane.
const MIN_CAMERA_HEIGHT: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum BackprojectError {
    /// The pose rotation could not be solved for the road origin.
    #[error("rotation is singular, cannot recover the road origin")]
    SingularRotation,
    /// Camera height is zero or near zero; ground depth is undefined.
    #[error("camera height {0:.6} is too close to the road plane")]
    CameraAtRoadLevel(f64),
    /// The intrinsic matrix has no inverse.
    #[error("intrinsic matrix is not invertible")]
    SingularIntrinsics,
    /// A pixel ray collapsed to zero scale under the bird's-eye rotation.
    #[error("pixel ray degenerates under the bird's-eye rotation")]
    DegenerateRay,
    /// Both endpoints landed on the same ground point; no direction exists.
    #[error("segment endpoints back-project to the same ground point")]
    ZeroDisplacement,
}

/// Maps image-plane lane segments to ground-plane direction angles.
///
/// Construction precomputes everything derived from the pose; one instance
/// serves any number of segments taken with the same camera.
#[derive(Debug)]
pub struct Backprojector {
    /// Road-rotation rows reordered to [forward, right, down].
    cam_to_bev: Matrix3<f64>,
    /// Inverse of the 4x4-padded intrinsic matrix.
    kmtx4_inv: Matrix4<f64>,
    /// Camera height above the road plane.
    height: f64,
}

impl Backprojector {
    pub fn new(pose: &CameraPose) -> Result<Self, BackprojectError> {
        // Road origin expressed in camera coordinates: R * p = -t. Its
        // component along the road's down axis is the camera height.
        let p_road_origin = pose
            .r
            .lu()
            .solve(&(-pose.t))
            .ok_or(BackprojectError::SingularRotation)?;
        let height = p_road_origin.y;
        if !height.is_finite() || height.abs() < MIN_CAMERA_HEIGHT {
            return Err(BackprojectError::CameraAtRoadLevel(height));
        }

        let r = &pose.r;
        let cam_to_bev = Matrix3::new(
            r[(2, 0)], r[(2, 1)], r[(2, 2)],
            r[(0, 0)], r[(0, 1)], r[(0, 2)],
            r[(1, 0)], r[(1, 1)], r[(1, 2)],
        );
        let kmtx4_inv = pad_intrinsics(&pose.kmtx)
            .try_inverse()
            .ok_or(BackprojectError::SingularIntrinsics)?;

        Ok(Self {
            cam_to_bev,
            kmtx4_inv,
            height,
        })
    }

    /// Camera height above the road recovered from the pose.
    pub fn camera_height(&self) -> f64 {
        self.height
    }

    /// Ground-plane direction angle of one image segment, radians.
    ///
    /// Zero points along the road's forward axis; positive angles turn
    /// toward the road's right axis.
    pub fn segment_angle(&self, segment: &LineSegment) -> Result<f64, BackprojectError> {
        let p0 = self.ground_point(&Vector2::new(segment.p0[0], segment.p0[1]))?;
        let p1 = self.ground_point(&Vector2::new(segment.p1[0], segment.p1[1]))?;
        // The third (down) component is the constant assigned depth; the
        // lane direction lives in the remaining two.
        let d = p1 - p0;
        if d.x == 0.0 && d.y == 0.0 {
            return Err(BackprojectError::ZeroDisplacement);
        }
        Ok(d.y.atan2(d.x))
    }

    /// Bird's-eye-frame ground point hit by the pixel's camera ray.
    fn ground_point(&self, pixel: &Vector2<f64>) -> Result<Vector3<f64>, BackprojectError> {
        let dir = apply_perspective_transform(&self.cam_to_bev, pixel)
            .ok_or(BackprojectError::DegenerateRay)?;
        let mut ray = augment3(&augment2(&dir));
        ray[3] /= self.height;
        homo_to_cart4(&(self.kmtx4_inv * ray)).ok_or(BackprojectError::DegenerateRay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Vector3};

    /// Road-aligned camera hovering `height` above the road origin.
    fn hovering_pose(height: f64) -> CameraPose {
        CameraPose::new(
            Matrix3::identity(),
            Matrix3::identity(),
            Vector3::new(0.0, -height, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn recovers_camera_height() {
        let engine = Backprojector::new(&hovering_pose(1.65)).unwrap();
        assert_abs_diff_eq!(engine.camera_height(), 1.65, epsilon = 1e-12);
    }

    #[test]
    fn forward_lane_maps_to_zero_angle() {
        // A lane parallel to the road keeps a constant lateral offset, so
        // its ground direction is pure forward.
        let engine = Backprojector::new(&hovering_pose(1.65)).unwrap();
        let seg = LineSegment::new([-2.0, 1.0], [-1.0, 0.5], 30);
        let angle = engine.segment_angle(&seg).unwrap();
        assert_abs_diff_eq!(angle, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn known_ground_points_round_trip() {
        // With identity intrinsics the pixel (px, py) observes the ground
        // point (h / py, h * px / py, h) in the bird's-eye frame.
        let engine = Backprojector::new(&hovering_pose(2.0)).unwrap();
        let p = engine
            .ground_point(&Vector2::new(0.5, 0.25))
            .unwrap();
        assert_abs_diff_eq!(p.x, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn mirrored_segments_give_opposite_angles() {
        let seg = LineSegment::new([-2.0, 1.0], [-0.8, 0.5], 30);
        let mirrored = LineSegment::new([2.0, 1.0], [0.8, 0.5], 30);

        for height in [0.4, 1.65, 3.2] {
            let engine = Backprojector::new(&hovering_pose(height)).unwrap();
            let left = engine.segment_angle(&seg).unwrap();
            let right = engine.segment_angle(&mirrored).unwrap();
            assert!(left > 0.0);
            assert_abs_diff_eq!(left, -right, epsilon = 1e-12);
        }
    }

    #[test]
    fn angle_is_independent_of_height() {
        let seg = LineSegment::new([-2.0, 1.0], [-0.8, 0.5], 30);
        let reference = Backprojector::new(&hovering_pose(1.0))
            .unwrap()
            .segment_angle(&seg)
            .unwrap();
        for height in [0.1, 5.0, 40.0] {
            let angle = Backprojector::new(&hovering_pose(height))
                .unwrap()
                .segment_angle(&seg)
                .unwrap();
            assert_abs_diff_eq!(angle, reference, epsilon = 1e-12);
        }
    }

    #[test]
    fn camera_on_the_road_is_rejected() {
        let pose = CameraPose::new(
            Matrix3::identity(),
            Matrix3::identity(),
            Vector3::new(0.3, 0.0, 0.1),
        )
        .unwrap();
        match Backprojector::new(&pose) {
            Err(BackprojectError::CameraAtRoadLevel(_)) => {}
            other => panic!("expected CameraAtRoadLevel, got {other:?}"),
        }
    }

    #[test]
    fn horizon_ray_is_degenerate() {
        // py = 0 rotates to a homogeneous vector with zero scale.
        let engine = Backprojector::new(&hovering_pose(1.65)).unwrap();
        let seg = LineSegment::new([-1.0, 0.0], [-0.5, 0.5], 10);
        match engine.segment_angle(&seg) {
            Err(BackprojectError::DegenerateRay) => {}
            other => panic!("expected DegenerateRay, got {other:?}"),
        }
    }

    #[test]
    fn point_like_segment_has_no_direction() {
        let engine = Backprojector::new(&hovering_pose(1.65)).unwrap();
        let seg = LineSegment::new([0.5, 1.0], [0.5, 1.0], 1);
        match engine.segment_angle(&seg) {
            Err(BackprojectError::ZeroDisplacement) => {}
            other => panic!("expected ZeroDisplacement, got {other:?}"),
        }
    }
}
