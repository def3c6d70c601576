//! Camera model: projection-matrix decomposition and the validated pose
//! record consumed by the back-projection stage.
//!
//! The decomposition recovers `K`, `R`, `t` from `P = K [R | t]` via an RQ
//! factorization of the left 3x3 block. Note the translation convention:
//! `t` is the extrinsic translation itself, not the homogeneous camera
//! center other toolkits return.

use nalgebra::{Matrix3, Matrix3x4, Matrix4, Vector3};
use thiserror::Error;

const SINGULAR_EPS: f64 = 1e-12;
const ORTHO_TOL: f64 = 1e-4;
const MIN_TRANSLATION: f64 = 1e-9;

/// Failure modes of camera construction and decomposition.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Input matrix carries NaN or infinite entries.
    #[error("camera matrix contains non-finite entries")]
    NonFinite,
    /// The projection's left 3x3 block cannot be split into K and R.
    #[error("projection matrix left 3x3 block is singular")]
    SingularProjection,
    /// The extrinsic rotation block is not orthonormal with det +1.
    #[error("extrinsic rotation is not a rotation matrix (deviation {deviation:.3e})")]
    NotARotation { deviation: f64 },
    /// The extrinsic translation is zero: the camera sits at the road origin
    /// and the ground-plane height cannot be recovered.
    #[error("extrinsic translation is degenerate")]
    DegenerateTranslation,
}

/// Result of [`decompose_projection`]: `P = K [R | t]` up to a positive scale.
#[derive(Debug, Clone)]
pub struct ProjectionDecomposition {
    /// Intrinsics, upper-triangular with positive diagonal and `k[2,2] = 1`.
    pub k: Matrix3<f64>,
    /// Rotation, orthonormal with det +1.
    pub r: Matrix3<f64>,
    /// Extrinsic translation.
    pub t: Vector3<f64>,
}

/// RQ decomposition of a 3x3 matrix into `(K, R)` with `K` upper-triangular
/// (positive diagonal) and `R` orthonormal.
fn rq_decompose(m: &Matrix3<f64>) -> (Matrix3<f64>, Matrix3<f64>) {
    let j = Matrix3::new(0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);

    let m1 = j * m.transpose() * j;
    let qr = m1.qr();

    let mut k = j * qr.r().transpose() * j;
    let mut r = j * qr.q().transpose() * j;

    // Enforce positive diagonal in K.
    let mut d = Matrix3::identity();
    for i in 0..3 {
        if k[(i, i)] < 0.0 {
            d[(i, i)] = -1.0;
        }
    }
    k *= d;
    r = d * r;

    (k, r)
}

/// Splits a combined projection matrix into intrinsics, rotation, and
/// translation.
///
/// The intrinsics are normalized so `k[2,2] = 1`; a determinant flip of the
/// rotation is carried into the translation, so the reconstruction
/// `K [R | t]` matches the input up to a positive scale.
pub fn decompose_projection(p: &Matrix3x4<f64>) -> Result<ProjectionDecomposition, CameraError> {
    if !p.iter().all(|v| v.is_finite()) {
        return Err(CameraError::NonFinite);
    }

    let m = p.fixed_view::<3, 3>(0, 0).into_owned();
    let (mut k, mut r) = rq_decompose(&m);

    let scale = k[(2, 2)];
    if scale.abs() <= SINGULAR_EPS {
        return Err(CameraError::SingularProjection);
    }
    k /= scale;

    let k_inv = k.try_inverse().ok_or(CameraError::SingularProjection)?;
    let mut t: Vector3<f64> = k_inv * p.column(3) / scale;

    if r.determinant() < 0.0 {
        r = -r;
        t = -t;
    }

    Ok(ProjectionDecomposition { k, r, t })
}

/// Embeds 3x3 intrinsics into the top-left block of a 4x4 identity.
pub fn pad_intrinsics(k: &Matrix3<f64>) -> Matrix4<f64> {
    let mut k4 = Matrix4::identity();
    k4.fixed_view_mut::<3, 3>(0, 0).copy_from(k);
    k4
}

/// Intrinsics plus the camera-to-road extrinsic, validated at construction.
///
/// `r` and `t` map camera coordinates into the road frame
/// (`x_road = r * x_cam + t`); the road frame follows the KITTI camera
/// convention with its second axis pointing toward the ground.
#[derive(Debug, Clone)]
pub struct CameraPose {
    pub kmtx: Matrix3<f64>,
    pub r: Matrix3<f64>,
    pub t: Vector3<f64>,
}

impl CameraPose {
    /// Validates and stores a pose.
    ///
    /// Rejects non-finite entries, a non-orthonormal (or reflecting)
    /// rotation block, and a zero translation.
    pub fn new(
        kmtx: Matrix3<f64>,
        r: Matrix3<f64>,
        t: Vector3<f64>,
    ) -> Result<Self, CameraError> {
        let finite = kmtx.iter().all(|v| v.is_finite())
            && r.iter().all(|v| v.is_finite())
            && t.iter().all(|v| v.is_finite());
        if !finite {
            return Err(CameraError::NonFinite);
        }

        let deviation = (r.transpose() * r - Matrix3::identity()).norm();
        let det = r.determinant();
        if deviation > ORTHO_TOL || (det - 1.0).abs() > ORTHO_TOL {
            return Err(CameraError::NotARotation { deviation });
        }

        if t.norm() <= MIN_TRANSLATION {
            return Err(CameraError::DegenerateTranslation);
        }

        Ok(Self { kmtx, r, t })
    }

    /// Builds a pose from a projection matrix (for the intrinsics) and a
    /// camera-to-road `[R | t]` extrinsic.
    pub fn from_projection(
        p: &Matrix3x4<f64>,
        cam_to_road: &Matrix3x4<f64>,
    ) -> Result<Self, CameraError> {
        let kmtx = decompose_projection(p)?.k;
        let r = cam_to_road.fixed_view::<3, 3>(0, 0).into_owned();
        let t = cam_to_road.column(3).into_owned();
        Self::new(kmtx, r, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Rotation3;

    fn compose(k: &Matrix3<f64>, r: &Matrix3<f64>, t: &Vector3<f64>) -> Matrix3x4<f64> {
        let mut p = Matrix3x4::zeros();
        p.fixed_view_mut::<3, 3>(0, 0).copy_from(&(k * r));
        p.set_column(3, &(k * t));
        p
    }

    #[test]
    fn rq_recovers_upper_triangular_times_rotation() {
        let k = Matrix3::new(721.5, 0.5, 609.6, 0.0, 721.5, 172.9, 0.0, 0.0, 1.0);
        let r = *Rotation3::from_euler_angles(0.02, -0.01, 0.15).matrix();
        let (k_est, r_est) = rq_decompose(&(k * r));

        assert_abs_diff_eq!(k_est, k, epsilon = 1e-8);
        assert_abs_diff_eq!(r_est, r, epsilon = 1e-8);
    }

    #[test]
    fn decompose_round_trips_unit_intrinsics() {
        let k = Matrix3::identity();
        let r = *Rotation3::from_axis_angle(&Vector3::z_axis(), 60f64.to_radians()).matrix();
        let t = Vector3::new(1.0, 4.0, 3.0);

        let parts = decompose_projection(&compose(&k, &r, &t)).unwrap();
        assert_abs_diff_eq!(parts.k, k, epsilon = 1e-5);
        assert_abs_diff_eq!(parts.r, r, epsilon = 1e-5);
        assert_abs_diff_eq!(parts.t, t, epsilon = 1e-5);
    }

    #[test]
    fn decompose_round_trips_road_intrinsics() {
        let k = Matrix3::new(721.5377, 0.0, 609.5593, 0.0, 721.5377, 172.854, 0.0, 0.0, 1.0);
        let r = *Rotation3::from_euler_angles(-0.008, 0.004, 0.001).matrix();
        let t = Vector3::new(0.05, -1.65, 0.3);

        let parts = decompose_projection(&compose(&k, &r, &t)).unwrap();
        assert_abs_diff_eq!(parts.k, k, epsilon = 1e-6);
        assert_abs_diff_eq!(parts.r, r, epsilon = 1e-9);
        assert_abs_diff_eq!(parts.t, t, epsilon = 1e-9);
    }

    #[test]
    fn decompose_rejects_singular_left_block() {
        let mut p = Matrix3x4::zeros();
        p[(0, 0)] = 1.0;
        p[(1, 1)] = 1.0;
        assert!(matches!(
            decompose_projection(&p),
            Err(CameraError::SingularProjection)
        ));
    }

    #[test]
    fn pad_embeds_intrinsics_into_identity() {
        let k = Matrix3::new(700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0);
        let k4 = pad_intrinsics(&k);
        assert_eq!(k4.fixed_view::<3, 3>(0, 0).into_owned(), k);
        assert_eq!(k4[(3, 3)], 1.0);
        assert_eq!(k4[(0, 3)], 0.0);
        assert!(k4.try_inverse().is_some());
    }

    #[test]
    fn pose_rejects_bad_rotation() {
        let bad = Matrix3::identity() * 2.0;
        let err = CameraPose::new(Matrix3::identity(), bad, Vector3::new(0.0, -1.65, 0.0));
        assert!(matches!(err, Err(CameraError::NotARotation { .. })));
    }

    #[test]
    fn pose_rejects_zero_translation() {
        let err = CameraPose::new(Matrix3::identity(), Matrix3::identity(), Vector3::zeros());
        assert!(matches!(err, Err(CameraError::DegenerateTranslation)));
    }

    #[test]
    fn pose_accepts_kitti_convention() {
        let pose = CameraPose::new(
            Matrix3::identity(),
            Matrix3::identity(),
            Vector3::new(0.0, -1.65, 0.0),
        )
        .unwrap();
        assert_eq!(pose.t[1], -1.65);
    }
}
