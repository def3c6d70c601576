//! Homogeneous-coordinate primitives shared by the projection stages.
//!
//! All helpers are pure and operate on `f64` vectors. Conversions that divide
//! by a homogeneous scale return `None` when the scale is zero or the result
//! is not finite; callers turn that into a typed error.

use nalgebra::{Matrix3, Vector2, Vector3, Vector4};

const EPS: f64 = 1e-12;

/// Appends a trailing 1, lifting a 2D point into homogeneous coordinates.
#[inline]
pub fn augment2(v: &Vector2<f64>) -> Vector3<f64> {
    v.push(1.0)
}

/// Appends a trailing 1, lifting a 3D point into homogeneous coordinates.
#[inline]
pub fn augment3(v: &Vector3<f64>) -> Vector4<f64> {
    v.push(1.0)
}

/// Batched [`augment3`]: appends a 1 to every row.
pub fn augment3_points(pts: &[[f64; 3]]) -> Vec<[f64; 4]> {
    pts.iter().map(|p| [p[0], p[1], p[2], 1.0]).collect()
}

/// Divides the leading components by the trailing scale and drops it.
pub fn homo_to_cart3(v: &Vector3<f64>) -> Option<Vector2<f64>> {
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS {
        return None;
    }
    let out = Vector2::new(v[0] / w, v[1] / w);
    if !out[0].is_finite() || !out[1].is_finite() {
        return None;
    }
    Some(out)
}

/// Four-dimensional variant of [`homo_to_cart3`].
pub fn homo_to_cart4(v: &Vector4<f64>) -> Option<Vector3<f64>> {
    let w = v[3];
    if !w.is_finite() || w.abs() <= EPS {
        return None;
    }
    let out = Vector3::new(v[0] / w, v[1] / w, v[2] / w);
    if !out.iter().all(|c| c.is_finite()) {
        return None;
    }
    Some(out)
}

/// Augments `v`, multiplies by `m`, and renormalizes, in that order.
///
/// The one operation used to move points between image, camera, and
/// bird's-eye frames; the caller picks the frame by picking `m`.
pub fn apply_perspective_transform(m: &Matrix3<f64>, v: &Vector2<f64>) -> Option<Vector2<f64>> {
    homo_to_cart3(&(m * augment2(v)))
}

/// Batched [`apply_perspective_transform`] over pixel coordinates.
///
/// `None` if any point maps to a degenerate homogeneous scale.
pub fn apply_perspective_transform_points(
    m: &Matrix3<f64>,
    pts: &[[f64; 2]],
) -> Option<Vec<[f64; 2]>> {
    let mut out = Vec::with_capacity(pts.len());
    for &p in pts {
        let v = apply_perspective_transform(m, &Vector2::new(p[0], p[1]))?;
        out.push([v[0], v[1]]);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn augment_appends_unit_scale() {
        let v = augment3(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn augment_batch_appends_per_row() {
        let out = augment3_points(&[[1.1, 2.2, 3.3], [4.4, 5.5, 6.6]]);
        assert_eq!(out, vec![[1.1, 2.2, 3.3, 1.0], [4.4, 5.5, 6.6, 1.0]]);
    }

    #[test]
    fn homo_to_cart_divides_by_scale() {
        let v = homo_to_cart3(&Vector3::new(1.0, 2.0, 2.0)).unwrap();
        assert_eq!(v, Vector2::new(0.5, 1.0));
    }

    #[test]
    fn homo_to_cart_rejects_zero_scale() {
        assert!(homo_to_cart3(&Vector3::new(1.0, 2.0, 0.0)).is_none());
        assert!(homo_to_cart4(&Vector4::new(1.0, 2.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn augment_round_trips_through_cart() {
        let v = Vector3::new(-4.0, 0.25, 9.5);
        let back = homo_to_cart4(&augment3(&v)).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn perspective_transform_matches_reference() {
        let s = std::f64::consts::SQRT_2 / 2.0;
        let m = Matrix3::new(s, s, 0.0, s, -s, 0.0, 0.0, 0.0, 1.0);
        let out = apply_perspective_transform(&m, &Vector2::new(2.0, 1.0)).unwrap();
        assert_abs_diff_eq!(out[0], 2.12132, epsilon = 1e-5);
        assert_abs_diff_eq!(out[1], 0.707107, epsilon = 1e-5);
    }

    #[test]
    fn perspective_transform_batch() {
        let m = Matrix3::new(2.0, 0.0, 1.0, 0.0, 2.0, -1.0, 0.0, 0.0, 1.0);
        let out = apply_perspective_transform_points(&m, &[[0.0, 0.0], [1.0, 2.0]]).unwrap();
        assert_eq!(out, vec![[1.0, -1.0], [3.0, 3.0]]);
    }

    #[test]
    fn perspective_transform_rejects_degenerate_scale() {
        // Bottom row maps every point to zero homogeneous scale.
        let m = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(apply_perspective_transform(&m, &Vector2::new(2.0, 1.0)).is_none());
        assert!(apply_perspective_transform_points(&m, &[[2.0, 1.0]]).is_none());
    }
}
