//! KITTI calibration file parsing.
//!
//! Calibration files carry one named row per matrix: a `Name:` column
//! followed by twelve whitespace-delimited values, reshaped row-major to
//! 3x4. Road-scene files provide the camera-2 projection (`P2`) and the
//! camera-to-road extrinsic (`Tr_cam_to_road`), which together assemble the
//! [`CameraPose`] the detector needs.

use crate::camera::{CameraError, CameraPose};
use nalgebra::Matrix3x4;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Row name of the camera-2 (left color) projection matrix.
pub const PROJECTION_CAM2: &str = "P2";
/// Row name of the camera-to-road extrinsic transform.
pub const CAM_TO_ROAD: &str = "Tr_cam_to_road";

const ROW_VALUES: usize = 12;

/// Calibration parsing and pose-assembly failures.
#[derive(Debug, Error)]
pub enum CalibError {
    #[error("failed to read calibration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("calibration line {line}: row {name:?} has {got} values, expected {ROW_VALUES}")]
    WrongValueCount {
        line: usize,
        name: String,
        got: usize,
    },
    #[error("calibration line {line}: row {name:?} has non-numeric entry {token:?}")]
    BadNumber {
        line: usize,
        name: String,
        token: String,
    },
    #[error("calibration has no row named {0:?}")]
    MissingRow(String),
    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Parsed calibration file: named 3x4 matrices.
///
/// Unknown row names are kept as-is, so odometry-format files load too;
/// only a missing required row errors, at lookup time.
#[derive(Debug, Clone, Default)]
pub struct CalibFile {
    rows: BTreeMap<String, Matrix3x4<f64>>,
}

impl CalibFile {
    /// Parses calibration text. Blank lines are skipped; a trailing colon on
    /// the row name is stripped.
    pub fn parse(text: &str) -> Result<Self, CalibError> {
        let mut rows = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let mut tokens = raw.split_whitespace();
            let name = match tokens.next() {
                Some(name) => name.trim_end_matches(':').to_string(),
                None => continue,
            };

            let tokens: Vec<&str> = tokens.collect();
            if tokens.len() != ROW_VALUES {
                return Err(CalibError::WrongValueCount {
                    line,
                    name,
                    got: tokens.len(),
                });
            }

            let mut values = [0.0f64; ROW_VALUES];
            for (slot, token) in values.iter_mut().zip(&tokens) {
                *slot = token.parse().map_err(|_| CalibError::BadNumber {
                    line,
                    name: name.clone(),
                    token: token.to_string(),
                })?;
            }
            rows.insert(name, Matrix3x4::from_row_slice(&values));
        }
        Ok(Self { rows })
    }

    /// Reads and parses a calibration file from disk.
    pub fn load(path: &Path) -> Result<Self, CalibError> {
        let text = fs::read_to_string(path).map_err(|source| CalibError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Looks up a row by name.
    pub fn get(&self, name: &str) -> Option<&Matrix3x4<f64>> {
        self.rows.get(name)
    }

    /// Looks up a row by name, erroring when absent.
    pub fn require(&self, name: &str) -> Result<&Matrix3x4<f64>, CalibError> {
        self.rows
            .get(name)
            .ok_or_else(|| CalibError::MissingRow(name.to_string()))
    }

    /// Row names present in the file, sorted.
    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Assembles the detector pose for a road-scene file: intrinsics from
    /// the decomposed `P2` projection, extrinsic from `Tr_cam_to_road`.
    pub fn road_pose(&self) -> Result<CameraPose, CalibError> {
        let p2 = self.require(PROJECTION_CAM2)?;
        let cam_to_road = self.require(CAM_TO_ROAD)?;
        Ok(CameraPose::from_projection(p2, cam_to_road)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix3;

    const ROAD_FIXTURE: &str = "\
P0: 721.5377 0.0 609.5593 0.0 0.0 721.5377 172.854 0.0 0.0 0.0 1.0 0.0
P2: 721.5377 0.0 609.5593 44.85728 0.0 721.5377 172.854 0.2163791 0.0 0.0 1.0 0.002745884
R0_rect: 1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0 0.0
Tr_cam_to_road: 1.0 0.0 0.0 -0.2451836 0.0 1.0 0.0 -1.574066 0.0 0.0 1.0 0.2921928
";

    #[test]
    fn parses_named_rows() {
        let calib = CalibFile::parse(ROAD_FIXTURE).unwrap();
        let names: Vec<&str> = calib.row_names().collect();
        assert_eq!(names, vec!["P0", "P2", "R0_rect", "Tr_cam_to_road"]);

        let p2 = calib.get("P2").unwrap();
        assert_abs_diff_eq!(p2[(0, 0)], 721.5377);
        assert_abs_diff_eq!(p2[(0, 3)], 44.85728);
        assert_abs_diff_eq!(p2[(2, 3)], 0.002745884);
    }

    #[test]
    fn skips_blank_lines() {
        let calib = CalibFile::parse("\nP2: 1 0 0 0 0 1 0 0 0 0 1 0\n\n").unwrap();
        assert!(calib.get("P2").is_some());
    }

    #[test]
    fn rejects_wrong_value_count() {
        let err = CalibFile::parse("P2: 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            CalibError::WrongValueCount { line: 1, got: 3, .. }
        ));
    }

    #[test]
    fn rejects_non_numeric_entry() {
        let err = CalibFile::parse("P2: 1 2 3 4 5 6 7 x 9 10 11 12\n").unwrap_err();
        assert!(matches!(err, CalibError::BadNumber { line: 1, .. }));
    }

    #[test]
    fn missing_row_is_reported_by_name() {
        let calib = CalibFile::parse("P0: 1 0 0 0 0 1 0 0 0 0 1 0\n").unwrap();
        let err = calib.require(CAM_TO_ROAD).unwrap_err();
        assert!(matches!(err, CalibError::MissingRow(name) if name == CAM_TO_ROAD));
    }

    #[test]
    fn assembles_road_pose() {
        let calib = CalibFile::parse(ROAD_FIXTURE).unwrap();
        let pose = calib.road_pose().unwrap();

        let k = Matrix3::new(721.5377, 0.0, 609.5593, 0.0, 721.5377, 172.854, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(pose.kmtx, k, epsilon = 1e-6);
        assert_abs_diff_eq!(pose.r, Matrix3::identity(), epsilon = 1e-9);
        assert_abs_diff_eq!(pose.t[1], -1.574066, epsilon = 1e-9);
    }
}
