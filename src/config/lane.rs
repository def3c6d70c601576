//! JSON config consumed by `lane_demo`.
//!
//! Only the image and calibration paths are mandatory; output and tuning
//! sections fall back to their defaults when omitted.

use crate::detector::LaneParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    pub calib_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub lane_params: LaneParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::SelectionPolicy;

    #[test]
    fn minimal_config_uses_defaults() {
        let json = r#"{
            "input_path": "data/um_000000.png",
            "calib_path": "data/um_000000.txt"
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert!(config.output.json_out.is_none());
        assert_eq!(config.lane_params.selection, SelectionPolicy::FirstMatch);
        assert_eq!(config.lane_params.edge.blur_ksize, 5);
    }

    #[test]
    fn full_config_overrides_tuning() {
        let json = r#"{
            "input_path": "frame.png",
            "calib_path": "calib.txt",
            "output": { "json_out": "lanes.json" },
            "lane_params": {
                "edge": { "low_thresh": 90.0, "roi": [[0.0, 370.0], [600.0, 150.0], [1200.0, 370.0]] },
                "hough": { "votes_threshold": 25 },
                "selection": { "policy": "min_separation", "min_px": 120.0 }
            }
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.lane_params.edge.low_thresh, 90.0);
        assert_eq!(config.lane_params.edge.roi.len(), 3);
        assert_eq!(config.lane_params.hough.votes_threshold, 25);
        assert_eq!(
            config.lane_params.selection,
            SelectionPolicy::MinSeparation { min_px: 120.0 }
        );
    }
}
