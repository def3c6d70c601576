use lane_detector::detector::{LaneParams, SelectionPolicy};
use lane_detector::image::io::write_json_file;
use lane_detector::segments::LineSegment;
use lane_detector::types::LaneEstimate;
use lane_detector::{CalibFile, LaneDetector};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Replays a saved segment list through side selection and back-projection,
/// bypassing the image stages. Useful for tuning against dumped artifacts.
#[derive(Debug, Deserialize)]
pub struct BackprojectToolConfig {
    pub calib_path: PathBuf,
    pub segments_json: PathBuf,
    pub image_width: usize,
    pub image_height: usize,
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub json_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<BackprojectToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let calib = CalibFile::load(&config.calib_path).map_err(|e| e.to_string())?;
    let pose = calib.road_pose().map_err(|e| e.to_string())?;
    let segments = load_segments(&config.segments_json)?;

    let params = LaneParams {
        selection: config.selection,
        ..LaneParams::default()
    };
    let detector = LaneDetector::new(params, &pose).map_err(|e| e.to_string())?;
    let result = detector
        .process_segments(&segments, config.image_width, config.image_height)
        .map_err(|e| e.to_string())?;

    println!(
        "Back-projected {} segments on a {}x{} image (camera height {:.3} m)",
        segments.len(),
        config.image_width,
        config.image_height,
        detector.camera_height()
    );
    print_side("left", &result.left);
    print_side("right", &result.right);

    if let Some(path) = &config.json_out {
        write_json_file(path, &result)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: backproject_demo <config.json>".to_string()
}

fn load_segments(path: &Path) -> Result<Vec<LineSegment>, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read segments {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse segments {}: {e}", path.display()))
}

fn print_side(label: &str, lane: &Option<LaneEstimate>) {
    match lane {
        Some(est) => println!(
            "  {label}: angle {:+.4} rad from segment ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            est.angle_rad,
            est.segment.p0[0],
            est.segment.p0[1],
            est.segment.p1[0],
            est.segment.p1[1]
        ),
        None => println!("  {label}: not found"),
    }
}
