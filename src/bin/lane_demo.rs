use lane_detector::config::lane::load_config;
use lane_detector::detector::LaneParams;
use lane_detector::edges::{detect_edges, gaussian_blur, sobel_gradients};
use lane_detector::image::io::{
    load_grayscale_image, save_grayscale_f32, save_grayscale_u8, write_json_file, GrayImageU8,
};
use lane_detector::image::ImageF32;
use lane_detector::segments::{extract_segments, LineSegment};
use lane_detector::types::{LaneEstimate, LaneResult};
use lane_detector::{CalibFile, LaneDetector};
use std::env;
use std::path::Path;

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
    let gray = load_grayscale_image(&config.input_path)?;

    let detector =
        LaneDetector::new(config.lane_params.clone(), &pose).map_err(|e| e.to_string())?;
    let result = detector
        .process(&gray.as_view())
        .map_err(|e| e.to_string())?;

    print_text_summary(&result, detector.camera_height());

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &result)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &gray, detector.params())?;
        println!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: lane_demo <config.json>".to_string()
}

fn print_text_summary(result: &LaneResult, camera_height: f64) {
    println!("Lane detection summary");
    println!("  camera height: {camera_height:.3} m");
    println!("  left:  {}", describe(&result.left));
    println!("  right: {}", describe(&result.right));

    let t = &result.timings;
    println!(
        "  timings (ms): preprocess={:.3} extract={:.3} backproject={:.3} total={:.3}",
        t.preprocess_ms, t.extract_ms, t.backproject_ms, t.total_ms
    );
}

fn describe(lane: &Option<LaneEstimate>) -> String {
    match lane {
        Some(est) => format!(
            "angle {:+.4} rad, segment ({:.1}, {:.1}) -> ({:.1}, {:.1}), {} votes",
            est.angle_rad,
            est.segment.p0[0],
            est.segment.p0[1],
            est.segment.p1[0],
            est.segment.p1[1],
            est.segment.votes
        ),
        None => "not found".to_string(),
    }
}

fn save_debug_artifacts(dir: &Path, gray: &GrayImageU8, params: &LaneParams) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;

    let float = ImageF32::from_u8(&gray.as_view());
    let edges = detect_edges(&float, &params.edge);
    let segments = extract_segments(&edges, &params.hough);

    // Raw gradient magnitude before suppression, same blur as the pipeline.
    let blurred;
    let grad_src = if params.edge.blur_ksize >= 3 {
        blurred = gaussian_blur(&float, params.edge.blur_ksize);
        &blurred
    } else {
        &float
    };
    let grad = sobel_gradients(grad_src);
    save_grayscale_f32(&grad.mag, &dir.join("gradient.png"))?;

    let edge_image = GrayImageU8::new(edges.w, edges.h, edges.data.clone());
    save_grayscale_u8(&edge_image, &dir.join("edges.png"))?;
    save_grayscale_u8(&draw_segments(gray, &segments), &dir.join("overlay.png"))?;
    write_json_file(&dir.join("segments.json"), &segments)?;

    Ok(())
}

/// Burns the extracted segments into a copy of the input frame.
fn draw_segments(gray: &GrayImageU8, segments: &[LineSegment]) -> GrayImageU8 {
    let mut overlay = gray.clone();
    let width = overlay.width();
    let height = overlay.height();
    let data = overlay.data_mut();
    for seg in segments {
        let dx = seg.p1[0] - seg.p0[0];
        let dy = seg.p1[1] - seg.p0[1];
        let steps = dx.hypot(dy).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (seg.p0[0] + t * dx).round() as isize;
            let y = (seg.p0[1] + t * dy).round() as isize;
            if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
                data[y as usize * width + x as usize] = 255;
            }
        }
    }
    overlay
}
