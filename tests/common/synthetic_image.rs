/// Uniform dark "asphalt" frame.
pub fn road_background(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![20u8; width * height]
}

/// Paints a straight bright lane band, three pixels wide, running from
/// `(x_bottom, y_bottom)` up to row `y_top`. Each row upward shifts the
/// band centre by `dx_per_row` pixels.
pub fn paint_lane(
    img: &mut [u8],
    width: usize,
    x_bottom: f64,
    y_bottom: usize,
    y_top: usize,
    dx_per_row: f64,
) {
    assert!(y_top <= y_bottom, "lane must run bottom-up");
    for y in y_top..=y_bottom {
        let x_center = x_bottom + (y_bottom - y) as f64 * dx_per_row;
        let xc = x_center.round() as isize;
        for dx in -1..=1isize {
            let x = xc + dx;
            if x >= 0 && (x as usize) < width {
                img[y * width + x as usize] = 230;
            }
        }
    }
}

/// Two bright lane lines converging toward the top of the frame, tilted
/// 40 degrees off vertical so their Hough angles land on the default
/// 2-degree grid.
pub fn two_lane_scene(width: usize, height: usize) -> Vec<u8> {
    let mut img = road_background(width, height);
    let slant = 40f64.to_radians().tan();
    paint_lane(&mut img, width, 40.0, height - 1, 60, slant);
    paint_lane(&mut img, width, (width - 40) as f64, height - 1, 60, -slant);
    img
}
