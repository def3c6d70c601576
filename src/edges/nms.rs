//! Non-maximum suppression and hysteresis linking on gradient magnitude.
//!
//! Canny-style thinning: a pixel survives only if its magnitude dominates its
//! two neighbors along the quantized gradient direction (strictly on the
//! leading side, ties allowed on the trailing side, so a two-pixel plateau
//! keeps exactly one response).
//! Hysteresis then keeps every thinned pixel above the high threshold plus
//! any pixel above the low threshold connected to one through an
//! 8-neighborhood.
//!
//! The outermost 1-pixel frame is ignored during suppression to avoid
//! out-of-bounds checks in neighbor lookup.

use super::grad::Grad;
use super::EdgeMap;
use crate::image::ImageF32;

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Marker value for edge pixels in an [`EdgeMap`].
pub const EDGE: u8 = 255;

/// Thin the gradient magnitude along the local gradient direction.
///
/// Returns a raster holding the surviving magnitudes; suppressed pixels are
/// zero. `mag_floor` is an early gate: pixels below it can never become
/// edges, so they are skipped outright.
pub fn run_nms(grad: &Grad, mag_floor: f32) -> ImageF32 {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut thinned = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return thinned;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out_row = thinned.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < mag_floor {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x + 1], mag_next[x - 1])
                } else {
                    (mag_prev[x - 1], mag_next[x + 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x + 1], mag_next[x - 1])
            } else {
                (mag_prev[x - 1], mag_next[x + 1])
            };

            if mag <= neighbor1 || mag < neighbor2 {
                continue;
            }

            out_row[x] = mag;
        }
    }

    thinned
}

/// Double-threshold hysteresis linking over a thinned magnitude raster.
pub fn hysteresis(thinned: &ImageF32, low: f32, high: f32) -> EdgeMap {
    let w = thinned.w;
    let h = thinned.h;
    let mut map = EdgeMap::new(w, h);
    if w == 0 || h == 0 {
        return map;
    }

    let mut stack: Vec<(usize, usize)> = Vec::new();
    for y in 0..h {
        let row = thinned.row(y);
        for x in 0..w {
            if row[x] < high || map.data[y * w + x] != 0 {
                continue;
            }
            map.data[y * w + x] = EDGE;
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                let x0 = cx.saturating_sub(1);
                let x1 = (cx + 1).min(w - 1);
                let y0 = cy.saturating_sub(1);
                let y1 = (cy + 1).min(h - 1);
                for ny in y0..=y1 {
                    for nx in x0..=x1 {
                        let idx = ny * w + nx;
                        if map.data[idx] == 0 && thinned.get(nx, ny) >= low {
                            map.data[idx] = EDGE;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }
    }

    map
}
