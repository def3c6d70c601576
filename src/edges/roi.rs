//! Polygonal region-of-interest masking of an edge map.
//!
//! Road scenes confine lane lines to a wedge ahead of the vehicle; masking
//! the edge map to a configured polygon drops gantries, buildings, and hood
//! reflections before line extraction.

use super::EdgeMap;

/// Zero every edge pixel whose center falls outside `polygon`.
///
/// Vertices are in pixel coordinates, in drawing order (closed implicitly).
/// Inside-ness follows the even-odd rule via a per-row scanline. Polygons
/// with fewer than three vertices cannot enclose anything and leave the map
/// untouched.
pub fn mask_outside_polygon(map: &mut EdgeMap, polygon: &[[f64; 2]]) {
    let n = polygon.len();
    if n < 3 {
        log::warn!("roi: polygon with {n} vertices ignored");
        return;
    }

    let w = map.w;
    let mut crossings: Vec<f64> = Vec::with_capacity(n);
    let mut keep = vec![false; w];

    for y in 0..map.h {
        let yc = y as f64 + 0.5;

        crossings.clear();
        for i in 0..n {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            if (a[1] <= yc) != (b[1] <= yc) {
                let t = (yc - a[1]) / (b[1] - a[1]);
                crossings.push(a[0] + t * (b[0] - a[0]));
            }
        }
        crossings.sort_by(f64::total_cmp);

        keep.fill(false);
        for pair in crossings.chunks_exact(2) {
            // Pixel center x + 0.5 lies in [pair[0], pair[1]].
            let start = (pair[0] - 0.5).ceil().max(0.0) as usize;
            let end = (pair[1] - 0.5).floor().min(w as f64 - 1.0);
            if end < 0.0 {
                continue;
            }
            for flag in keep.iter_mut().take(end as usize + 1).skip(start.min(w)) {
                *flag = true;
            }
        }

        let row = &mut map.data[y * w..y * w + w];
        for (px, &inside) in row.iter_mut().zip(&keep) {
            if !inside {
                *px = 0;
            }
        }
    }
}
