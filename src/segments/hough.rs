use super::LineSegment;
use crate::edges::EdgeMap;
use serde::Deserialize;

/// Knobs for the Hough-transform segment extractor.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    /// Accumulator distance resolution in pixels.
    pub rho_res: f64,
    /// Accumulator angle resolution in degrees.
    pub theta_res_deg: f64,
    /// Minimum accumulator votes before a line is considered.
    pub votes_threshold: u32,
    /// Minimum accepted segment length in pixels.
    pub min_line_length: f64,
    /// Largest run of missing pixels bridged while chaining a segment.
    pub max_line_gap: f64,
    /// Upper bound on emitted segments.
    pub max_segments: usize,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho_res: 2.0,
            theta_res_deg: 2.0,
            votes_threshold: 10,
            min_line_length: 20.0,
            max_line_gap: 10.0,
            max_segments: 64,
        }
    }
}

pub(super) struct HoughExtractor<'a> {
    map: &'a EdgeMap,
    options: HoughOptions,
    rho_res: f64,
    rho_bins: usize,
    theta_bins: usize,
    /// Shift making `rho + rho_offset` non-negative (the image diagonal).
    rho_offset: f64,
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
    accumulator: Vec<u32>,
    consumed: Vec<u8>,
    segments: Vec<LineSegment>,
}

impl<'a> HoughExtractor<'a> {
    pub(super) fn new(map: &'a EdgeMap, options: HoughOptions) -> Self {
        let rho_res = if options.rho_res.is_finite() && options.rho_res > 0.0 {
            options.rho_res
        } else {
            1.0
        };
        let theta_res_deg =
            if options.theta_res_deg.is_finite() && options.theta_res_deg > 0.0 {
                options.theta_res_deg
            } else {
                1.0
            };

        let diag = ((map.w * map.w + map.h * map.h) as f64).sqrt();
        let rho_bins = (2.0 * diag / rho_res).ceil() as usize + 1;
        let theta_bins = (180.0 / theta_res_deg).round().max(1.0) as usize;
        let thetas: Vec<f64> = (0..theta_bins)
            .map(|t| (t as f64 * theta_res_deg).to_radians())
            .collect();

        Self {
            map,
            options,
            rho_res,
            rho_bins,
            theta_bins,
            rho_offset: diag,
            cos_table: thetas.iter().map(|a| a.cos()).collect(),
            sin_table: thetas.iter().map(|a| a.sin()).collect(),
            accumulator: vec![0; rho_bins * theta_bins],
            consumed: vec![0; map.w * map.h],
            segments: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> Vec<LineSegment> {
        if self.map.w == 0 || self.map.h == 0 {
            return self.segments;
        }

        self.vote();
        for (_votes, r, t) in self.find_peaks() {
            if self.segments.len() >= self.options.max_segments {
                break;
            }
            self.walk_line(r, t);
        }
        self.segments
    }

    fn vote(&mut self) {
        for y in 0..self.map.h {
            for x in 0..self.map.w {
                if !self.map.is_edge(x, y) {
                    continue;
                }
                for t in 0..self.theta_bins {
                    let rho =
                        x as f64 * self.cos_table[t] + y as f64 * self.sin_table[t];
                    let r = self.rho_index(rho);
                    self.accumulator[r * self.theta_bins + t] += 1;
                }
            }
        }
    }

    #[inline]
    fn rho_index(&self, rho: f64) -> usize {
        let r = ((rho + self.rho_offset) / self.rho_res).round() as usize;
        r.min(self.rho_bins - 1)
    }

    /// Accumulator bins above the vote threshold that dominate their 3x3
    /// neighborhood, strongest first.
    fn find_peaks(&self) -> Vec<(u32, usize, usize)> {
        let mut peaks = Vec::new();
        for r in 0..self.rho_bins {
            for t in 0..self.theta_bins {
                let votes = self.accumulator[r * self.theta_bins + t];
                if votes < self.options.votes_threshold {
                    continue;
                }
                if self.is_local_max(r, t, votes) {
                    peaks.push((votes, r, t));
                }
            }
        }
        peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        peaks
    }

    fn is_local_max(&self, r: usize, t: usize, votes: u32) -> bool {
        for dr in -1i64..=1 {
            for dt in -1i64..=1 {
                if dr == 0 && dt == 0 {
                    continue;
                }
                let rn = r as i64 + dr;
                let tn = t as i64 + dt;
                if rn < 0
                    || tn < 0
                    || rn >= self.rho_bins as i64
                    || tn >= self.theta_bins as i64
                {
                    continue;
                }
                if self.accumulator[rn as usize * self.theta_bins + tn as usize] > votes {
                    return false;
                }
            }
        }
        true
    }

    /// Walk along the peak's carrier line, chaining unconsumed edge pixels
    /// into runs split at `max_line_gap` and kept at `min_line_length`.
    fn walk_line(&mut self, r: usize, t: usize) {
        let cos_t = self.cos_table[t];
        let sin_t = self.sin_table[t];
        let rho = r as f64 * self.rho_res - self.rho_offset;

        // Base point on the line, unit direction along it.
        let bx = rho * cos_t;
        let by = rho * sin_t;
        let dx = -sin_t;
        let dy = cos_t;

        let w = (self.map.w - 1) as f64;
        let h = (self.map.h - 1) as f64;
        let corners = [[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]];
        let mut smin = f64::INFINITY;
        let mut smax = f64::NEG_INFINITY;
        for c in corners {
            let s = (c[0] - bx) * dx + (c[1] - by) * dy;
            smin = smin.min(s);
            smax = smax.max(s);
        }

        let steps = (smax - smin).ceil() as usize;
        let mut run: Vec<(usize, usize)> = Vec::new();
        let mut gap = 0.0;

        for step in 0..=steps {
            let s = smin + step as f64;
            let px = bx + s * dx;
            let py = by + s * dy;

            // Probe a one-pixel band across the line to absorb the rho
            // quantization of the accumulator.
            let mut hit = None;
            for k in [0.0, -1.0, 1.0] {
                let qx = (px + k * cos_t).round();
                let qy = (py + k * sin_t).round();
                if qx < 0.0 || qy < 0.0 || qx > w || qy > h {
                    continue;
                }
                let (x, y) = (qx as usize, qy as usize);
                if self.map.is_edge(x, y) && self.consumed[y * self.map.w + x] == 0 {
                    hit = Some((x, y));
                    break;
                }
            }

            match hit {
                Some(p) => {
                    if run.last() != Some(&p) {
                        run.push(p);
                    }
                    gap = 0.0;
                }
                None => {
                    if !run.is_empty() {
                        gap += 1.0;
                        if gap > self.options.max_line_gap {
                            self.finalize_run(&mut run);
                            if self.segments.len() >= self.options.max_segments {
                                return;
                            }
                        }
                    }
                }
            }
        }
        self.finalize_run(&mut run);
    }

    fn finalize_run(&mut self, run: &mut Vec<(usize, usize)>) {
        if run.len() >= 2 {
            let (x0, y0) = run[0];
            let (x1, y1) = run[run.len() - 1];
            let seg = LineSegment::new(
                [x0 as f64, y0 as f64],
                [x1 as f64, y1 as f64],
                run.len() as u32,
            );
            if seg.length() >= self.options.min_line_length {
                for &(x, y) in run.iter() {
                    self.consumed[y * self.map.w + x] = 1;
                }
                self.segments.push(seg);
            }
        }
        run.clear();
    }
}
