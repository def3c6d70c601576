//! Separable binomial blur applied ahead of gradient computation.

use crate::image::ImageF32;

/// Normalized binomial kernel of odd length `ksize` (a row of Pascal's
/// triangle divided by its sum). `ksize = 5` gives the familiar
/// `[1, 4, 6, 4, 1] / 16` taps. Lengths above 63 are clamped.
pub fn binomial_kernel(ksize: usize) -> Vec<f32> {
    let n = ksize.clamp(1, 63);
    let mut row = vec![0u64; n];
    row[0] = 1;
    for i in 1..n {
        for j in (1..=i).rev() {
            row[j] += row[j - 1];
        }
    }
    let norm = row.iter().sum::<u64>() as f32;
    row.iter().map(|&c| c as f32 / norm).collect()
}

/// Two-pass separable binomial blur with clamped (replicated) borders.
///
/// Kernel sizes below 3 return the input unchanged; even sizes are bumped
/// to the next odd size.
pub fn gaussian_blur(src: &ImageF32, ksize: usize) -> ImageF32 {
    let w = src.w;
    let h = src.h;
    if ksize < 3 || w == 0 || h == 0 {
        return src.clone();
    }
    let ksize = if ksize % 2 == 0 {
        log::warn!("blur kernel size {ksize} is even, using {}", ksize + 1);
        ksize + 1
    } else {
        ksize
    };

    let kernel = binomial_kernel(ksize);
    let r = kernel.len() / 2;
    let mut tmp = ImageF32::new(w, h);
    let mut out = ImageF32::new(w, h);

    for y in 0..h {
        let row = src.row(y);
        let dst = tmp.row_mut(y);
        for x in 0..w {
            let mut acc = 0.0;
            for (i, &tap) in kernel.iter().enumerate() {
                let xi = (x + i).saturating_sub(r).min(w - 1);
                acc += tap * row[xi];
            }
            dst[x] = acc;
        }
    }

    for y in 0..h {
        let dst = out.row_mut(y);
        for (i, &tap) in kernel.iter().enumerate() {
            let yi = (y + i).saturating_sub(r).min(h - 1);
            let row = tmp.row(yi);
            for x in 0..w {
                dst[x] += tap * row[x];
            }
        }
    }

    out
}
