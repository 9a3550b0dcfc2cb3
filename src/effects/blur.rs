use rayon::prelude::*;

use crate::raster::buffer::PixelBuffer;

/// Box blur over the `(2r+1)^2` neighborhood of every interior pixel.
///
/// Pixels closer than `radius` to an edge are copied unchanged, as is alpha everywhere.
/// Channel averages are truncated toward zero. `radius == 0` returns a copy.
pub fn box_blur(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let r = radius as usize;
    if r == 0 || w <= 2 * r || h <= 2 * r {
        return src.clone();
    }

    let row_sums = horizontal_sums(src.as_raw(), w, h, r);
    let count = ((2 * r + 1) * (2 * r + 1)) as u32;

    let mut out = src.clone();
    out.par_rows_mut().enumerate().for_each(|(y, row)| {
        if y < r || y >= h - r {
            return;
        }
        for x in r..w - r {
            let mut acc = [0u32; 3];
            for sy in y - r..=y + r {
                let s = row_sums[sy * w + x];
                acc[0] += s[0];
                acc[1] += s[1];
                acc[2] += s[2];
            }
            let i = x * 4;
            row[i] = (acc[0] / count) as u8;
            row[i + 1] = (acc[1] / count) as u8;
            row[i + 2] = (acc[2] / count) as u8;
        }
    });
    out
}

// Per-pixel sums of the `2r+1` horizontal window, only filled for `x in r..w-r`.
fn horizontal_sums(src: &[u8], w: usize, h: usize, r: usize) -> Vec<[u32; 3]> {
    let mut sums = vec![[0u32; 3]; w * h];
    sums.par_chunks_exact_mut(w)
        .enumerate()
        .for_each(|(y, row_sums)| {
            let row = &src[y * w * 4..(y + 1) * w * 4];
            for x in r..w - r {
                let mut acc = [0u32; 3];
                for sx in x - r..=x + r {
                    let i = sx * 4;
                    acc[0] += u32::from(row[i]);
                    acc[1] += u32::from(row[i + 1]);
                    acc[2] += u32::from(row[i + 2]);
                }
                row_sums[x] = acc;
            }
        });
    sums
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
