//! Per-pixel source sampling under an inverse perspective transform.
//!
//! Nearest mode rounds the single inverse-mapped point. Bilinear and
//! bicubic modes supersample a small grid of sub-pixel offsets inside the
//! destination pixel and box-average the hits; this mirrors the quality
//! ladder of `RenderingHints`-style interpolation constants, not a true
//! convolution kernel, and the blur characteristics of the box filter are
//! part of the contract.

use crate::{
    foundation::math::{alpha, blue, green, pack_argb, red},
    raster::buffer::PixelBuffer,
    transform::homography::Homography,
};

/// Truncation bias for sub-pixel point sampling.
const SAMPLE_EPSILON: f64 = 1e-6;

/// Nearest-neighbor sample for destination pixel `(x, y)`, or `None`
/// when the rounded source position misses the source raster.
#[inline]
pub(crate) fn sample_nearest(
    src: &PixelBuffer,
    inverse: &Homography,
    x: f64,
    y: f64,
) -> Option<u32> {
    let (sx, sy) = inverse.apply(x, y);
    let sx = (sx + 0.5).floor();
    let sy = (sy + 0.5).floor();
    if sx >= 0.0 && sx < f64::from(src.width()) && sy >= 0.0 && sy < f64::from(src.height()) {
        src.get(sx as u32, sy as u32)
    } else {
        None
    }
}

/// Box-filtered sample over a `grid x grid` window of sub-pixel offsets
/// inside destination pixel `(x, y)`.
///
/// Each sub-sample is inverse-mapped independently and point-sampled with
/// truncation; sub-samples that miss the source contribute nothing.
/// Returns `None` when every sub-sample missed.
pub(crate) fn sample_box(
    src: &PixelBuffer,
    inverse: &Homography,
    x: f64,
    y: f64,
    grid: u32,
) -> Option<u32> {
    let w = f64::from(src.width());
    let h = f64::from(src.height());
    let step = 1.0 / f64::from(grid);

    let mut sum = [0u32; 4];
    let mut hits = 0u32;
    for j in 0..grid {
        for i in 0..grid {
            let (sx, sy) = inverse.apply(x + f64::from(i) * step, y + f64::from(j) * step);
            let fx = (sx - SAMPLE_EPSILON).floor();
            let fy = (sy - SAMPLE_EPSILON).floor();
            if fx >= 0.0
                && fx < w
                && fy >= 0.0
                && fy < h
                && let Some(px) = src.get(fx as u32, fy as u32)
            {
                sum[0] += alpha(px);
                sum[1] += red(px);
                sum[2] += green(px);
                sum[3] += blue(px);
                hits += 1;
            }
        }
    }

    if hits == 0 {
        return None;
    }
    Some(pack_argb(
        sum[0] / hits,
        sum[1] / hits,
        sum[2] / hits,
        sum[3] / hits,
    ))
}
