//! Integer source-over arithmetic over straight-alpha packed ARGB.

use crate::foundation::math::{alpha, blue, green, pack_argb, red};

/// Source-over blend of one straight-alpha ARGB pixel onto another.
///
/// Fully opaque sources replace the destination outright and fully
/// transparent sources leave it untouched; everything in between runs
/// the weighted blend with truncating integer division, channels
/// saturating at 255.
#[inline]
pub(crate) fn source_over(dst: u32, src: u32) -> u32 {
    let src_a = alpha(src);
    if src_a == 255 {
        return src;
    }
    if src_a == 0 {
        return dst;
    }

    let dst_a = alpha(dst);
    let inv = 255 - src_a;
    let res_a = src_a * 255 + dst_a * inv;
    if res_a == 0 {
        return dst;
    }

    let blend =
        |s: u32, d: u32| -> u32 { ((s * src_a * 255 + d * dst_a * inv) / res_a).min(255) };
    pack_argb(
        res_a / 255,
        blend(red(src), red(dst)),
        blend(green(src), green(dst)),
        blend(blue(src), blue(dst)),
    )
}
