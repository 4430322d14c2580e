use super::*;
use kurbo::Rect;

const RED: u32 = 0xffff_0000;
const GREEN: u32 = 0xff00_ff00;
const BLUE: u32 = 0xff00_00ff;
const WHITE: u32 = 0xffff_ffff;

fn two_by_two_source() -> PixelBuffer {
    PixelBuffer::from_pixels(2, 2, vec![RED, GREEN, BLUE, WHITE], true).unwrap()
}

fn draw(
    dest: &mut PixelBuffer,
    source: &PixelBuffer,
    corners: Quad,
    interpolation: Interpolation,
) -> QuadblitResult<()> {
    let mut ctx = CompositorContext::open(dest)?;
    let result = ctx.draw_image(&DrawRequest {
        source,
        corners,
        interpolation,
    });
    ctx.dispose();
    result
}

#[test]
fn identity_corners_reproduce_the_source_exactly() {
    let source = two_by_two_source();
    let mut dest = PixelBuffer::new(2, 2, true);
    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
        Interpolation::Nearest,
    )
    .unwrap();
    assert_eq!(dest.pixels(), source.pixels());
}

#[test]
fn pixels_outside_the_bounding_box_are_untouched() {
    let source = PixelBuffer::from_pixels(1, 1, vec![RED], true).unwrap();
    let mut dest = PixelBuffer::from_pixels(8, 8, vec![0xff12_3456; 64], true).unwrap();
    let before = dest.pixels().to_vec();

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(2.0, 2.0, 4.0, 4.0)),
        Interpolation::Bilinear,
    )
    .unwrap();

    // Corner bounds (2,2)-(4,4) expand to the pixel box [1,5)x[1,5).
    for y in 0..8u32 {
        for x in 0..8u32 {
            if x < 1 || x >= 5 || y < 1 || y >= 5 {
                let idx = (y * 8 + x) as usize;
                assert_eq!(dest.pixels()[idx], before[idx], "({x},{y}) changed");
            }
        }
    }
}

#[test]
fn one_source_pixel_fills_the_center_square_only() {
    let source = PixelBuffer::from_pixels(1, 1, vec![RED], true).unwrap();
    let mut dest = PixelBuffer::new(4, 4, true);

    // Under rounding nearest sampling, this placement lights up exactly
    // the center 2x2 block.
    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(1.5, 1.5, 3.5, 3.5)),
        Interpolation::Nearest,
    )
    .unwrap();

    for y in 0..4u32 {
        for x in 0..4u32 {
            let expected = if (1..=2).contains(&x) && (1..=2).contains(&y) {
                RED
            } else {
                0
            };
            assert_eq!(dest.get(x, y), Some(expected), "({x},{y})");
        }
    }
}

#[test]
fn fully_transparent_source_is_a_noop() {
    let source = PixelBuffer::from_pixels(2, 2, vec![0x00ff_0000; 4], true).unwrap();
    let mut dest = PixelBuffer::from_pixels(4, 4, vec![0xffab_cdef; 16], true).unwrap();
    let before = dest.pixels().to_vec();

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0)),
        Interpolation::Nearest,
    )
    .unwrap();
    assert_eq!(dest.pixels(), &before[..]);
}

#[test]
fn half_alpha_source_blends_and_opaque_overwrites() {
    // Top-left pixel is half-alpha red, the rest opaque white; drawn over
    // opaque black with identity corners.
    let source =
        PixelBuffer::from_pixels(2, 2, vec![0x80ff_0000, WHITE, WHITE, WHITE], true).unwrap();
    let mut dest = PixelBuffer::from_pixels(2, 2, vec![0xff00_0000; 4], true).unwrap();

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
        Interpolation::Nearest,
    )
    .unwrap();

    assert_eq!(dest.get(0, 0), Some(0xff80_0000));
    assert_eq!(dest.get(1, 0), Some(WHITE));
    assert_eq!(dest.get(0, 1), Some(WHITE));
    assert_eq!(dest.get(1, 1), Some(WHITE));
}

#[test]
fn opaque_source_fast_path_forces_full_alpha() {
    // An alpha-less buffer whose alpha bits happen to be zero must still
    // land fully opaque.
    let source = PixelBuffer::from_pixels(1, 1, vec![0x0012_3456], false).unwrap();
    let mut dest = PixelBuffer::new(1, 1, true);

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        Interpolation::Nearest,
    )
    .unwrap();
    assert_eq!(dest.get(0, 0), Some(0xff12_3456));
}

#[test]
fn opaque_source_over_transparent_dest_copies_rgb() {
    let source = two_by_two_source();
    let opaque_source =
        PixelBuffer::from_pixels(2, 2, source.pixels().to_vec(), false).unwrap();
    let mut dest = PixelBuffer::new(2, 2, true);

    draw(
        &mut dest,
        &opaque_source,
        Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
        Interpolation::Nearest,
    )
    .unwrap();
    assert_eq!(dest.pixels(), source.pixels());
}

#[test]
fn bilinear_identity_keeps_flat_regions_flat() {
    let source = PixelBuffer::from_pixels(2, 2, vec![0xff31_4159; 4], true).unwrap();
    let mut dest = PixelBuffer::new(2, 2, true);

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
        Interpolation::Bilinear,
    )
    .unwrap();
    assert_eq!(dest.pixels(), source.pixels());
}

#[test]
fn bicubic_downscale_averages_the_checkerboard() {
    let source =
        PixelBuffer::from_pixels(2, 2, vec![WHITE, 0xff00_0000, 0xff00_0000, WHITE], true)
            .unwrap();
    let mut dest = PixelBuffer::new(1, 1, true);

    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        Interpolation::Bicubic,
    )
    .unwrap();

    let got = dest.get(0, 0).unwrap();
    let r = (got >> 16) & 0xff;
    let g = (got >> 8) & 0xff;
    let b = got & 0xff;
    assert_eq!(got >> 24, 255);
    assert!(r > 0 && r < 255, "expected a blend, got {got:#010x}");
    assert_eq!(r, g);
    assert_eq!(r, b);
}

#[test]
fn colinear_corners_fail_without_touching_the_destination() {
    let source = two_by_two_source();
    let mut dest = PixelBuffer::from_pixels(4, 4, vec![0xff11_1111; 16], true).unwrap();
    let before = dest.pixels().to_vec();

    let err = draw(
        &mut dest,
        &source,
        Quad::new((0.0, 0.0), (1.0, 1.0), (0.0, 5.0), (2.0, 2.0)),
        Interpolation::Nearest,
    )
    .unwrap_err();
    assert!(matches!(err, QuadblitError::DegenerateTransform(_)), "{err}");
    assert_eq!(dest.pixels(), &before[..]);
}

#[test]
fn perspective_quad_narrows_toward_the_far_edge() {
    // A "floor" projection: wide at the bottom, narrow at the top. Rows
    // near the top must light fewer pixels than rows near the bottom.
    let source = PixelBuffer::from_pixels(4, 4, vec![RED; 16], true).unwrap();
    let mut dest = PixelBuffer::new(16, 8, true);

    draw(
        &mut dest,
        &source,
        Quad::new((6.0, 0.0), (10.0, 0.0), (0.0, 8.0), (16.0, 8.0)),
        Interpolation::Nearest,
    )
    .unwrap();

    let lit = |y: u32| -> usize {
        (0..16u32)
            .filter(|&x| dest.get(x, y) == Some(RED))
            .count()
    };
    assert!(lit(1) > 0);
    assert!(lit(7) > lit(1));
    for y in 0..8u32 {
        for x in 0..16u32 {
            let px = dest.get(x, y).unwrap();
            assert!(px == 0 || px == RED);
        }
    }
}

#[test]
fn draw_after_dispose_is_rejected() {
    let source = two_by_two_source();
    let mut dest = PixelBuffer::new(2, 2, true);
    let mut ctx = CompositorContext::open(&mut dest).unwrap();
    ctx.dispose();
    assert!(ctx.is_disposed());
    // A second dispose stays a no-op.
    ctx.dispose();

    let err = ctx
        .draw_image(&DrawRequest {
            source: &source,
            corners: Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
            interpolation: Interpolation::Nearest,
        })
        .unwrap_err();
    assert!(matches!(err, QuadblitError::ContextDisposed(_)), "{err}");
}

#[test]
fn dropping_an_undisposed_context_still_commits() {
    let source = PixelBuffer::from_pixels(1, 1, vec![RED], true).unwrap();
    let mut dest = PixelBuffer::new(1, 1, true);
    {
        let mut ctx = CompositorContext::open(&mut dest).unwrap();
        ctx.draw_image(&DrawRequest {
            source: &source,
            corners: Quad::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            interpolation: Interpolation::Nearest,
        })
        .unwrap();
    }
    assert_eq!(dest.get(0, 0), Some(RED));
}

#[test]
fn empty_source_draws_nothing() {
    let source = PixelBuffer::new(0, 0, true);
    let mut dest = PixelBuffer::from_pixels(2, 2, vec![0xff22_2222; 4], true).unwrap();
    let before = dest.pixels().to_vec();
    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
        Interpolation::Bicubic,
    )
    .unwrap();
    assert_eq!(dest.pixels(), &before[..]);
}

#[test]
fn off_canvas_quad_draws_nothing() {
    let source = two_by_two_source();
    let mut dest = PixelBuffer::new(4, 4, true);
    draw(
        &mut dest,
        &source,
        Quad::from_rect(Rect::new(100.0, 100.0, 102.0, 102.0)),
        Interpolation::Nearest,
    )
    .unwrap();
    assert!(dest.pixels().iter().all(|&px| px == 0));
}

#[test]
fn interpolation_serializes_by_name() {
    let json = serde_json::to_string(&Interpolation::Bilinear).unwrap();
    assert_eq!(json, "\"Bilinear\"");
    let back: Interpolation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Interpolation::Bilinear);
}
