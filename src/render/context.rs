//! Destination ownership and the perspective draw loop.

use rayon::prelude::*;

use crate::{
    foundation::error::{QuadblitError, QuadblitResult},
    foundation::math::opaque,
    raster::adapter::Raster,
    raster::buffer::PixelBuffer,
    render::{composite, sampler},
    transform::homography::{Homography, Quad},
};

/// Interpolation quality for [`CompositorContext::draw_image`].
///
/// `Bilinear` and `Bicubic` are 2x2 and 4x4 supersampling box filters
/// over the destination pixel; the names describe the quality tier,
/// not the numerical method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Interpolation {
    /// Round the inverse-mapped point to one source pixel.
    #[default]
    Nearest,
    /// Box-average a 2x2 sub-sample window.
    Bilinear,
    /// Box-average a 4x4 sub-sample window.
    Bicubic,
}

impl Interpolation {
    fn grid(self) -> u32 {
        match self {
            Self::Nearest => 1,
            Self::Bilinear => 2,
            Self::Bicubic => 4,
        }
    }
}

/// One draw operation: place `source`'s corners at `corners`.
#[derive(Clone, Copy, Debug)]
pub struct DrawRequest<'a> {
    /// Canonical source pixels, read-only for the whole call.
    pub source: &'a PixelBuffer,
    /// Destination-space placement of the source's four corners.
    pub corners: Quad,
    /// Sampling quality.
    pub interpolation: Interpolation,
}

/// Scoped owner of a destination raster.
///
/// A context is opened over a destination handle, accepts any number of
/// draw calls against the working buffer, and commits the result back to
/// the handle exactly once: on [`dispose`](Self::dispose), or on drop
/// for contexts that never disposed explicitly. A failed draw leaves the
/// buffer with whatever completed pixels it had; disposal still flushes
/// them.
pub struct CompositorContext<'a> {
    dest: &'a mut dyn Raster,
    buffer: PixelBuffer,
    disposed: bool,
}

impl<'a> CompositorContext<'a> {
    /// Adapt `dest` into a working packed-ARGB buffer and take ownership
    /// of it until disposal.
    pub fn open(dest: &'a mut dyn Raster) -> QuadblitResult<Self> {
        let buffer = dest.open()?;
        Ok(Self {
            dest,
            buffer,
            disposed: false,
        })
    }

    /// Warp the request's source onto the destination.
    ///
    /// Solves the corner homography once, then visits only destination
    /// pixels inside the corners' bounding box (expanded by one pixel and
    /// clamped to the canvas); everything outside stays bit-identical.
    /// Rows render in parallel; each pixel is computed fully before it is
    /// stored, so no partially blended word is ever observable.
    #[tracing::instrument(skip(self, req), fields(interpolation = ?req.interpolation))]
    pub fn draw_image(&mut self, req: &DrawRequest<'_>) -> QuadblitResult<()> {
        if self.disposed {
            return Err(QuadblitError::context_disposed(
                "draw_image on a disposed context",
            ));
        }

        let src = req.source;
        if src.width() == 0 || src.height() == 0 || self.buffer.width() == 0 {
            return Ok(());
        }

        let inverse = Homography::rect_to_quad(
            f64::from(src.width()),
            f64::from(src.height()),
            &req.corners,
        )
        .and_then(|forward| forward.invert())
        .ok_or_else(|| {
            QuadblitError::degenerate_transform("corner correspondence is not invertible")
        })?;

        let Some((x0, x1, y0, y1)) =
            clipped_bounds(&req.corners, self.buffer.width(), self.buffer.height())
        else {
            return Ok(());
        };

        let grid = req.interpolation.grid();
        let source_is_opaque = !src.has_alpha();
        let stride = self.buffer.stride() as usize;

        self.buffer
            .pixels_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .skip(y0)
            .take(y1 - y0)
            .for_each(|(y, row)| {
                draw_row(src, &inverse, row, y, x0, x1, grid, source_is_opaque);
            });
        Ok(())
    }

    /// Adapt `source` through the raster adapter, then draw it.
    pub fn draw_raster(
        &mut self,
        source: &dyn Raster,
        corners: Quad,
        interpolation: Interpolation,
    ) -> QuadblitResult<()> {
        let buffer = source.open()?;
        self.draw_image(&DrawRequest {
            source: &buffer,
            corners,
            interpolation,
        })
    }

    /// Read access to the working destination buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Whether the context has already committed its writes.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Commit the working buffer back to the destination handle.
    ///
    /// Idempotent: the first call writes back, later calls are no-ops.
    /// Write-back failures are logged rather than returned; the context
    /// counts as disposed either way.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Err(err) = self.dest.commit(&self.buffer) {
            tracing::warn!(%err, "destination write-back failed during dispose");
        }
    }
}

impl Drop for CompositorContext<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Integer pixel range touched by the quad: its corner bounding box
/// expanded by one pixel, clamped to the canvas. `None` when the quad
/// lies entirely off-canvas.
fn clipped_bounds(corners: &Quad, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
    let bounds = corners.bounds();
    let x0 = (bounds.x0.floor() - 1.0).max(0.0);
    let y0 = (bounds.y0.floor() - 1.0).max(0.0);
    let x1 = (bounds.x1.ceil() + 1.0).min(f64::from(width));
    let y1 = (bounds.y1.ceil() + 1.0).min(f64::from(height));
    if x0 < x1 && y0 < y1 {
        Some((x0 as usize, x1 as usize, y0 as usize, y1 as usize))
    } else {
        None
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    src: &PixelBuffer,
    inverse: &Homography,
    row: &mut [u32],
    y: usize,
    x0: usize,
    x1: usize,
    grid: u32,
    source_is_opaque: bool,
) {
    for x in x0..x1 {
        let sampled = if grid == 1 {
            sampler::sample_nearest(src, inverse, x as f64, y as f64)
        } else {
            sampler::sample_box(src, inverse, x as f64, y as f64, grid)
        };
        let Some(color) = sampled else {
            continue;
        };
        row[x] = if source_is_opaque {
            opaque(color)
        } else {
            composite::source_over(row[x], color)
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
