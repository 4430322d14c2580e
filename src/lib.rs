//! Quadblit warps a source raster onto a destination raster through an
//! arbitrary quadrilateral-to-quadrilateral perspective transform, with
//! source-over alpha compositing and selectable interpolation quality.
//!
//! # Pipeline overview
//!
//! 1. **Adapt**: a [`Raster`] handle is normalized into a packed-ARGB
//!    [`PixelBuffer`] (zero conversion for native buffers, per-pixel
//!    conversion for everything else)
//! 2. **Solve**: the four destination-space corner points yield one
//!    [`Homography`], inverted once per draw call
//! 3. **Sample**: every destination pixel inside the clipped corner
//!    bounding box is inverse-mapped into source space and sampled under
//!    the selected [`Interpolation`] mode
//! 4. **Composite**: sampled colors land with source-over semantics;
//!    [`CompositorContext::dispose`] commits the result back to the
//!    destination handle
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a draw call is a pure function of its inputs;
//!   the row-parallel fast path produces bit-identical output to the
//!   sequential loop.
//! - **No IO**: rasters arrive and leave as in-memory handles; decoding
//!   and persistence live outside the engine.
#![forbid(unsafe_code)]

mod foundation;
mod raster;
mod render;
mod transform;

pub use foundation::error::{QuadblitError, QuadblitResult};
pub use kurbo::{Point, Rect};
pub use raster::adapter::{ByteLayout, ByteRaster, Raster};
pub use raster::buffer::PixelBuffer;
pub use render::context::{CompositorContext, DrawRequest, Interpolation};
pub use transform::homography::{Homography, Quad};
