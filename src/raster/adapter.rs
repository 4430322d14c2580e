//! Normalization between external raster handles and [`PixelBuffer`].
//!
//! The adapter is the engine's only format-specific code: everything past
//! it sees packed ARGB. Three handle shapes are supported out of the box:
//! a [`PixelBuffer`] itself (already canonical, open/commit are plain row
//! copies), a decoded [`image::DynamicImage`], and a [`ByteRaster`] over
//! raw bytes in one of the layouts decoders commonly emit.

use image::GenericImageView;

use crate::{
    foundation::error::{QuadblitError, QuadblitResult},
    foundation::math::{alpha, blue, green, pack_argb, red},
    raster::buffer::PixelBuffer,
};

/// External raster representations the engine can normalize to packed
/// ARGB and write back to.
pub trait Raster {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Whether the native format carries meaningful alpha.
    fn has_alpha(&self) -> bool;

    /// Canonical packed-ARGB view of the current contents.
    ///
    /// Opaque native formats must produce alpha = 255 for every pixel.
    fn open(&self) -> QuadblitResult<PixelBuffer>;

    /// Write a canonical buffer back into native storage, row by row.
    ///
    /// Fails with [`QuadblitError::Validation`] when the buffer
    /// dimensions do not match the handle.
    fn commit(&mut self, buffer: &PixelBuffer) -> QuadblitResult<()>;
}

fn check_dimensions(handle: &dyn Raster, buffer: &PixelBuffer) -> QuadblitResult<()> {
    if buffer.width() != handle.width() || buffer.height() != handle.height() {
        return Err(QuadblitError::validation(format!(
            "commit of {}x{} buffer into {}x{} raster",
            buffer.width(),
            buffer.height(),
            handle.width(),
            handle.height()
        )));
    }
    Ok(())
}

impl Raster for PixelBuffer {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha()
    }

    fn open(&self) -> QuadblitResult<PixelBuffer> {
        Ok(self.clone())
    }

    fn commit(&mut self, buffer: &PixelBuffer) -> QuadblitResult<()> {
        check_dimensions(self, buffer)?;
        for y in 0..buffer.height() {
            self.row_mut(y).copy_from_slice(buffer.row(y));
        }
        Ok(())
    }
}

impl Raster for image::DynamicImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn has_alpha(&self) -> bool {
        self.color().has_alpha()
    }

    fn open(&self) -> QuadblitResult<PixelBuffer> {
        let rgba = self.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|px| {
                let [r, g, b, a] = px.0;
                pack_argb(u32::from(a), u32::from(r), u32::from(g), u32::from(b))
            })
            .collect();
        PixelBuffer::from_pixels(width, height, pixels, self.color().has_alpha())
    }

    fn commit(&mut self, buffer: &PixelBuffer) -> QuadblitResult<()> {
        check_dimensions(self, buffer)?;
        match self {
            image::DynamicImage::ImageRgba8(img) => {
                for (x, y, px) in img.enumerate_pixels_mut() {
                    let argb = buffer.row(y)[x as usize];
                    px.0 = [
                        red(argb) as u8,
                        green(argb) as u8,
                        blue(argb) as u8,
                        alpha(argb) as u8,
                    ];
                }
            }
            image::DynamicImage::ImageRgb8(img) => {
                for (x, y, px) in img.enumerate_pixels_mut() {
                    let argb = buffer.row(y)[x as usize];
                    px.0 = [red(argb) as u8, green(argb) as u8, blue(argb) as u8];
                }
            }
            other => {
                // No packed view of the native storage; re-materialize as
                // RGBA8.
                let mut out = image::RgbaImage::new(buffer.width(), buffer.height());
                for (x, y, px) in out.enumerate_pixels_mut() {
                    let argb = buffer.row(y)[x as usize];
                    px.0 = [
                        red(argb) as u8,
                        green(argb) as u8,
                        blue(argb) as u8,
                        alpha(argb) as u8,
                    ];
                }
                *other = image::DynamicImage::ImageRgba8(out);
            }
        }
        Ok(())
    }
}

/// Raw pixel layouts a [`ByteRaster`] can describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ByteLayout {
    /// Four bytes per pixel: alpha, red, green, blue.
    Argb8888,
    /// Four bytes per pixel: blue, green, red, alpha.
    Bgra8888,
    /// Four bytes per pixel: red, green, blue, alpha.
    Rgba8888,
    /// Three bytes per pixel: red, green, blue; opaque.
    Rgb888,
    /// One luminance byte per pixel; opaque.
    Gray8,
}

impl ByteLayout {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Argb8888 | Self::Bgra8888 | Self::Rgba8888 => 4,
            Self::Rgb888 => 3,
            Self::Gray8 => 1,
        }
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Argb8888 | Self::Bgra8888 | Self::Rgba8888)
    }

    fn decode(self, px: &[u8]) -> u32 {
        match self {
            Self::Argb8888 => u32::from_be_bytes([px[0], px[1], px[2], px[3]]),
            Self::Bgra8888 => pack_argb(
                u32::from(px[3]),
                u32::from(px[2]),
                u32::from(px[1]),
                u32::from(px[0]),
            ),
            Self::Rgba8888 => pack_argb(
                u32::from(px[3]),
                u32::from(px[0]),
                u32::from(px[1]),
                u32::from(px[2]),
            ),
            Self::Rgb888 => pack_argb(255, u32::from(px[0]), u32::from(px[1]), u32::from(px[2])),
            Self::Gray8 => {
                let v = u32::from(px[0]);
                pack_argb(255, v, v, v)
            }
        }
    }

    fn encode(self, argb: u32, px: &mut [u8]) {
        let (a, r, g, b) = (
            alpha(argb) as u8,
            red(argb) as u8,
            green(argb) as u8,
            blue(argb) as u8,
        );
        match self {
            Self::Argb8888 => px.copy_from_slice(&[a, r, g, b]),
            Self::Bgra8888 => px.copy_from_slice(&[b, g, r, a]),
            Self::Rgba8888 => px.copy_from_slice(&[r, g, b, a]),
            Self::Rgb888 => px.copy_from_slice(&[r, g, b]),
            Self::Gray8 => {
                // BT.601 luma weights.
                let luma = (red(argb) * 299 + green(argb) * 587 + blue(argb) * 114 + 500) / 1000;
                px[0] = luma as u8;
            }
        }
    }
}

/// Raw byte raster: the shape decoded video and camera frames arrive in.
#[derive(Clone, Debug)]
pub struct ByteRaster {
    width: u32,
    height: u32,
    stride_bytes: usize,
    layout: ByteLayout,
    bytes: Vec<u8>,
}

impl ByteRaster {
    /// Wrap a tightly packed byte buffer
    /// (`stride == width * bytes_per_pixel`).
    pub fn new(width: u32, height: u32, layout: ByteLayout, bytes: Vec<u8>) -> QuadblitResult<Self> {
        let stride = width as usize * layout.bytes_per_pixel();
        Self::with_stride(width, height, stride, layout, bytes)
    }

    /// Wrap a byte buffer with an explicit row stride in bytes.
    ///
    /// Fails with [`QuadblitError::UnsupportedFormat`] when the buffer is
    /// too short for the declared layout or rows would overlap.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride_bytes: usize,
        layout: ByteLayout,
        bytes: Vec<u8>,
    ) -> QuadblitResult<Self> {
        let row_bytes = width as usize * layout.bytes_per_pixel();
        if stride_bytes < row_bytes {
            return Err(QuadblitError::unsupported_format(format!(
                "row stride {stride_bytes} below {row_bytes} bytes required by {layout:?}"
            )));
        }
        let needed = stride_bytes
            .checked_mul(height as usize)
            .ok_or_else(|| QuadblitError::unsupported_format("byte raster size overflow"))?;
        if bytes.len() < needed {
            return Err(QuadblitError::unsupported_format(format!(
                "{} bytes cannot hold {width}x{height} {layout:?} raster ({needed} required)",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride_bytes,
            layout,
            bytes,
        })
    }

    /// The declared pixel layout.
    pub fn layout(&self) -> ByteLayout {
        self.layout
    }

    /// The raw backing bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the raster, returning the backing bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Raster for ByteRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    fn open(&self) -> QuadblitResult<PixelBuffer> {
        let bpp = self.layout.bytes_per_pixel();
        let row_bytes = self.width as usize * bpp;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height as usize {
            let row = &self.bytes[y * self.stride_bytes..y * self.stride_bytes + row_bytes];
            pixels.extend(row.chunks_exact(bpp).map(|px| self.layout.decode(px)));
        }
        PixelBuffer::from_pixels(self.width, self.height, pixels, self.layout.has_alpha())
    }

    fn commit(&mut self, buffer: &PixelBuffer) -> QuadblitResult<()> {
        check_dimensions(self, buffer)?;
        let bpp = self.layout.bytes_per_pixel();
        let row_bytes = self.width as usize * bpp;
        for y in 0..self.height {
            let src = buffer.row(y);
            let start = y as usize * self.stride_bytes;
            let dst = &mut self.bytes[start..start + row_bytes];
            for (argb, px) in src.iter().zip(dst.chunks_exact_mut(bpp)) {
                self.layout.encode(*argb, px);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/adapter.rs"]
mod tests;
