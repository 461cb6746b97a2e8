//! Pixel buffers and the access trait the sampler reads through.
//!
//! `RgbImageView` is a borrowed view into an interleaved 8-bit buffer with an
//! explicit stride. The stride counts bytes between the starts of consecutive
//! rows, so a stride larger than `width * channels` represents padded rows.
//! RGBA buffers (as produced by browser canvases) are accepted and their
//! alpha channel is ignored.

use crate::color::Rgb;
use crate::util::{PlateLabError, PlateLabResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod sample;

/// Random access to decoded pixels.
///
/// Reads outside the image return `None`; that is the only way
/// "no pixel available" is represented.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> usize;
    /// Image height in pixels.
    fn height(&self) -> usize;
    /// Returns the pixel at `(x, y)` if it is within bounds.
    fn pixel(&self, x: usize, y: usize) -> Option<Rgb>;
}

/// Interleaved channel layout of a pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Three bytes per pixel: R, G, B.
    Rgb8,
    /// Four bytes per pixel: R, G, B, A. Alpha is ignored.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Borrowed interleaved image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct RgbImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> RgbImageView<'a> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [u8],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> PlateLabResult<Self> {
        let stride = width
            .checked_mul(format.channels())
            .ok_or(PlateLabError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride, format)
    }

    /// Creates a view with an explicit stride in bytes.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> PlateLabResult<Self> {
        let needed = required_len(width, height, stride, format)?;
        if data.len() < needed {
            return Err(PlateLabError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the channel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y
            .checked_mul(self.stride)?
            .checked_add(x.checked_mul(self.format.channels())?)?;
        let px = self.data.get(idx..idx + 3)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }
}

impl PixelSource for RgbImageView<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.get(x, y)
    }
}

/// Owned contiguous interleaved image.
#[derive(Clone, Debug)]
pub struct OwnedRgbImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl OwnedRgbImage {
    /// Wraps a contiguous buffer, validating its length.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> PlateLabResult<Self> {
        RgbImageView::from_slice(&data, width, height, format)?;
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Creates an RGB image filled with `fill`.
    pub fn filled(width: usize, height: usize, fill: Rgb) -> PlateLabResult<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(PlateLabError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 3 {
            data.extend_from_slice(&[fill.r, fill.g, fill.b]);
        }
        Self::new(data, width, height, PixelFormat::Rgb8)
    }

    /// Overwrites the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let channels = self.format.channels();
        let idx = (y * self.width + x) * channels;
        self.data[idx] = color.r;
        self.data[idx + 1] = color.g;
        self.data[idx + 2] = color.b;
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width * self.format.channels(),
            format: self.format,
        }
    }

    /// Returns the raw interleaved bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PixelSource for OwnedRgbImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.view().get(x, y)
    }
}

fn required_len(
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
) -> PlateLabResult<usize> {
    if width == 0 || height == 0 {
        return Err(PlateLabError::InvalidDimensions { width, height });
    }
    let row_len = width
        .checked_mul(format.channels())
        .ok_or(PlateLabError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(PlateLabError::InvalidStride {
            width: row_len,
            stride,
        });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(PlateLabError::InvalidDimensions { width, height })?;
    Ok(needed)
}
