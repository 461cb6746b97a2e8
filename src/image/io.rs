//! Convenience helpers for decoding plate photographs via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::color::Rgb;
use crate::image::{OwnedRgbImage, PixelFormat, PixelSource, RgbImageView};
use crate::util::{PlateLabError, PlateLabResult};
use std::path::Path;

/// Creates a borrowed view from an 8-bit RGB image buffer.
pub fn view_from_rgb_image(img: &image::RgbImage) -> PlateLabResult<RgbImageView<'_>> {
    RgbImageView::from_slice(
        img.as_raw(),
        img.width() as usize,
        img.height() as usize,
        PixelFormat::Rgb8,
    )
}

/// Converts any decoded image to an owned 8-bit RGB image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> PlateLabResult<OwnedRgbImage> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    OwnedRgbImage::new(rgb.into_raw(), width, height, PixelFormat::Rgb8)
}

/// Loads and decodes an image from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> PlateLabResult<OwnedRgbImage> {
    let img = image::open(path).map_err(|err| PlateLabError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

impl PixelSource for image::RgbImage {
    fn width(&self) -> usize {
        image::RgbImage::width(self) as usize
    }

    fn height(&self) -> usize {
        image::RgbImage::height(self) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.get_pixel_checked(x, y).map(|px| Rgb::new(px[0], px[1], px[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::{owned_from_dynamic_image, view_from_rgb_image};
    use crate::color::Rgb;
    use crate::image::PixelSource;

    #[test]
    fn image_buffers_expose_the_same_pixels() {
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([10, 20, 30]));

        let view = view_from_rgb_image(&img).unwrap();
        assert_eq!(view.pixel(2, 1), Some(Rgb::new(10, 20, 30)));
        assert_eq!(PixelSource::pixel(&img, 2, 1), Some(Rgb::new(10, 20, 30)));
        assert_eq!(PixelSource::pixel(&img, 3, 1), None);

        let owned = owned_from_dynamic_image(&image::DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(owned.pixel(2, 1), Some(Rgb::new(10, 20, 30)));
    }
}
