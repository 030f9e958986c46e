//! Image sources

use crate::error::{ImageError, Result, SheetError};
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;

/// Axis-aligned pixel region, origin at the top-left corner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the region lies entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// Loads images and cuts regions out of them.
///
/// `Image` is a cheap handle: sprite players clone it for every displayed
/// frame.
pub trait ImageSource {
    type Image: Clone;

    fn load_image(&self, path: &Path) -> Result<Self::Image>;

    /// Copy `region` out of `image`. Regions reaching outside the image fail
    /// with [`SheetError::OutOfBounds`].
    fn crop_region(&self, image: &Self::Image, region: PixelRect) -> Result<Self::Image>;

    /// Width and height in pixels
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);
}

/// Shared handle to decoded RGBA pixels
pub type RgbaHandle = Arc<RgbaImage>;

/// [`ImageSource`] backed by the `image` crate; every image is decoded to RGBA8
#[derive(Clone, Copy, Debug, Default)]
pub struct RgbaSource;

impl RgbaSource {
    /// Wrap already decoded pixels
    pub fn from_image(image: RgbaImage) -> RgbaHandle {
        Arc::new(image)
    }
}

impl ImageSource for RgbaSource {
    type Image = RgbaHandle;

    fn load_image(&self, path: &Path) -> Result<Self::Image> {
        let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes)?.into_rgba8();
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "image loaded"
        );
        Ok(Arc::new(decoded))
    }

    fn crop_region(&self, image: &Self::Image, region: PixelRect) -> Result<Self::Image> {
        let (width, height) = image.dimensions();
        if !region.fits_within(width, height) {
            return Err(SheetError::OutOfBounds {
                region,
                width,
                height,
            }
            .into());
        }
        let cropped =
            image::imageops::crop_imm(&**image, region.x, region.y, region.width, region.height)
                .to_image();
        Ok(Arc::new(cropped))
    }

    fn dimensions(&self, image: &Self::Image) -> (u32, u32) {
        image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_crop_copies_region() {
        let mut pixels = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        pixels.put_pixel(2, 1, Rgba([255, 0, 0, 255]));
        let image = RgbaSource::from_image(pixels);

        let cropped = RgbaSource.crop_region(&image, PixelRect::new(2, 1, 2, 3)).unwrap();
        assert_eq!(RgbaSource.dimensions(&cropped), (2, 3));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(1, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_crop_outside_image_fails() {
        let image = RgbaSource::from_image(RgbaImage::new(4, 4));
        let region = PixelRect::new(3, 0, 2, 2);
        match RgbaSource.crop_region(&image, region) {
            Err(ImageError::Sheet(SheetError::OutOfBounds { width, height, .. })) => {
                assert_eq!((width, height), (4, 4));
            }
            other => panic!("expected out of bounds, got {other:?}"),
        }
        assert!(!PixelRect::new(u32::MAX, 0, 1, 1).fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("definitely/not/here.png");
        match RgbaSource.load_image(path) {
            Err(ImageError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let path = std::env::temp_dir().join(format!("kurve-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();
        let result = RgbaSource.load_image(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
