//! Frame normalization into upright circular portraits.

use crate::{
    constants::TRANSPARENT,
    frame::{RawFrame, Rotation},
    Result,
};
use image::{imageops, Rgba, RgbaImage};
use log::debug;

/// Upright, square, circularly masked capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    image: RgbaImage,
    source_sequence: u64,
}

impl CapturedImage {
    /// Side length in pixels
    #[must_use]
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    /// Sequence number of the frame this was cut from
    #[must_use]
    pub fn source_sequence(&self) -> u64 {
        self.source_sequence
    }

    /// Borrow the pixel buffer
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take ownership of the pixel buffer
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Rotates, optionally mirrors, and circle-crops raw frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameNormalizer {
    mirror: bool,
}

impl FrameNormalizer {
    /// Create a normalizer
    #[must_use]
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }

    /// Turn a raw frame into a captured image
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if the frame buffer is empty, zero-sized or does
    /// not match its declared format
    pub fn normalize(&self, frame: &RawFrame) -> Result<CapturedImage> {
        let rgba = frame.to_rgba()?;
        let mut upright = rotate_upright(rgba, frame.rotation());
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut upright);
        }
        let image = circle_crop(&upright);

        debug!(
            "Normalized frame {} ({}x{}, {}°) into {}px circle",
            frame.sequence(),
            frame.width(),
            frame.height(),
            frame.rotation().degrees(),
            image.width()
        );

        Ok(CapturedImage {
            image,
            source_sequence: frame.sequence(),
        })
    }
}

/// Rotate clockwise by a quarter-turn multiple
#[must_use]
pub fn rotate_upright(image: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Deg0 => image,
        Rotation::Deg90 => imageops::rotate90(&image),
        Rotation::Deg180 => imageops::rotate180(&image),
        Rotation::Deg270 => imageops::rotate270(&image),
    }
}

/// Crop the centered square and clear everything outside its inscribed circle
///
/// A pixel is kept when its center lies within the circle; kept pixels are
/// copied unchanged and the rest become fully transparent.
#[must_use]
#[allow(clippy::cast_precision_loss)] // frame sides are far below f32's exact range
pub fn circle_crop(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let x0 = (width - side) / 2;
    let y0 = (height - side) / 2;

    let radius = side as f32 / 2.0;
    let radius_sq = radius * radius;

    RgbaImage::from_fn(side, side, |x, y| {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy <= radius_sq {
            *image.get_pixel(x0 + x, y0 + y)
        } else {
            Rgba(TRANSPARENT)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    /// Image where every pixel encodes its own coordinates
    fn coordinate_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let image = coordinate_image(4, 2);
        assert_eq!(rotate_upright(image.clone(), Rotation::Deg0).dimensions(), (4, 2));
        assert_eq!(rotate_upright(image.clone(), Rotation::Deg90).dimensions(), (2, 4));
        assert_eq!(rotate_upright(image.clone(), Rotation::Deg180).dimensions(), (4, 2));
        assert_eq!(rotate_upright(image, Rotation::Deg270).dimensions(), (2, 4));
    }

    #[test]
    fn test_rotate_90_is_clockwise() {
        let image = coordinate_image(4, 2);
        let rotated = rotate_upright(image, Rotation::Deg90);
        // bottom-left source pixel lands at the top-left after a clockwise turn
        assert_eq!(rotated.get_pixel(0, 0).0, [0, 1, 7, 255]);
        assert_eq!(rotated.get_pixel(1, 0).0, [0, 0, 7, 255]);
    }

    #[test]
    fn test_circle_crop_is_centered_square() {
        let image = coordinate_image(10, 6);
        let cropped = circle_crop(&image);
        assert_eq!(cropped.dimensions(), (6, 6));
        // center pixel comes from the horizontally centered window
        assert_eq!(cropped.get_pixel(3, 3).0, [5, 3, 7, 255]);
        // corners fall outside the circle
        for (x, y) in [(0, 0), (5, 0), (0, 5), (5, 5)] {
            assert_eq!(cropped.get_pixel(x, y).0, TRANSPARENT);
        }
    }

    #[test]
    fn test_single_pixel_survives() {
        let image = coordinate_image(1, 1);
        let cropped = circle_crop(&image);
        assert_eq!(cropped.get_pixel(0, 0).0, [0, 0, 7, 255]);
    }

    #[test]
    fn test_normalize_rejects_empty_frame() {
        let frame = RawFrame::new(9, 0, 0, PixelFormat::Rgba8, Rotation::Deg0, Vec::new());
        let result = FrameNormalizer::default().normalize(&frame);
        assert!(matches!(result, Err(crate::Error::InvalidFrame(_))));
    }

    #[test]
    fn test_normalize_portrait_from_landscape_sensor() {
        let frame = RawFrame::from_rgba(3, coordinate_image(8, 4), Rotation::Deg90);
        let captured = FrameNormalizer::default().normalize(&frame).unwrap();
        assert_eq!(captured.side(), 4);
        assert_eq!(captured.source_sequence(), 3);
    }

    #[test]
    fn test_mirror_flips_columns() {
        let frame = RawFrame::from_rgba(0, coordinate_image(4, 4), Rotation::Deg0);
        let plain = FrameNormalizer::new(false).normalize(&frame).unwrap();
        let mirrored = FrameNormalizer::new(true).normalize(&frame).unwrap();
        assert_eq!(plain.as_image().get_pixel(1, 2).0, [1, 2, 7, 255]);
        assert_eq!(mirrored.as_image().get_pixel(1, 2).0, [2, 2, 7, 255]);
    }
}
