//! Raw camera frames.
//!
//! A [`RawFrame`] owns its pixel buffer and an optional release hook handed
//! in by the capture surface. The hook runs exactly once, when the frame is
//! released or dropped, so every path through the pipeline gives the buffer
//! back without double-release.

use crate::{
    constants::{RGBA_CHANNELS, RGB_CHANNELS},
    Error, Result,
};
use image::RgbaImage;
use std::fmt;

/// Callback returning a frame's buffer to its capture surface
pub type ReleaseHook = Box<dyn FnOnce() + Send + 'static>;

/// Clockwise rotation that brings a sensor frame upright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Already upright
    #[default]
    Deg0,
    /// Rotate a quarter turn clockwise
    Deg90,
    /// Rotate a half turn
    Deg180,
    /// Rotate three quarter turns clockwise
    Deg270,
}

impl Rotation {
    /// Parse a rotation from degrees
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than 0, 90, 180 or 270
    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(Error::InvalidFrame(format!(
                "Rotation must be 0, 90, 180 or 270 degrees, got {other}"
            ))),
        }
    }

    /// Rotation in degrees
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Whether the rotation swaps width and height
    #[must_use]
    pub const fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Pixel layout of a raw frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    #[default]
    Rgba8,
    /// 8-bit RGB, 3 bytes per pixel
    Rgb8,
    /// YUV 4:2:0 with a full Y plane followed by interleaved V/U samples
    Nv21,
}

impl PixelFormat {
    /// Expected buffer length for a frame of this size
    #[must_use]
    pub fn buffer_len(self, width: u32, height: u32) -> Option<usize> {
        let pixels = (width as usize).checked_mul(height as usize)?;
        match self {
            PixelFormat::Rgba8 => pixels.checked_mul(RGBA_CHANNELS),
            PixelFormat::Rgb8 => pixels.checked_mul(RGB_CHANNELS),
            PixelFormat::Nv21 => pixels.checked_add(pixels / 2),
        }
    }
}

/// Camera frame awaiting analysis
pub struct RawFrame {
    sequence: u64,
    width: u32,
    height: u32,
    format: PixelFormat,
    rotation: Rotation,
    data: Vec<u8>,
    release: Option<ReleaseHook>,
}

impl RawFrame {
    /// Create a frame without a release hook
    #[must_use]
    pub fn new(sequence: u64, width: u32, height: u32, format: PixelFormat, rotation: Rotation, data: Vec<u8>) -> Self {
        Self {
            sequence,
            width,
            height,
            format,
            rotation,
            data,
            release: None,
        }
    }

    /// Create an upright RGBA frame from an existing image
    #[must_use]
    pub fn from_rgba(sequence: u64, image: RgbaImage, rotation: Rotation) -> Self {
        let (width, height) = image.dimensions();
        Self::new(sequence, width, height, PixelFormat::Rgba8, rotation, image.into_raw())
    }

    /// Attach the hook that returns this frame's buffer to its source
    #[must_use]
    pub fn with_release(mut self, hook: ReleaseHook) -> Self {
        self.release = Some(hook);
        self
    }

    /// Monotonic identifier assigned by the capture surface
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Width as delivered by the sensor
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height as delivered by the sensor
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Rotation needed to bring the frame upright
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Raw pixel bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check dimensions and buffer length against the declared format
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` for empty buffers, zero dimensions, odd NV21
    /// dimensions or a length mismatch
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidFrame(format!(
                "Frame {} has zero dimension {}x{}",
                self.sequence, self.width, self.height
            )));
        }
        if self.data.is_empty() {
            return Err(Error::InvalidFrame(format!("Frame {} has an empty buffer", self.sequence)));
        }
        if self.format == PixelFormat::Nv21 && (self.width % 2 != 0 || self.height % 2 != 0) {
            return Err(Error::InvalidFrame(format!(
                "NV21 frame {} needs even dimensions, got {}x{}",
                self.sequence, self.width, self.height
            )));
        }
        let expected = self.format.buffer_len(self.width, self.height).ok_or_else(|| {
            Error::InvalidFrame(format!("Frame {} dimensions overflow", self.sequence))
        })?;
        if self.data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "Frame {} buffer has {} bytes, expected {} for {}x{} {:?}",
                self.sequence,
                self.data.len(),
                expected,
                self.width,
                self.height,
                self.format
            )));
        }
        Ok(())
    }

    /// Convert the buffer to RGBA without rotating it
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if the frame fails validation
    pub fn to_rgba(&self) -> Result<RgbaImage> {
        self.validate()?;
        let rgba = match self.format {
            PixelFormat::Rgba8 => self.data.clone(),
            PixelFormat::Rgb8 => rgb_to_rgba(&self.data),
            PixelFormat::Nv21 => nv21_to_rgba(&self.data, self.width as usize, self.height as usize),
        };
        RgbaImage::from_raw(self.width, self.height, rgba)
            .ok_or_else(|| Error::InvalidFrame(format!("Frame {} could not be wrapped as RGBA", self.sequence)))
    }

    /// Return the buffer to its source
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for RawFrame {
    fn drop(&mut self) {
        if let Some(hook) = self.release.take() {
            hook();
        }
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("sequence", &self.sequence)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("rotation", &self.rotation)
            .field("bytes", &self.data.len())
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

fn rgb_to_rgba(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / RGB_CHANNELS * RGBA_CHANNELS);
    for px in data.chunks_exact(RGB_CHANNELS) {
        out.extend_from_slice(&[px[0], px[1], px[2], u8::MAX]);
    }
    out
}

/// BT.601 full-range YUV to RGBA in 16.16 fixed point
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=255
fn nv21_to_rgba(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let (luma, chroma) = data.split_at(width * height);
    let mut out = Vec::with_capacity(width * height * RGBA_CHANNELS);

    for row in 0..height {
        for col in 0..width {
            let y = i32::from(luma[row * width + col]);
            let uv = (row / 2) * width + (col / 2) * 2;
            let v = i32::from(chroma[uv]) - 128;
            let u = i32::from(chroma[uv + 1]) - 128;

            let r = y + ((91_881 * v) >> 16);
            let g = y - ((22_554 * u + 46_802 * v) >> 16);
            let b = y + ((116_130 * u) >> 16);

            out.extend_from_slice(&[
                r.clamp(0, 255) as u8,
                g.clamp(0, 255) as u8,
                b.clamp(0, 255) as u8,
                u8::MAX,
            ]);
        }
    }
    out
}
