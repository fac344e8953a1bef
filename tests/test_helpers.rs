//! Helper functions and utilities for tests

#![allow(dead_code)]

use face_capture::{
    config::Config,
    frame::{PixelFormat, RawFrame, ReleaseHook, Rotation},
    session::CaptureSession,
};
use image::{Rgba, RgbaImage};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Counts how many frames have been handed back to the source
#[derive(Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicU64>);

impl ReleaseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn hook(&self) -> ReleaseHook {
        let counter = Arc::clone(&self.0);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// Create a test image where every pixel encodes its coordinates
pub fn create_test_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
}

/// Upright RGBA frame with a counted release hook
pub fn counted_frame(sequence: u64, counter: &ReleaseCounter) -> RawFrame {
    RawFrame::from_rgba(sequence, create_test_image(8, 6), Rotation::Deg90).with_release(counter.hook())
}

/// Frame whose buffer does not match its declared size
pub fn corrupt_frame(sequence: u64, counter: &ReleaseCounter) -> RawFrame {
    RawFrame::new(sequence, 8, 6, PixelFormat::Rgba8, Rotation::Deg0, vec![0; 10]).with_release(counter.hook())
}

/// Session with default configuration
pub fn default_session() -> Arc<CaptureSession> {
    Arc::new(CaptureSession::new(&Config::default()).expect("default config is valid"))
}
