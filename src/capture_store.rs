//! Write-once storage for one session's captures.

use crate::{constants::ORIENTATION_COUNT, normalizer::CapturedImage, orientation::Orientation, Error, Result};
use std::sync::Arc;

/// One slot per orientation, indexed by ordinal
#[derive(Debug, Clone, Default)]
pub struct CaptureStore {
    slots: [Option<Arc<CapturedImage>>; ORIENTATION_COUNT],
}

impl CaptureStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the image for `orientation`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCapture` if the slot is already filled; the existing
    /// image is left untouched
    pub fn record(&mut self, orientation: Orientation, image: CapturedImage) -> Result<Arc<CapturedImage>> {
        let slot = &mut self.slots[orientation.ordinal()];
        if slot.is_some() {
            return Err(Error::DuplicateCapture(orientation));
        }
        let image = Arc::new(image);
        *slot = Some(Arc::clone(&image));
        Ok(image)
    }

    /// Image captured for `orientation`, if any
    #[must_use]
    pub fn get(&self, orientation: Orientation) -> Option<&Arc<CapturedImage>> {
        self.slots[orientation.ordinal()].as_ref()
    }

    /// Whether every orientation has an image
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Which orientations have an image, indexed by ordinal
    #[must_use]
    pub fn captured_flags(&self) -> [bool; ORIENTATION_COUNT] {
        [0, 1, 2].map(|i| self.slots[i].is_some())
    }

    /// Shared handles to every slot, indexed by ordinal
    #[must_use]
    pub fn slots(&self) -> [Option<Arc<CapturedImage>>; ORIENTATION_COUNT] {
        self.slots.clone()
    }

    /// Recorded images in capture order
    pub fn images(&self) -> impl Iterator<Item = (Orientation, &Arc<CapturedImage>)> {
        Orientation::ALL
            .into_iter()
            .filter_map(move |o| self.get(o).map(|image| (o, image)))
    }

    /// Clear every slot for a new session
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }
}
