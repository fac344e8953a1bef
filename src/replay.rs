//! Scripted capture replays.
//!
//! A replay script lists frames together with the yaw the face oracle should
//! report for each one, which lets a whole session be driven without a
//! camera or a landmark model.

use crate::{
    config::Config,
    frame::{RawFrame, ReleaseHook, Rotation},
    oracle::ScriptedOracle,
    pipeline::{FramePipeline, PipelineStats},
    session::{CaptureSession, SessionEvent, SessionSnapshot},
    Error, Result,
};
use image::{Rgba, RgbaImage};
use log::info;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Frames to feed through a session
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    /// Frames in arrival order
    pub frames: Vec<ScriptFrame>,
}

/// One scripted frame
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptFrame {
    /// Image to load; a synthetic gradient is used when absent
    pub image: Option<PathBuf>,
    /// Synthetic frame width
    pub width: u32,
    /// Synthetic frame height
    pub height: u32,
    /// Clockwise rotation to upright, in degrees
    pub rotation: u32,
    /// Yaw the oracle reports; `None` means no face
    pub yaw: Option<f64>,
}

impl Default for ScriptFrame {
    fn default() -> Self {
        Self {
            image: None,
            width: 64,
            height: 48,
            rotation: 0,
            yaw: None,
        }
    }
}

/// Everything observed while replaying a script
#[derive(Debug)]
pub struct ReplayReport {
    /// Events in the order observers received them
    pub events: Vec<SessionEvent>,
    /// Session state after the last frame
    pub snapshot: SessionSnapshot,
    /// Pipeline counters
    pub stats: PipelineStats,
    /// Number of frame buffers returned to the source
    pub releases: u64,
}

impl ReplayScript {
    /// Load a script from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a script from YAML text
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the text is not a valid script
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::InvalidInput(format!("Failed to parse replay script: {e}")))
    }

    /// Build the frames and a matching oracle
    ///
    /// Relative image paths are resolved against `base_dir`. Every frame gets
    /// a release hook that bumps `releases`.
    ///
    /// # Errors
    ///
    /// Returns an error if an image cannot be loaded or a rotation is invalid
    pub fn build(&self, base_dir: &Path, releases: &Arc<AtomicU64>) -> Result<(Vec<RawFrame>, ScriptedOracle)> {
        let oracle = ScriptedOracle::new();
        let mut frames = Vec::with_capacity(self.frames.len());

        for (sequence, entry) in (0u64..).zip(&self.frames) {
            let rotation = Rotation::from_degrees(entry.rotation)?;
            let image = match &entry.image {
                Some(path) => image::open(base_dir.join(path))?.to_rgba8(),
                None => synthetic_image(entry.width, entry.height),
            };
            let counter = Arc::clone(releases);
            let hook: ReleaseHook = Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            frames.push(RawFrame::from_rgba(sequence, image, rotation).with_release(hook));
            oracle.insert(sequence, entry.yaw);
        }

        Ok((frames, oracle))
    }
}

/// Diagonal gradient used for frames without an image file
#[must_use]
#[allow(clippy::cast_possible_truncation)] // values are reduced modulo 256
pub fn synthetic_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]))
}

/// Drive a fresh session through `script`, one frame at a time
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the script cannot be
/// built or the pipeline fails
pub fn run_replay(script: &ReplayScript, config: &Config, base_dir: &Path) -> Result<ReplayReport> {
    let releases = Arc::new(AtomicU64::new(0));
    let (frames, oracle) = script.build(base_dir, &releases)?;

    let session = Arc::new(CaptureSession::new(config)?);
    let events = session.subscribe();
    session.start_session();

    let pipeline = FramePipeline::spawn(Arc::clone(&session), Arc::new(oracle))?;
    info!("Replaying {} frames", frames.len());
    for frame in frames {
        pipeline.submit(frame)?;
        pipeline.wait_idle();
    }

    let stats = pipeline.stats();
    pipeline.shutdown()?;

    Ok(ReplayReport {
        events: events.try_iter().collect(),
        snapshot: session.snapshot(),
        stats,
        releases: releases.load(Ordering::SeqCst),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;

    const SCRIPT: &str = r#"
frames:
  - { yaw: 20.0 }
  - { yaw: 0.0, rotation: 270 }
  - { }
  - { yaw: -30.0, width: 40, height: 40 }
  - { yaw: 30.0 }
  - { yaw: 0.0 }
"#;

    #[test]
    fn test_parse_defaults() {
        let script = ReplayScript::from_yaml(SCRIPT).unwrap();
        assert_eq!(script.frames.len(), 6);
        assert_eq!(script.frames[0].width, 64);
        assert_eq!(script.frames[1].rotation, 270);
        assert!(script.frames[2].yaw.is_none());
    }

    #[test]
    fn test_run_replay() {
        let script = ReplayScript::from_yaml(SCRIPT).unwrap();
        let report = run_replay(&script, &Config::default(), Path::new(".")).unwrap();

        assert!(report.snapshot.finished);
        assert_eq!(report.releases, 6);
        assert_eq!(report.stats.processed, 6);
        assert_eq!(report.stats.accepted, 3);
        // center frame was 64x48 rotated to 48x64
        assert_eq!(report.snapshot.image(Orientation::Center).unwrap().side(), 48);
        assert_eq!(report.snapshot.image(Orientation::Left).unwrap().side(), 40);
        assert_eq!(report.snapshot.image(Orientation::Left).unwrap().source_sequence(), 3);
    }

    #[test]
    fn test_bad_rotation() {
        let script = ReplayScript::from_yaml("frames:\n  - { rotation: 45 }\n").unwrap();
        let releases = Arc::new(AtomicU64::new(0));
        assert!(script.build(Path::new("."), &releases).is_err());
    }
}
