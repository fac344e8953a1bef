//! Face detection oracle interface.
//!
//! The landmark model itself lives outside this crate; the pipeline only needs
//! to know whether a face is present and its yaw.

use crate::{capture_state::PoseReading, frame::RawFrame, Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Face found by the oracle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceReading {
    /// Head yaw in degrees, left turn negative
    pub yaw_degrees: f64,
}

/// External face detector
///
/// Implementations may block; the pipeline calls them from its analysis
/// worker, never from the thread that submits frames.
pub trait FaceOracle: Send + Sync {
    /// Detect at most one face in `frame`
    ///
    /// # Errors
    ///
    /// Any error is treated as "no face" by the pipeline
    fn detect(&self, frame: &RawFrame) -> Result<Option<FaceReading>>;
}

/// Run the oracle and fold its outcome into a pose reading
///
/// Oracle failures count as an absent face.
pub fn read_pose(oracle: &dyn FaceOracle, frame: &RawFrame) -> PoseReading {
    match oracle.detect(frame) {
        Ok(Some(face)) => PoseReading::face(face.yaw_degrees),
        Ok(None) => PoseReading::no_face(),
        Err(e) => {
            log::debug!("Oracle failed on frame {}: {}", frame.sequence(), e);
            PoseReading::no_face()
        }
    }
}

/// Oracle answering from a table of readings keyed by frame sequence
///
/// `None` entries mean no face; frames missing from the table produce an
/// `OracleFailure`.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    readings: Mutex<HashMap<u64, Option<f64>>>,
    calls: Mutex<Vec<u64>>,
}

impl ScriptedOracle {
    /// Empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script readings for frames numbered from zero
    #[must_use]
    pub fn from_sequence<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let oracle = Self::new();
        for (sequence, yaw) in (0u64..).zip(readings) {
            oracle.insert(sequence, yaw);
        }
        oracle
    }

    /// Script the reading for one frame
    pub fn insert(&self, sequence: u64, yaw_degrees: Option<f64>) {
        self.readings.lock().insert(sequence, yaw_degrees);
    }

    /// Frame sequences the oracle has been asked about, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().clone()
    }
}

impl FaceOracle for ScriptedOracle {
    fn detect(&self, frame: &RawFrame) -> Result<Option<FaceReading>> {
        self.calls.lock().push(frame.sequence());
        match self.readings.lock().get(&frame.sequence()) {
            Some(Some(yaw_degrees)) => Ok(Some(FaceReading {
                yaw_degrees: *yaw_degrees,
            })),
            Some(None) => Ok(None),
            None => Err(Error::OracleFailure(format!(
                "No scripted reading for frame {}",
                frame.sequence()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{PixelFormat, Rotation};

    fn frame(sequence: u64) -> RawFrame {
        RawFrame::new(sequence, 1, 1, PixelFormat::Rgba8, Rotation::Deg0, vec![0; 4])
    }

    #[test]
    fn test_scripted_readings() {
        let oracle = ScriptedOracle::from_sequence([Some(0.0), None]);
        assert_eq!(read_pose(&oracle, &frame(0)), PoseReading::face(0.0));
        assert_eq!(read_pose(&oracle, &frame(1)), PoseReading::no_face());
        assert_eq!(oracle.calls(), vec![0, 1]);
    }

    #[test]
    fn test_missing_reading_is_failure_and_no_face() {
        let oracle = ScriptedOracle::new();
        assert!(matches!(oracle.detect(&frame(4)), Err(Error::OracleFailure(_))));
        assert!(!read_pose(&oracle, &frame(4)).face_present);
    }
}
