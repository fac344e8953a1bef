//! Capture state machine.
//!
//! The machine walks `Center -> Left -> Right -> Finished`. Acceptance is split
//! in two steps so a caller can do expensive work between deciding and
//! committing: [`CaptureState::evaluate`] is a pure read that names the
//! orientation a reading would complete, and [`CaptureState::commit`] applies
//! it only if that orientation is still the current target.

use crate::{
    constants::ORIENTATION_COUNT,
    orientation::Orientation,
    pose_classifier::{PoseClassifier, Verdict},
};

/// One processed frame's face reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseReading {
    /// Head yaw in degrees, left turn negative
    pub yaw_degrees: f64,
    /// Whether the oracle found a face at all
    pub face_present: bool,
}

impl PoseReading {
    /// Reading with a detected face
    #[must_use]
    pub fn face(yaw_degrees: f64) -> Self {
        Self {
            yaw_degrees,
            face_present: true,
        }
    }

    /// Reading without a face
    #[must_use]
    pub fn no_face() -> Self {
        Self {
            yaw_degrees: 0.0,
            face_present: false,
        }
    }
}

/// Result of committing an accepted reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Orientation that was just completed
    pub completed: Orientation,
    /// New capture target, `None` once finished
    pub next: Option<Orientation>,
    /// Instruction text to display after this transition
    pub instruction: &'static str,
}

impl Transition {
    /// Whether this transition finished the session
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next.is_none()
    }
}

/// Session progress through the three orientations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureState {
    completed: [bool; ORIENTATION_COUNT],
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureState {
    /// Fresh state targeting `Center`
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: [false; ORIENTATION_COUNT],
        }
    }

    /// Lowest-ordinal orientation not yet completed
    #[must_use]
    pub fn current_target(&self) -> Option<Orientation> {
        Orientation::ALL.into_iter().find(|o| !self.completed[o.ordinal()])
    }

    /// Whether every orientation has been completed
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed.iter().all(|done| *done)
    }

    /// Whether a specific orientation has been completed
    #[must_use]
    pub fn is_completed(&self, orientation: Orientation) -> bool {
        self.completed[orientation.ordinal()]
    }

    /// Per-orientation completion flags indexed by ordinal
    #[must_use]
    pub fn completed_flags(&self) -> [bool; ORIENTATION_COUNT] {
        self.completed
    }

    /// Instruction for the current state
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        match self.current_target() {
            Some(target) => target.instruction(),
            None => crate::constants::INSTRUCTION_COMPLETE,
        }
    }

    /// Orientation this reading would complete, without changing state
    #[must_use]
    pub fn evaluate(&self, classifier: &PoseClassifier, reading: &PoseReading) -> Option<Orientation> {
        if !reading.face_present {
            return None;
        }
        let target = self.current_target()?;
        match classifier.classify(target, reading.yaw_degrees) {
            Verdict::Accept => Some(target),
            Verdict::Reject => None,
        }
    }

    /// Complete `orientation` if it is still the current target
    ///
    /// Returns `None` when the target has moved on, which is how a late
    /// duplicate accept is discarded.
    pub fn commit(&mut self, orientation: Orientation) -> Option<Transition> {
        if self.current_target() != Some(orientation) {
            return None;
        }
        self.completed[orientation.ordinal()] = true;
        Some(Transition {
            completed: orientation,
            next: self.current_target(),
            instruction: orientation.instruction_after(),
        })
    }

    /// Evaluate and commit in one step
    pub fn apply(&mut self, classifier: &PoseClassifier, reading: &PoseReading) -> Option<Transition> {
        let accepted = self.evaluate(classifier, reading)?;
        self.commit(accepted)
    }
}
